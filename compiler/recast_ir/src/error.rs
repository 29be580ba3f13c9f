//! Tree mutation errors.

use crate::{MemberId, NodeId, StmtId};

/// Misuse of the mutation API: a foreign or stale id, or a node that is not
/// where the operation expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("{0:?} has no parent")]
    Detached(NodeId),
    #[error("{parent:?} has no child slot holding {child:?}")]
    SlotMismatch { parent: NodeId, child: NodeId },
    #[error("{0:?} is not a statement of a block")]
    NotInBlock(StmtId),
    #[error("{0:?} is not a member of a class")]
    NotInClass(MemberId),
}
