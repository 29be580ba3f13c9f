//! Flow analysis errors.

use recast_ir::StmtId;
use thiserror::Error;

/// Failure to build a flow graph for a region.
///
/// Callers answer conservatively when they see one of these.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
pub enum FlowError {
    /// A `break` or `continue` whose target could not be resolved.
    #[error("jump {0:?} has no target")]
    UnresolvedJump(StmtId),

    /// The queried statement is not inside the analyzed region.
    #[error("statement {stmt:?} is not inside region {region:?}")]
    NotInRegion { stmt: StmtId, region: StmtId },
}
