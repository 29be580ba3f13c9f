//! Comments attached to statements.
//!
//! The tree does not keep source spans, so comments are stored as leading
//! comments of the statement they precede. Rewrites that remove or replace a
//! statement move its comments to the surviving statement with
//! [`SyntaxTree::transfer_comments`](crate::SyntaxTree::transfer_comments).

use super::Name;

/// A source comment.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Comment {
    /// The text of the comment, without `//` or `/* */` delimiters.
    pub content: Name,
    pub kind: CommentKind,
}

impl Comment {
    #[inline]
    pub fn new(content: Name, kind: CommentKind) -> Self {
        Comment { content, kind }
    }

    #[inline]
    pub fn line(content: Name) -> Self {
        Comment::new(content, CommentKind::Line)
    }

    #[inline]
    pub fn block(content: Name) -> Self {
        Comment::new(content, CommentKind::Block)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CommentKind {
    /// `// text`
    Line,
    /// `/* text */`
    Block,
}

/// Leading comments of one statement, in source order.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct CommentList {
    comments: Vec<Comment>,
}

impl CommentList {
    pub fn new() -> Self {
        CommentList::default()
    }

    pub fn push(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Prepend `other` (which keeps its own order) to this list.
    pub fn prepend(&mut self, mut other: CommentList) {
        other.comments.append(&mut self.comments);
        self.comments = other.comments;
    }

    pub fn take(&mut self) -> CommentList {
        std::mem::take(self)
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.comments.iter()
    }
}

impl<'a> IntoIterator for &'a CommentList {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepend_keeps_order() {
        let mut list = CommentList::new();
        list.push(Comment::line(Name::new(0, 3)));

        let mut moved = CommentList::new();
        moved.push(Comment::line(Name::new(0, 1)));
        moved.push(Comment::block(Name::new(0, 2)));

        list.prepend(moved);
        let contents: Vec<_> = list.iter().map(|c| c.content.local()).collect();
        assert_eq!(contents, vec![1, 2, 3]);
    }

    #[test]
    fn test_take_empties() {
        let mut list = CommentList::new();
        list.push(Comment::line(Name::EMPTY));
        let taken = list.take();
        assert!(list.is_empty());
        assert_eq!(taken.len(), 1);
    }
}
