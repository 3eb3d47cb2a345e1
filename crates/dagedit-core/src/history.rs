//! Linear undo/redo ledger of committed operations.
//!
//! Two stacks, no branching: committing a new operation discards whatever
//! had been undone.

use crate::ops::Operation;

#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Operation>,
    redo_stack: Vec<Operation>,
    /// Maximum undo depth. `None` keeps everything.
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger that forgets the oldest entry once `limit` is exceeded.
    pub fn with_limit(limit: Option<usize>) -> Self {
        History {
            limit,
            ..Self::default()
        }
    }

    /// Records a committed operation and discards the redo branch.
    pub fn push(&mut self, op: Operation) {
        self.undo_stack.push(op);
        self.redo_stack.clear();
        if let Some(limit) = self.limit {
            let excess = self.undo_stack.len().saturating_sub(limit);
            self.undo_stack.drain(..excess);
        }
    }

    /// Moves the most recent operation onto the redo stack and returns it
    /// for inverse application.
    pub fn undo(&mut self) -> Option<&Operation> {
        let op = self.undo_stack.pop()?;
        self.redo_stack.push(op);
        self.redo_stack.last()
    }

    /// Moves the most recently undone operation back onto the undo stack and
    /// returns it for forward re-application.
    pub fn redo(&mut self) -> Option<&Operation> {
        let op = self.redo_stack.pop()?;
        self.undo_stack.push(op);
        self.undo_stack.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Empties both stacks. The graph itself is not touched.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Committed operations, most recent last.
    pub fn entries(&self) -> &[Operation] {
        &self.undo_stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::ops::ChangeLabelOp;

    fn rename(to: &str) -> Operation {
        Operation::ChangeLabel(ChangeLabelOp {
            id: NodeId::from("n"),
            old_label: String::new(),
            new_label: to.into(),
        })
    }

    #[test]
    fn undo_and_redo_shuttle_between_stacks() {
        let mut history = History::new();
        assert!(!history.can_undo());
        assert!(history.undo().is_none());

        history.push(rename("a"));
        history.push(rename("b"));
        assert_eq!(history.undo(), Some(&rename("b")));
        assert!(history.can_redo());
        assert_eq!(history.entries(), &[rename("a")]);

        assert_eq!(history.redo(), Some(&rename("b")));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.entries(), &[rename("a"), rename("b")]);
    }

    #[test]
    fn new_push_discards_redo_branch() {
        let mut history = History::new();
        history.push(rename("a"));
        history.undo();
        assert!(history.can_redo());
        history.push(rename("c"));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
    }

    #[test]
    fn clear_empties_both_stacks() {
        let mut history = History::new();
        history.push(rename("a"));
        history.push(rename("b"));
        history.undo();
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.entries().is_empty());
    }

    #[test]
    fn limit_drops_oldest() {
        let mut history = History::with_limit(Some(2));
        history.push(rename("a"));
        history.push(rename("b"));
        history.push(rename("c"));
        assert_eq!(history.entries(), &[rename("b"), rename("c")]);
    }
}
