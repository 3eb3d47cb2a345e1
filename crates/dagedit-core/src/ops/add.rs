//! `add`: insert a node instance.

use crate::ops::AddOp;
use crate::state::{DagState, Node};

/// Creates the record if absent and inserts the instance at `index`.
pub fn apply(state: &mut DagState, op: &AddOp) {
    if !state.nodes.contains_key(&op.id) {
        state
            .nodes
            .insert(op.id.clone(), Node::new(op.id.clone(), op.label.clone()));
    }
    state.layout.insert_at(&op.parent_id, op.index, op.id.clone());
}

/// Removes the added instance. The record goes too once no instance is left.
pub fn undo(state: &mut DagState, op: &AddOp) {
    if state
        .layout
        .remove_instance(&op.parent_id, &op.id, op.index)
        .is_none()
    {
        return;
    }
    if !state.layout.contains_instance(&op.id) {
        state.nodes.shift_remove(&op.id);
    }
}
