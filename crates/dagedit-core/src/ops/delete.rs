//! `delete`: remove one instance of a node.
//!
//! If the node still has an instance elsewhere, only the targeted edge goes
//! away. If the removed instance was the last one, the node collapses: its
//! children are promoted into the vacated slot, its children container is
//! emptied and its record is dropped.

use tracing::debug;

use crate::ops::DeleteOp;
use crate::state::{DagState, Node};

pub fn apply(state: &mut DagState, op: &DeleteOp) {
    if state
        .layout
        .remove_instance(&op.parent_id, &op.id, op.index)
        .is_none()
    {
        return;
    }

    if state.layout.contains_instance(&op.id) {
        return;
    }

    debug!(node = %op.id, promoted = op.children_ids.len(), "collapsing last instance");
    if !op.children_ids.is_empty() {
        state
            .layout
            .splice_at(&op.parent_id, op.index, &op.children_ids);
        state.layout.clear_container(&op.id.children());
    }
    state.nodes.shift_remove(&op.id);
}

/// A missing record means the forward pass collapsed the node.
pub fn undo(state: &mut DagState, op: &DeleteOp) {
    if !state.nodes.contains_key(&op.id) {
        state
            .nodes
            .insert(op.id.clone(), Node::new(op.id.clone(), op.label.clone()));
        if !op.children_ids.is_empty() {
            state
                .layout
                .set_container(op.id.children(), op.children_ids.clone());
            state
                .layout
                .drain_at(&op.parent_id, op.index, op.children_ids.len());
        }
    }
    state.layout.insert_at(&op.parent_id, op.index, op.id.clone());
}
