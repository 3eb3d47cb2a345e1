//! `change_label`: rename a node. Missing nodes are left alone.

use crate::ops::ChangeLabelOp;
use crate::state::DagState;

pub fn apply(state: &mut DagState, op: &ChangeLabelOp) {
    if let Some(node) = state.nodes.get_mut(&op.id) {
        node.label = op.new_label.clone();
    }
}

pub fn undo(state: &mut DagState, op: &ChangeLabelOp) {
    if let Some(node) = state.nodes.get_mut(&op.id) {
        node.label = op.old_label.clone();
    }
}
