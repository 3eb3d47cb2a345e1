//! The demo graph an editor session starts from.

use crate::id::{ContainerId, NodeId};
use crate::state::{DagState, Node};

/// Alpha and Beta at the top level, Alpha with two children, and Beta
/// holding a shared instance of Alpha.
pub fn demo_state() -> DagState {
    let mut state = DagState::new();
    for (id, label) in [
        ("A", "Alpha"),
        ("B", "Beta"),
        ("A1", "Alpha-child-1"),
        ("A2", "Alpha-child-2"),
    ] {
        state.nodes.insert(NodeId::from(id), Node::new(id, label));
    }
    state
        .layout
        .set_container(ContainerId::Root, vec![NodeId::from("A"), NodeId::from("B")]);
    state
        .layout
        .set_container(NodeId::from("B").children(), vec![NodeId::from("A")]);
    state.layout.set_container(
        NodeId::from("A").children(),
        vec![NodeId::from("A1"), NodeId::from("A2")],
    );
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_state_is_valid_and_shares_alpha() {
        let state = demo_state();
        state.validate().unwrap();
        assert_eq!(state.layout.instance_count(&NodeId::from("A")), 2);
        assert_eq!(state.layout.live_node_count(), 4);
    }
}
