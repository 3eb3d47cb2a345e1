//! Acyclicity guard.
//!
//! Child edges are read straight from the layout: the children of `n` are the
//! members of `n`'s children container. Missing containers have no children.

use std::collections::{HashMap, HashSet};

use crate::id::{ContainerId, NodeId};
use crate::state::Layout;

/// Returns true if placing `moved` into `dest` would make `moved` an ancestor
/// of itself.
pub fn causes_cycle(moved: &NodeId, dest: &ContainerId, layout: &Layout) -> bool {
    let Some(dest_parent) = dest.owner() else {
        return false;
    };
    if dest_parent == moved {
        return true;
    }
    is_descendant(dest_parent, moved, layout)
}

/// Returns true if `target` is reachable from `ancestor` by following child
/// edges.
///
/// A node that was already expanded is not expanded again. Its children were
/// pushed the first time, so skipping it never hides a match reachable
/// through another path in a shared subtree. The walk keeps its own stack.
pub fn is_descendant(target: &NodeId, ancestor: &NodeId, layout: &Layout) -> bool {
    let mut seen = HashSet::new();
    let mut stack = vec![ancestor];
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        for child in layout.container(&current.children()) {
            if child == target {
                return true;
            }
            stack.push(child);
        }
    }
    false
}

/// Finds a node that lies on a cycle in the layout, if any.
///
/// Used to reject corrupt states at construction time. The walk keeps its
/// own stack, so arbitrarily deep chains are fine.
pub fn find_cycle(layout: &Layout) -> Option<NodeId> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Open,
        Done,
    }

    let mut marks: HashMap<&NodeId, Mark> = HashMap::new();
    for (_, members) in layout.iter() {
        for start in members {
            if marks.contains_key(start) {
                continue;
            }
            // Each frame is a node and the index of its next child to visit.
            marks.insert(start, Mark::Open);
            let mut stack: Vec<(&NodeId, usize)> = vec![(start, 0)];
            while let Some((node, next)) = stack.last_mut() {
                let children = layout.container(&node.children());
                match children.get(*next) {
                    Some(child) => {
                        *next += 1;
                        match marks.get(child) {
                            Some(Mark::Open) => return Some(child.clone()),
                            Some(Mark::Done) => {}
                            None => {
                                marks.insert(child, Mark::Open);
                                stack.push((child, 0));
                            }
                        }
                    }
                    None => {
                        marks.insert(*node, Mark::Done);
                        stack.pop();
                    }
                }
            }
        }
    }
    None
}
