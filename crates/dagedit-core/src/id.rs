//! Identity types for nodes and containers.
//!
//! [`NodeId`] is a string newtype so a node id cannot be confused with a
//! label or a raw container key. [`ContainerId`] is a closed enum that keeps
//! the root slot and per-node children lists distinct at the type level; the
//! `"root"` / `"<id>-children"` string convention only exists at the serde
//! and `Display`/`FromStr` boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Suffix that marks a node's children container in the string form.
const CHILDREN_SUFFIX: &str = "-children";

/// Key of the top-level container in the string form.
const ROOT_KEY: &str = "root";

/// Stable, globally unique node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id of this node's children container.
    pub fn children(&self) -> ContainerId {
        ContainerId::Children(self.clone())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

/// Key of an ordered container in the layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContainerId {
    /// The top-level slot. Never a descendant of anything.
    Root,
    /// The ordered children list of the given node.
    Children(NodeId),
}

impl ContainerId {
    /// The node whose children this container holds, or `None` for root.
    pub fn owner(&self) -> Option<&NodeId> {
        match self {
            ContainerId::Root => None,
            ContainerId::Children(owner) => Some(owner),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, ContainerId::Root)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Root => f.write_str(ROOT_KEY),
            ContainerId::Children(owner) => write!(f, "{}{}", owner, CHILDREN_SUFFIX),
        }
    }
}

impl FromStr for ContainerId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ROOT_KEY {
            return Ok(ContainerId::Root);
        }
        match s.strip_suffix(CHILDREN_SUFFIX) {
            Some(owner) if !owner.is_empty() => Ok(ContainerId::Children(NodeId::from(owner))),
            _ => Err(CoreError::InvalidContainerId { key: s.to_string() }),
        }
    }
}

impl TryFrom<String> for ContainerId {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ContainerId> for String {
    fn from(id: ContainerId) -> Self {
        id.to_string()
    }
}
