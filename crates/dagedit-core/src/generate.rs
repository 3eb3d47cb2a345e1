//! Random node id generation.
//!
//! Ids are `N` followed by seven lowercase base-36 characters. Generation
//! uses a seedable PRNG so a run can be reproduced from its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::id::NodeId;
use crate::state::DagState;

const ID_PREFIX: char = 'N';
const ID_SUFFIX_LEN: usize = 7;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Draws one id from `rng`. Uniqueness is not checked.
pub fn generate_node_id<R: Rng>(rng: &mut R) -> NodeId {
    let mut id = String::with_capacity(1 + ID_SUFFIX_LEN);
    id.push(ID_PREFIX);
    for _ in 0..ID_SUFFIX_LEN {
        id.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
    }
    NodeId(id)
}

/// Deterministic id source.
#[derive(Debug, Clone)]
pub struct NodeIdGenerator {
    rng: ChaCha8Rng,
}

impl NodeIdGenerator {
    pub fn from_seed(seed: u64) -> Self {
        NodeIdGenerator {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        NodeIdGenerator {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn next_id(&mut self) -> NodeId {
        generate_node_id(&mut self.rng)
    }

    /// Draws ids until one is not already taken in `state`.
    pub fn next_unused(&mut self, state: &DagState) -> NodeId {
        loop {
            let id = self.next_id();
            if !state.contains_node(&id) && !state.layout.has_container(&id.children()) {
                return id;
            }
        }
    }
}
