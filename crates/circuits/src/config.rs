//! Tree configuration.

use serde::{Deserialize, Serialize};

use crate::error::MerkleError;

/// Default number of layers, leaves included. Matches the depth the
/// membership circuit is usually compiled for.
pub const DEFAULT_DEPTH: usize = 20;

/// Largest supported depth (2^31 leaves).
pub const MAX_DEPTH: usize = 32;

/// Parameters fixed for the lifetime of a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Total layer count of every built tree, leaf layer and root layer included.
    #[serde(default = "default_depth")]
    pub depth: usize,
}

fn default_depth() -> usize {
    DEFAULT_DEPTH
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl TreeConfig {
    /// Construct and validate.
    pub fn new(depth: usize) -> Result<Self, MerkleError> {
        let config = Self { depth };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MerkleError> {
        check_depth(self.depth)
    }

    /// Maximum number of leaves a tree of this depth can hold.
    pub fn capacity(&self) -> usize {
        capacity(self.depth)
    }
}

pub(crate) fn check_depth(depth: usize) -> Result<(), MerkleError> {
    if depth == 0 || depth > MAX_DEPTH {
        return Err(MerkleError::InvalidDepth {
            depth,
            max: MAX_DEPTH,
        });
    }
    Ok(())
}

/// A depth-`d` tree has `d - 1` hashing levels above its leaves.
pub(crate) fn capacity(depth: usize) -> usize {
    1usize << depth.saturating_sub(1)
}
