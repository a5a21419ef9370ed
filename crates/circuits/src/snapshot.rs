//! JSON persistence for built trees.
//!
//! Rebuilding a deep tree costs one hash per internal node, so services keep
//! snapshots of trees they serve proofs from. A snapshot is never trusted on
//! load: its shape is checked against the padding rules and every parent is
//! recomputed before the tree is handed back.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{capacity, check_depth};
use crate::element::Element;
use crate::error::MerkleError;
use crate::hash::HashFunction;
use crate::merkle::MerkleTree;

/// Serialized form of a [`MerkleTree`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub depth: usize,
    pub leaf_count: usize,
    pub layers: Vec<Vec<Element>>,
}

impl MerkleTree {
    pub fn to_snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            depth: self.depth(),
            leaf_count: self.leaf_count(),
            layers: self.layers().to_vec(),
        }
    }

    /// Rebuild a tree from `snapshot`, checking it against `hasher`.
    pub fn from_snapshot<H: HashFunction>(
        snapshot: TreeSnapshot,
        hasher: &H,
    ) -> Result<Self, MerkleError> {
        snapshot.validate(hasher)?;
        Ok(MerkleTree::from_parts(
            snapshot.layers,
            snapshot.depth,
            snapshot.leaf_count,
        ))
    }
}

impl TreeSnapshot {
    /// Check structure and hashes.
    pub fn validate<H: HashFunction>(&self, hasher: &H) -> Result<(), MerkleError> {
        check_depth(self.depth)?;

        if self.leaf_count == 0 {
            if !self.layers.is_empty() {
                return Err(corrupt("empty tree carries layers"));
            }
            return Ok(());
        }

        if self.leaf_count > capacity(self.depth) {
            return Err(corrupt(format!(
                "{} leaves exceed capacity {}",
                self.leaf_count,
                capacity(self.depth)
            )));
        }
        if self.layers.len() != self.depth {
            return Err(corrupt(format!(
                "expected {} layers, found {}",
                self.depth,
                self.layers.len()
            )));
        }

        let mut expected_len = self.leaf_count;
        for (level, layer) in self.layers.iter().enumerate() {
            let padded = if expected_len > 1 && expected_len % 2 == 1 {
                expected_len + 1
            } else {
                expected_len
            };
            if layer.len() != padded {
                return Err(corrupt(format!(
                    "layer {} has {} nodes, expected {}",
                    level,
                    layer.len(),
                    padded
                )));
            }
            if padded != expected_len && layer[padded - 1] != layer[padded - 2] {
                return Err(corrupt(format!("layer {} padding is not a duplicate", level)));
            }
            expected_len = (padded / 2).max(1);
        }

        for level in 1..self.layers.len() {
            let below = &self.layers[level - 1];
            // Padding duplicates are already checked above; a lone node pairs with itself
            let hashed = (below.len() / 2).max(1);

            for (i, parent) in self.layers[level][..hashed].iter().enumerate() {
                let left = &below[2 * i];
                let right = below.get(2 * i + 1).unwrap_or(left);
                if &hasher.hash(left, right) != parent {
                    return Err(corrupt(format!("node {} of layer {} does not hash", i, level)));
                }
            }
        }

        Ok(())
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), MerkleError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        info!(path = %path.display(), depth = self.depth, "saved tree snapshot");
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, MerkleError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let snapshot: TreeSnapshot = serde_json::from_str(&json)?;

        info!(path = %path.display(), depth = snapshot.depth, "loaded tree snapshot");
        Ok(snapshot)
    }
}

fn corrupt(reason: impl Into<String>) -> MerkleError {
    MerkleError::CorruptSnapshot(reason.into())
}
