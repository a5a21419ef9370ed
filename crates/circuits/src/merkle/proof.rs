//! Membership proofs and root reconstruction.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::Element;
use crate::error::MerkleError;
use crate::hash::HashFunction;

/// Which side an operand occupies when two children are hashed into a parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Direction of the node at `index` within its layer.
    pub fn of_index(index: usize) -> Self {
        if index % 2 == 0 {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// Circuit encoding: `Left = 0`, `Right = 1`.
    pub fn bit(self) -> u8 {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
        }
    }

    pub fn from_bit(bit: u8) -> Result<Self, MerkleError> {
        match bit {
            0 => Ok(Direction::Left),
            1 => Ok(Direction::Right),
            other => Err(MerkleError::InvalidDirection(other)),
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// One step of a proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofEntry {
    pub hash: Element,
    pub direction: Direction,
}

impl ProofEntry {
    pub fn new(hash: Element, direction: Direction) -> Self {
        Self { hash, direction }
    }
}

/// A self-contained membership proof.
///
/// Entry 0 carries the proven leaf and the side it occupies in layer 0. That
/// direction is descriptive only; folding never reads it. Entries `1..` carry
/// one sibling per level, bottom-up, each tagged with the side the sibling
/// occupies when hashed with the running value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    entries: Vec<ProofEntry>,
}

impl MerkleProof {
    pub fn new(entries: Vec<ProofEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ProofEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ProofEntry> {
        self.entries
    }

    /// The proven leaf.
    pub fn leaf(&self) -> Option<&Element> {
        self.entries.first().map(|entry| &entry.hash)
    }

    /// Side of the proven leaf within layer 0.
    pub fn leaf_direction(&self) -> Option<Direction> {
        self.entries.first().map(|entry| entry.direction)
    }

    /// Sibling entries, bottom-up.
    pub fn siblings(&self) -> &[ProofEntry] {
        self.entries.get(1..).unwrap_or(&[])
    }

    /// Number of entries, equal to the depth of the tree that produced it.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reconstruct the root this proof commits to.
    ///
    /// Starting from the leaf, each sibling tagged `Right` is hashed as
    /// `H(acc, sibling)` and each sibling tagged `Left` as `H(sibling, acc)`.
    pub fn root_of<H: HashFunction>(&self, hasher: &H) -> Result<Element, MerkleError> {
        let leaf = self.leaf().ok_or(MerkleError::MalformedProof {
            expected: 1,
            actual: 0,
        })?;

        let root = self
            .siblings()
            .iter()
            .fold(leaf.clone(), |acc, entry| match entry.direction {
                Direction::Right => hasher.hash(&acc, &entry.hash),
                Direction::Left => hasher.hash(&entry.hash, &acc),
            });

        Ok(root)
    }

    /// Check this proof against a known root for a tree of `depth` layers.
    ///
    /// A proof of the wrong length is rejected before any hashing, so a
    /// truncated or padded proof can never be mistaken for a valid one.
    pub fn verify<H: HashFunction>(
        &self,
        expected_root: &Element,
        depth: usize,
        hasher: &H,
    ) -> Result<bool, MerkleError> {
        self.check_len(depth)?;

        let computed = self.root_of(hasher)?;
        let valid = &computed == expected_root;
        debug!(depth, valid, hasher = hasher.name(), "verified membership proof");

        Ok(valid)
    }

    pub(crate) fn check_len(&self, depth: usize) -> Result<(), MerkleError> {
        if self.entries.len() != depth {
            return Err(MerkleError::MalformedProof {
                expected: depth,
                actual: self.entries.len(),
            });
        }
        Ok(())
    }
}
