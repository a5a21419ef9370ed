//! Membership proof generation.

use std::borrow::Cow;

use tracing::debug;

use super::proof::{Direction, MerkleProof, ProofEntry};
use super::tree::MerkleTree;
use crate::element::Element;
use crate::error::MerkleError;
use crate::hash::HashFunction;

impl MerkleTree {
    /// Generate a proof for `leaf`.
    ///
    /// The leaf is located by its first occurrence in layer 0. The returned
    /// proof always has exactly [`MerkleTree::depth`] entries: the leaf itself
    /// followed by one sibling for every layer below the root.
    pub fn proof_for(&self, leaf: &Element) -> Result<MerkleProof, MerkleError> {
        if self.is_empty() {
            return Err(MerkleError::EmptyInput);
        }

        let mut index = self
            .index_of(leaf)
            .ok_or_else(|| MerkleError::NotFound(leaf.to_string()))?;

        let mut entries = Vec::with_capacity(self.depth());
        entries.push(ProofEntry::new(leaf.clone(), Direction::of_index(index)));

        for layer in &self.layers()[..self.depth() - 1] {
            // Self-paired layers above the natural root have no right neighbour
            let sibling = layer.get(index ^ 1).unwrap_or(&layer[index]);
            let direction = Direction::of_index(index).flip();
            entries.push(ProofEntry::new(sibling.clone(), direction));
            index /= 2;
        }

        debug!(depth = self.depth(), "generated membership proof");

        Ok(MerkleProof::new(entries))
    }
}

/// Generate a proof for `leaf` over `leaves`, reusing `cached` when supplied.
///
/// Without a cached tree, a fresh tree is built (one hash per internal node).
/// A cached tree must have been built from exactly `leaves` at `depth`;
/// anything else is reported as [`MerkleError::StaleTree`] instead of
/// producing a proof against the wrong root.
pub fn generate_proof<H: HashFunction>(
    leaf: &Element,
    leaves: &[Element],
    cached: Option<&MerkleTree>,
    depth: usize,
    hasher: &H,
) -> Result<MerkleProof, MerkleError> {
    if leaves.is_empty() {
        return Err(MerkleError::EmptyInput);
    }
    if !hasher.accepts(leaf) {
        return Err(MerkleError::InvalidElement(format!(
            "{} is outside the {} domain",
            leaf,
            hasher.name()
        )));
    }

    let tree = match cached {
        Some(tree) if tree.matches(leaves, depth) => Cow::Borrowed(tree),
        Some(_) => return Err(MerkleError::StaleTree),
        None => Cow::Owned(MerkleTree::build(leaves, depth, hasher)?),
    };

    tree.proof_for(leaf)
}
