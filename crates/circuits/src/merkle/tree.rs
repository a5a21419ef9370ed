//! Fixed-depth Merkle tree construction.
//!
//! Layer 0 holds the leaves; each following layer holds the pairwise hashes of
//! the one below it. Odd layers are padded by duplicating their last element
//! before hashing. Once a single root remains, the tree keeps growing by
//! hashing the root with itself until it has exactly `depth` layers, so every
//! tree presents the same path length to the membership circuit regardless of
//! how many leaves it holds.

use tracing::debug;

use crate::config::{capacity, check_depth};
use crate::element::Element;
use crate::error::MerkleError;
use crate::hash::HashFunction;

/// An immutable, depth-uniform Merkle tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    /// Layer 0 = (padded) leaves, last layer = `[root]`
    layers: Vec<Vec<Element>>,

    /// Configured layer count
    depth: usize,

    /// Leaves supplied by the caller, before odd-length padding
    leaf_count: usize,
}

impl MerkleTree {
    /// Build a tree of exactly `depth` layers over `leaves`.
    ///
    /// An empty leaf set yields a degenerate tree with no layers and no root
    /// rather than an error; [`MerkleTree::is_empty`] reports that case.
    pub fn build<H: HashFunction>(
        leaves: &[Element],
        depth: usize,
        hasher: &H,
    ) -> Result<Self, MerkleError> {
        check_depth(depth)?;

        if leaves.is_empty() {
            debug!(depth, "building degenerate tree over an empty leaf set");
            return Ok(Self {
                layers: Vec::new(),
                depth,
                leaf_count: 0,
            });
        }

        if let Some(bad) = leaves.iter().find(|leaf| !hasher.accepts(leaf)) {
            return Err(MerkleError::InvalidElement(format!(
                "leaf {} is outside the {} domain",
                bad,
                hasher.name()
            )));
        }

        let capacity = capacity(depth);
        if leaves.len() > capacity {
            return Err(MerkleError::CapacityExceeded {
                leaves: leaves.len(),
                capacity,
            });
        }

        let mut layers = Vec::with_capacity(depth);
        let mut current = leaves.to_vec();

        while current.len() > 1 {
            if current.len() % 2 == 1 {
                let last = current[current.len() - 1].clone();
                current.push(last);
            }
            let next = hash_layer(&current, hasher);
            layers.push(current);
            current = next;
        }
        layers.push(current);

        // Capacity check above bounds the natural height by `depth`
        while layers.len() < depth {
            let root = &layers[layers.len() - 1][0];
            let parent = hasher.hash(root, root);
            layers.push(vec![parent]);
        }

        debug!(
            leaves = leaves.len(),
            depth,
            hasher = hasher.name(),
            "built merkle tree"
        );

        Ok(Self {
            layers,
            depth,
            leaf_count: leaves.len(),
        })
    }

    /// Reassemble a tree from already validated parts.
    pub(crate) fn from_parts(layers: Vec<Vec<Element>>, depth: usize, leaf_count: usize) -> Self {
        Self {
            layers,
            depth,
            leaf_count,
        }
    }

    /// The root, or `None` for a tree built from no leaves.
    pub fn root(&self) -> Option<&Element> {
        self.layers.last().and_then(|layer| layer.first())
    }

    /// Configured layer count.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn layers(&self) -> &[Vec<Element>] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&[Element]> {
        self.layers.get(index).map(Vec::as_slice)
    }

    /// Layer 0, including the duplicate appended to an odd leaf count.
    pub fn leaves(&self) -> &[Element] {
        self.layers.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of leaves supplied at build time.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// The leaves as supplied at build time, without padding.
    pub fn source_leaves(&self) -> &[Element] {
        &self.leaves()[..self.leaf_count]
    }

    /// Position of the first leaf equal to `leaf`.
    ///
    /// Duplicate leaf values all resolve to the earliest position; callers that
    /// need distinct paths must keep leaves unique.
    pub fn index_of(&self, leaf: &Element) -> Option<usize> {
        self.source_leaves()
            .iter()
            .position(|candidate| candidate == leaf)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Whether this tree was built over exactly `leaves` at `depth`.
    pub fn matches(&self, leaves: &[Element], depth: usize) -> bool {
        self.depth == depth
            && self.leaf_count == leaves.len()
            && self.source_leaves() == leaves
    }
}

/// Hash consecutive pairs of an even-length layer.
fn hash_layer<H: HashFunction>(layer: &[Element], hasher: &H) -> Vec<Element> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        layer
            .par_chunks(2)
            .map(|pair| hasher.hash(&pair[0], &pair[1]))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        layer
            .chunks(2)
            .map(|pair| hasher.hash(&pair[0], &pair[1]))
            .collect()
    }
}
