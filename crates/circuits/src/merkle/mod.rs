//! Fixed-depth Merkle tree for membership proofs.
//!
//! This module provides:
//! - Native tree construction with odd-layer and depth padding
//! - Membership proof generation and verification
//! - Encoding of proofs into circuit path arrays
//! - In-circuit path verification gadgets

mod encode;
mod gadgets;
mod generate;
mod proof;
mod tree;

#[cfg(test)]
mod tests;

pub use encode::CircuitInputs;
pub use gadgets::{compute_root_from_path, verify_membership, MembershipPathVar};
pub use generate::generate_proof;
pub use proof::{Direction, MerkleProof, ProofEntry};
pub use tree::MerkleTree;
