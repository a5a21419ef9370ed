//! Fixed-depth Merkle membership engine and ZK circuit.
//!
//! This crate provides:
//! - `MerkleTree`: depth-uniform tree construction over arbitrary-precision elements
//! - `generate_proof` / `MerkleProof::verify`: native membership proofs
//! - `CircuitInputs`: proof encoding into circuit path arrays
//! - `MembershipCircuit`: prove a leaf belongs to a public root

pub mod config;
pub mod element;
pub mod error;
pub mod hash;
pub mod membership;
pub mod merkle;
pub mod poseidon;
pub mod snapshot;


pub use config::{TreeConfig, DEFAULT_DEPTH, MAX_DEPTH};
pub use element::{field_modulus, Element};
pub use error::MerkleError;
pub use hash::{AdditiveHasher, AffineHasher, HashFunction, PoseidonHasher};
pub use membership::MembershipCircuit;
pub use merkle::{
    generate_proof, CircuitInputs, Direction, MembershipPathVar, MerkleProof, MerkleTree,
    ProofEntry,
};
pub use poseidon::poseidon_config;
pub use snapshot::TreeSnapshot;

use ark_bn254::Fr;

/// Common type aliases
pub type ConstraintF = Fr;
