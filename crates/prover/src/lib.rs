//! Proof generation library for Merkle membership.
//!
//! This crate provides utilities for:
//! - Trusted setup (generating proving and verifying keys per tree depth)
//! - Proof generation for the membership circuit
//! - Local proof verification

pub mod prove;
pub mod setup;
pub mod verify;

pub use prove::{decode_proof_hex, prove_membership, ProofWithInputs, ProveError};
pub use setup::{setup_membership, CircuitKeyPair, KeyParams, SetupError};
pub use verify::{verify_membership, VerifyError};

use ark_bn254::Fr;

/// Common field type for all operations
pub type ConstraintF = Fr;
