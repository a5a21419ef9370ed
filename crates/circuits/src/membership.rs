//! Membership circuit.
//!
//! Proves knowledge of a leaf and an authentication path that fold to a public
//! root, without revealing the leaf or its position.
//!
//! Public input: root
//!
//! The path length is fixed when the circuit is constructed, so a proving key
//! is bound to one tree depth.

use std::sync::Arc;

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::error::MerkleError;
use crate::merkle::{verify_membership, CircuitInputs, MembershipPathVar};

/// Membership circuit over a Poseidon tree of fixed depth.
#[derive(Clone)]
pub struct MembershipCircuit {
    /// Tree root (public)
    pub root: Option<Fr>,

    /// Leaf followed by siblings, bottom-up (witness)
    pub path_elements: Vec<Fr>,

    /// Direction bits, `true` = sibling on the right (witness)
    pub path_indices: Vec<bool>,

    /// Poseidon parameters, shared with the native hasher
    pub config: Arc<PoseidonConfig<Fr>>,
}

impl MembershipCircuit {
    /// Create an empty circuit for setup.
    /// Uses dummy values that produce valid constraint structure.
    pub fn empty(depth: usize, config: Arc<PoseidonConfig<Fr>>) -> Self {
        Self {
            root: Some(Fr::from(0u64)),
            path_elements: vec![Fr::from(0u64); depth],
            path_indices: vec![false; depth],
            config,
        }
    }

    /// Create a new circuit with witnesses.
    pub fn new(
        root: Fr,
        inputs: &CircuitInputs,
        config: Arc<PoseidonConfig<Fr>>,
    ) -> Result<Self, MerkleError> {
        let (path_elements, path_indices) = inputs.to_field_elements()?;
        if path_elements.is_empty() {
            return Err(MerkleError::MalformedProof {
                expected: 1,
                actual: 0,
            });
        }

        Ok(Self {
            root: Some(root),
            path_elements,
            path_indices,
            config,
        })
    }

    /// Depth this circuit is shaped for.
    pub fn depth(&self) -> usize {
        self.path_elements.len()
    }
}

impl ConstraintSynthesizer<Fr> for MembershipCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // === Allocate public input ===
        let root_var = FpVar::new_input(cs.clone(), || {
            self.root.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // === Allocate path witnesses ===
        let path_var =
            MembershipPathVar::new_witness(cs.clone(), &self.path_elements, &self.path_indices)?;

        // === Verify the path folds to the root ===
        verify_membership(cs, &self.config, &root_var, &path_var)?;

        Ok(())
    }
}
