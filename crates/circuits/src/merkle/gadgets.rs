//! In-circuit membership path verification using Poseidon.
//!
//! The gadget folds an encoded path exactly like
//! [`MerkleProof::root_of`](super::MerkleProof::root_of): the first path element
//! seeds the accumulator and every later element is hashed in on the side its
//! index bit names.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_r1cs_std::{boolean::Boolean, fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::poseidon::poseidon_hash_two_var;

/// Circuit variable representation of an encoded membership path.
#[derive(Clone)]
pub struct MembershipPathVar {
    /// Leaf followed by siblings, bottom-up
    elements: Vec<FpVar<Fr>>,

    /// Direction bits, `true` = sibling on the right
    indices: Vec<Boolean<Fr>>,
}

impl MembershipPathVar {
    /// Allocate a path as witness variables.
    pub fn new_witness(
        cs: ConstraintSystemRef<Fr>,
        elements: &[Fr],
        indices: &[bool],
    ) -> Result<Self, SynthesisError> {
        if elements.len() != indices.len() || elements.is_empty() {
            return Err(SynthesisError::Unsatisfiable);
        }

        let elements = elements
            .iter()
            .map(|e| FpVar::new_witness(cs.clone(), || Ok(*e)))
            .collect::<Result<Vec<_>, _>>()?;

        let indices = indices
            .iter()
            .map(|&b| Boolean::new_witness(cs.clone(), || Ok(b)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { elements, indices })
    }

    pub fn elements(&self) -> &[FpVar<Fr>] {
        &self.elements
    }

    pub fn indices(&self) -> &[Boolean<Fr>] {
        &self.indices
    }

    /// Path length, equal to the tree depth.
    pub fn depth(&self) -> usize {
        self.elements.len()
    }

    /// The leaf variable.
    pub fn leaf(&self) -> &FpVar<Fr> {
        &self.elements[0]
    }
}

/// Compute the root committed to by `path` in-circuit.
///
/// The leaf's own index bit is allocated (and thus boolean-constrained) but
/// does not take part in the fold.
pub fn compute_root_from_path(
    cs: ConstraintSystemRef<Fr>,
    config: &PoseidonConfig<Fr>,
    path: &MembershipPathVar,
) -> Result<FpVar<Fr>, SynthesisError> {
    let mut current = path.leaf().clone();

    for (sibling, sibling_is_right) in path.elements.iter().zip(path.indices.iter()).skip(1) {
        // Right sibling: H(current, sibling), left sibling: H(sibling, current)
        let left = sibling_is_right.select(&current, sibling)?;
        let right = sibling_is_right.select(sibling, &current)?;

        current = poseidon_hash_two_var(cs.clone(), config, &left, &right)?;
    }

    Ok(current)
}

/// Constrain `path` to reconstruct `expected_root`.
pub fn verify_membership(
    cs: ConstraintSystemRef<Fr>,
    config: &PoseidonConfig<Fr>,
    expected_root: &FpVar<Fr>,
    path: &MembershipPathVar,
) -> Result<(), SynthesisError> {
    let computed_root = compute_root_from_path(cs, config, path)?;
    computed_root.enforce_equal(expected_root)?;

    Ok(())
}
