//! Reshaping proofs into the fixed-width arrays a membership circuit consumes.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use super::proof::{Direction, MerkleProof, ProofEntry};
use crate::element::Element;
use crate::error::MerkleError;

/// Parallel `pathElements` / `pathIndices` arrays, both of length `depth`.
///
/// `path_elements[0]` is the leaf, `path_elements[i]` for `i >= 1` the sibling
/// at layer `i - 1`. `path_indices[i]` is the entry's direction bit
/// (`Left = 0`, `Right = 1`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitInputs {
    pub path_elements: Vec<Element>,
    pub path_indices: Vec<u8>,
}

impl CircuitInputs {
    /// Encode `proof` for a circuit compiled for `depth` layers.
    pub fn from_proof(proof: &MerkleProof, depth: usize) -> Result<Self, MerkleError> {
        proof.check_len(depth)?;

        let (path_elements, path_indices): (Vec<Element>, Vec<u8>) = proof
            .entries()
            .iter()
            .map(|entry| (entry.hash.clone(), entry.direction.bit()))
            .unzip();

        Ok(Self {
            path_elements,
            path_indices,
        })
    }

    /// Path length.
    pub fn depth(&self) -> usize {
        self.path_elements.len()
    }

    /// Field representation for witness allocation.
    ///
    /// Fails if any element does not fit the BN254 scalar field, if the arrays
    /// differ in length, or if an index is not a bit.
    pub fn to_field_elements(&self) -> Result<(Vec<Fr>, Vec<bool>), MerkleError> {
        self.check_shape()?;

        let elements = self
            .path_elements
            .iter()
            .map(Element::to_field)
            .collect::<Result<Vec<_>, _>>()?;

        let bits = self
            .path_indices
            .iter()
            .map(|&bit| Direction::from_bit(bit).map(|d| d == Direction::Right))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((elements, bits))
    }

    /// Reverse the encoding.
    pub fn into_proof(self) -> Result<MerkleProof, MerkleError> {
        self.check_shape()?;

        let entries = self
            .path_elements
            .into_iter()
            .zip(self.path_indices)
            .map(|(hash, bit)| Direction::from_bit(bit).map(|d| ProofEntry::new(hash, d)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MerkleProof::new(entries))
    }

    fn check_shape(&self) -> Result<(), MerkleError> {
        if self.path_indices.len() != self.path_elements.len() {
            return Err(MerkleError::MalformedProof {
                expected: self.path_elements.len(),
                actual: self.path_indices.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod encode_tests {
    use super::*;
    use crate::hash::AdditiveHasher;
    use crate::merkle::MerkleTree;

    fn worked_example_proof() -> MerkleProof {
        let leaves: Vec<Element> = [1u64, 2, 3].into_iter().map(Element::from).collect();
        let tree = MerkleTree::build(&leaves, 4, &AdditiveHasher).unwrap();
        tree.proof_for(&Element::from(2u64)).unwrap()
    }

    #[test]
    fn test_encode_worked_example() {
        let inputs = CircuitInputs::from_proof(&worked_example_proof(), 4).unwrap();

        assert_eq!(
            inputs.path_elements,
            vec![
                Element::from(2u64),
                Element::from(1u64),
                Element::from(6u64),
                Element::from(9u64)
            ]
        );
        assert_eq!(inputs.path_indices, vec![1, 0, 1, 1]);
        assert_eq!(inputs.depth(), 4);
    }

    #[test]
    fn test_depth_mismatch() {
        assert_eq!(
            CircuitInputs::from_proof(&worked_example_proof(), 20),
            Err(MerkleError::MalformedProof {
                expected: 20,
                actual: 4
            })
        );
    }

    #[test]
    fn test_into_proof_restores_entries() {
        let proof = worked_example_proof();
        let inputs = CircuitInputs::from_proof(&proof, 4).unwrap();
        assert_eq!(inputs.into_proof().unwrap(), proof);
    }

    #[test]
    fn test_field_elements() {
        let inputs = CircuitInputs::from_proof(&worked_example_proof(), 4).unwrap();
        let (elements, bits) = inputs.to_field_elements().unwrap();

        assert_eq!(elements[1], Fr::from(1u64));
        assert_eq!(bits, vec![true, false, true, true]);
    }

    #[test]
    fn test_bad_bit_rejected() {
        let inputs = CircuitInputs {
            path_elements: vec![Element::from(1u64), Element::from(2u64)],
            path_indices: vec![0, 3],
        };
        assert_eq!(
            inputs.to_field_elements(),
            Err(MerkleError::InvalidDirection(3))
        );
    }

    #[test]
    fn test_ragged_arrays_rejected() {
        let inputs = CircuitInputs {
            path_elements: vec![Element::from(1u64), Element::from(2u64)],
            path_indices: vec![0],
        };
        assert!(matches!(
            inputs.into_proof(),
            Err(MerkleError::MalformedProof { .. })
        ));
    }
}
