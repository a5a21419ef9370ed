//! Proof generation for the membership circuit.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use tracing::debug;

use membership_circuits::{CircuitInputs, Element, MembershipCircuit, MerkleError, PoseidonHasher};

use crate::setup::CircuitKeyPair;

/// Errors during proof generation
#[derive(Error, Debug)]
pub enum ProveError {
    #[error("Proof generation failed: {0}")]
    ProofGeneration(String),
    #[error("Path has {actual} entries but keys were generated for depth {expected}")]
    DepthMismatch { expected: usize, actual: usize },
    #[error("Invalid witness: {0}")]
    InvalidWitness(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error(transparent)]
    Tree(#[from] MerkleError),
}

/// A proof with its public inputs
#[derive(Clone, Debug)]
pub struct ProofWithInputs {
    pub proof: Proof<Bn254>,
    pub public_inputs: Vec<Fr>,
}

impl ProofWithInputs {
    /// Serialize proof to bytes
    pub fn serialize_proof(&self) -> Result<Vec<u8>, ProveError> {
        let mut bytes = Vec::new();
        self.proof
            .serialize_compressed(&mut bytes)
            .map_err(|e| ProveError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Proof bytes as `0x`-prefixed hex
    pub fn proof_hex(&self) -> Result<String, ProveError> {
        Ok(format!("0x{}", hex::encode(self.serialize_proof()?)))
    }

    /// Serialize public inputs to bytes (each Fr is 32 bytes)
    pub fn serialize_public_inputs(&self) -> Result<Vec<u8>, ProveError> {
        let mut bytes = Vec::new();
        for input in &self.public_inputs {
            input
                .serialize_compressed(&mut bytes)
                .map_err(|e| ProveError::Serialization(e.to_string()))?;
        }
        Ok(bytes)
    }

    /// Deserialize proof from bytes
    pub fn deserialize_proof(bytes: &[u8]) -> Result<Proof<Bn254>, ProveError> {
        Proof::deserialize_compressed(bytes).map_err(|e| ProveError::Serialization(e.to_string()))
    }
}

/// Decode a proof rendered by [`ProofWithInputs::proof_hex`]
pub fn decode_proof_hex(encoded: &str) -> Result<Proof<Bn254>, ProveError> {
    let stripped = encoded.strip_prefix("0x").unwrap_or(encoded);
    let bytes = hex::decode(stripped).map_err(|e| ProveError::Serialization(e.to_string()))?;
    ProofWithInputs::deserialize_proof(&bytes)
}

/// Generate a Groth16 proof that `inputs` authenticate a leaf under `root`.
///
/// The path is checked natively first: a path of the wrong length or one that
/// does not fold to `root` is reported instead of producing an unverifiable proof.
pub fn prove_membership(
    keys: &CircuitKeyPair,
    root: Fr,
    inputs: &CircuitInputs,
) -> Result<ProofWithInputs, ProveError> {
    if inputs.depth() != keys.depth {
        return Err(ProveError::DepthMismatch {
            expected: keys.depth,
            actual: inputs.depth(),
        });
    }

    let hasher = PoseidonHasher::new();
    let computed = inputs.clone().into_proof()?.root_of(&hasher)?;
    let expected = Element::from_field(root);
    if computed != expected {
        return Err(ProveError::InvalidWitness(format!(
            "path folds to {} but root is {}",
            computed, expected
        )));
    }

    let circuit = MembershipCircuit::new(root, inputs, hasher.shared_config())?;

    let mut rng = StdRng::from_entropy();
    let proof = Groth16::<Bn254>::prove(&keys.proving_key, circuit, &mut rng)
        .map_err(|e| ProveError::ProofGeneration(e.to_string()))?;

    debug!(depth = keys.depth, "generated membership proof");

    Ok(ProofWithInputs {
        proof,
        public_inputs: vec![root],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::setup_membership;
    use membership_circuits::MerkleTree;

    const DEPTH: usize = 4;

    fn fixture() -> (CircuitKeyPair, MerkleTree) {
        let mut rng = StdRng::seed_from_u64(42);
        let keys = setup_membership(DEPTH, &mut rng).unwrap();

        let leaves: Vec<Element> = [10u64, 20, 30].into_iter().map(Element::from).collect();
        let tree = MerkleTree::build(&leaves, DEPTH, &PoseidonHasher::new()).unwrap();
        (keys, tree)
    }

    fn inputs_for(tree: &MerkleTree, leaf: u64, depth: usize) -> CircuitInputs {
        let proof = tree.proof_for(&Element::from(leaf)).unwrap();
        CircuitInputs::from_proof(&proof, depth).unwrap()
    }

    #[test]
    fn test_prove_membership() {
        let (keys, tree) = fixture();
        let root = tree.root().unwrap().to_field().unwrap();

        let result = prove_membership(&keys, root, &inputs_for(&tree, 20, DEPTH)).unwrap();

        assert_eq!(result.public_inputs, vec![root]);
        assert_eq!(result.serialize_public_inputs().unwrap().len(), 32);

        let encoded = result.proof_hex().unwrap();
        assert!(encoded.starts_with("0x"));
        let decoded = decode_proof_hex(&encoded).unwrap();
        let mut bytes = Vec::new();
        decoded.serialize_compressed(&mut bytes).unwrap();
        assert_eq!(bytes, result.serialize_proof().unwrap());
    }

    #[test]
    fn test_depth_mismatch() {
        let (keys, _) = fixture();
        let leaves: Vec<Element> = [10u64, 20].into_iter().map(Element::from).collect();
        let deeper = MerkleTree::build(&leaves, DEPTH + 1, &PoseidonHasher::new()).unwrap();
        let root = deeper.root().unwrap().to_field().unwrap();

        let err = prove_membership(&keys, root, &inputs_for(&deeper, 10, DEPTH + 1)).unwrap_err();
        assert!(matches!(
            err,
            ProveError::DepthMismatch {
                expected: DEPTH,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_wrong_root_rejected_before_proving() {
        let (keys, tree) = fixture();
        let root = tree.root().unwrap().to_field().unwrap() + Fr::from(1u64);

        let err = prove_membership(&keys, root, &inputs_for(&tree, 30, DEPTH)).unwrap_err();
        assert!(matches!(err, ProveError::InvalidWitness(_)));
    }

    #[test]
    fn test_bad_hex_rejected() {
        assert!(matches!(
            decode_proof_hex("0xnothex"),
            Err(ProveError::Serialization(_))
        ));
    }
}
