//! Local proof verification for the membership circuit.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, VerifyingKey};
use ark_snark::SNARK;
use thiserror::Error;

/// Errors during verification
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Verification failed: {0}")]
    Verification(String),
}

/// Verify a membership proof (uses the tree root as single public input)
pub fn verify_membership(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    root: Fr,
) -> Result<bool, VerifyError> {
    let public_inputs = vec![root];

    Groth16::<Bn254>::verify(vk, &public_inputs, proof)
        .map_err(|e| VerifyError::Verification(e.to_string()))
}
