//! Trusted setup utilities for generating proving and verifying keys.

use std::fs;
use std::path::Path;

use ark_bn254::Bn254;
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use membership_circuits::{MembershipCircuit, MerkleError, PoseidonHasher, TreeConfig};

const PROVING_KEY_FILE: &str = "membership.pk";
const VERIFYING_KEY_FILE: &str = "membership.vk";
const PARAMS_FILE: &str = "params.json";

/// Errors that can occur during setup
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Circuit setup failed: {0}")]
    CircuitSetup(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Deserialization failed: {0}")]
    Deserialization(String),
    #[error("Invalid tree parameters: {0}")]
    Tree(#[from] MerkleError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parameters a key pair was generated for, stored next to the keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyParams {
    pub depth: usize,
}

/// Keys for the membership circuit at one tree depth
#[derive(Clone)]
pub struct CircuitKeyPair {
    pub depth: usize,
    pub proving_key: ProvingKey<Bn254>,
    pub verifying_key: VerifyingKey<Bn254>,
}

impl CircuitKeyPair {
    /// Serialize proving key to bytes
    pub fn serialize_pk(&self) -> Result<Vec<u8>, SetupError> {
        let mut bytes = Vec::new();
        self.proving_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| SetupError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Serialize verifying key to bytes
    pub fn serialize_vk(&self) -> Result<Vec<u8>, SetupError> {
        let mut bytes = Vec::new();
        self.verifying_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| SetupError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Deserialize proving key from bytes
    pub fn deserialize_pk(bytes: &[u8]) -> Result<ProvingKey<Bn254>, SetupError> {
        ProvingKey::deserialize_compressed(bytes)
            .map_err(|e| SetupError::Deserialization(e.to_string()))
    }

    /// Deserialize verifying key from bytes
    pub fn deserialize_vk(bytes: &[u8]) -> Result<VerifyingKey<Bn254>, SetupError> {
        VerifyingKey::deserialize_compressed(bytes)
            .map_err(|e| SetupError::Deserialization(e.to_string()))
    }

    /// Save keys and their parameters to a directory
    pub fn save_to_directory(&self, dir: &Path) -> Result<(), SetupError> {
        fs::create_dir_all(dir)?;

        fs::write(dir.join(PROVING_KEY_FILE), self.serialize_pk()?)?;
        fs::write(dir.join(VERIFYING_KEY_FILE), self.serialize_vk()?)?;

        let params = KeyParams { depth: self.depth };
        let json = serde_json::to_string_pretty(&params)
            .map_err(|e| SetupError::Serialization(e.to_string()))?;
        fs::write(dir.join(PARAMS_FILE), json)?;

        info!(dir = %dir.display(), depth = self.depth, "saved membership keys");
        Ok(())
    }

    /// Load keys from a directory written by [`CircuitKeyPair::save_to_directory`]
    pub fn load_from_directory(dir: &Path) -> Result<Self, SetupError> {
        let params: KeyParams = serde_json::from_slice(&fs::read(dir.join(PARAMS_FILE))?)
            .map_err(|e| SetupError::Deserialization(e.to_string()))?;
        TreeConfig::new(params.depth)?;

        let proving_key = Self::deserialize_pk(&fs::read(dir.join(PROVING_KEY_FILE))?)?;
        let verifying_key = Self::deserialize_vk(&fs::read(dir.join(VERIFYING_KEY_FILE))?)?;

        info!(dir = %dir.display(), depth = params.depth, "loaded membership keys");
        Ok(Self {
            depth: params.depth,
            proving_key,
            verifying_key,
        })
    }
}

/// Run trusted setup for the membership circuit at `depth`.
///
/// Callers supply the randomness; tests and tooling pass a seeded `StdRng`
/// for reproducible keys, deployments should use `OsRng`.
pub fn setup_membership<R: RngCore + CryptoRng>(
    depth: usize,
    rng: &mut R,
) -> Result<CircuitKeyPair, SetupError> {
    TreeConfig::new(depth)?;

    let config = PoseidonHasher::new().shared_config();
    let circuit = MembershipCircuit::empty(depth, config);
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
        .map_err(|e| SetupError::CircuitSetup(e.to_string()))?;

    info!(depth, "membership circuit setup complete");

    Ok(CircuitKeyPair {
        depth,
        proving_key: pk,
        verifying_key: vk,
    })
}
