//! HTTP request handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use membership_circuits::{
    generate_proof as generate_merkle_proof, CircuitInputs, Element, HashFunction, MerkleProof,
    MerkleTree,
};
use membership_prover::prove;

use crate::error::ApiError;
use crate::state::SharedState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub depth: usize,
    pub prover_ready: bool,
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        depth: state.config.depth,
        prover_ready: state.keys.is_some(),
    })
}

/// Build a tree, or reuse a cached one, and return it.
///
/// With `root`, the tree must already be cached. Otherwise `leaves` are built
/// into a new tree, which is cached for later requests naming its root.
async fn resolve_tree(
    state: &SharedState,
    root: Option<&Element>,
    leaves: Option<&[Element]>,
) -> Result<Arc<MerkleTree>, ApiError> {
    if let Some(root) = root {
        return state
            .trees
            .read()
            .await
            .get(root)
            .ok_or_else(|| ApiError::NotFound(format!("no tree cached for root {}", root)));
    }

    let leaves =
        leaves.ok_or_else(|| ApiError::Validation("either root or leaves is required".into()))?;
    if leaves.is_empty() {
        return Err(ApiError::Validation("leaf set is empty".into()));
    }
    if let Some(bad) = leaves.iter().find(|leaf| !state.hasher.accepts(leaf)) {
        return Err(ApiError::Validation(format!(
            "leaf {} is outside the {} domain",
            bad,
            state.hasher.name()
        )));
    }

    let tree = Arc::new(MerkleTree::build(leaves, state.config.depth, &state.hasher)?);
    let root = tree
        .root()
        .cloned()
        .ok_or_else(|| ApiError::Internal("built tree has no root".into()))?;

    state.trees.write().await.insert(root, tree.clone());
    Ok(tree)
}

fn root_of(tree: &MerkleTree) -> Result<Element, ApiError> {
    tree.root()
        .cloned()
        .ok_or_else(|| ApiError::Internal("cached tree has no root".into()))
}

// ============ Tree Build ============

#[derive(Deserialize)]
pub struct BuildTreeRequest {
    pub leaves: Vec<Element>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuildTreeResponse {
    pub root: Element,
    pub depth: usize,
    pub leaf_count: usize,
}

pub async fn build_tree(
    State(state): State<SharedState>,
    Json(req): Json<BuildTreeRequest>,
) -> Result<Json<BuildTreeResponse>, ApiError> {
    let tree = resolve_tree(&state, None, Some(&req.leaves)).await?;

    info!(leaves = tree.leaf_count(), depth = tree.depth(), "tree built");

    Ok(Json(BuildTreeResponse {
        root: root_of(&tree)?,
        depth: tree.depth(),
        leaf_count: tree.leaf_count(),
    }))
}

// ============ Proof Generation ============

#[derive(Deserialize)]
pub struct GenerateProofRequest {
    pub leaf: Element,
    #[serde(default)]
    pub root: Option<Element>,
    #[serde(default)]
    pub leaves: Option<Vec<Element>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateProofResponse {
    pub root: Element,
    pub depth: usize,
    pub proof: MerkleProof,
    pub circuit_inputs: CircuitInputs,
}

/// Locate the tree for `req` and prove `req.leaf` in it.
async fn merkle_proof_for(
    state: &SharedState,
    req: &GenerateProofRequest,
) -> Result<(Element, MerkleProof), ApiError> {
    let tree = resolve_tree(state, req.root.as_ref(), req.leaves.as_deref()).await?;
    let proof = generate_merkle_proof(
        &req.leaf,
        tree.source_leaves(),
        Some(&*tree),
        tree.depth(),
        &state.hasher,
    )?;
    Ok((root_of(&tree)?, proof))
}

pub async fn generate_proof(
    State(state): State<SharedState>,
    Json(req): Json<GenerateProofRequest>,
) -> Result<Json<GenerateProofResponse>, ApiError> {
    let (root, proof) = merkle_proof_for(&state, &req).await?;
    let depth = proof.len();
    let circuit_inputs = CircuitInputs::from_proof(&proof, depth)?;

    debug!(depth, "membership proof served");

    Ok(Json(GenerateProofResponse {
        root,
        depth,
        proof,
        circuit_inputs,
    }))
}

// ============ Proof Verification ============

#[derive(Deserialize)]
pub struct VerifyProofRequest {
    pub proof: MerkleProof,
    pub root: Element,
    #[serde(default)]
    pub depth: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyProofResponse {
    pub valid: bool,
}

pub async fn verify_proof(
    State(state): State<SharedState>,
    Json(req): Json<VerifyProofRequest>,
) -> Result<Json<VerifyProofResponse>, ApiError> {
    let depth = req.depth.unwrap_or(state.config.depth);
    let valid = req.proof.verify(&req.root, depth, &state.hasher)?;

    Ok(Json(VerifyProofResponse { valid }))
}

// ============ Membership (Groth16) ============

/// Common proof response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProofResponse {
    pub root: Element,
    pub proof: String,
    pub public_inputs: Vec<Element>,
}

pub async fn prove_membership(
    State(state): State<SharedState>,
    Json(req): Json<GenerateProofRequest>,
) -> Result<Json<ProofResponse>, ApiError> {
    let keys = state
        .keys
        .clone()
        .ok_or_else(|| ApiError::Unavailable("circuit keys are not loaded".into()))?;

    let (root, proof) = merkle_proof_for(&state, &req).await?;
    let inputs = CircuitInputs::from_proof(&proof, proof.len())?;
    let root_fr = root.to_field()?;

    // Run proof generation directly, as the prover parallelises internally
    let proof_with_inputs = prove::prove_membership(&keys, root_fr, &inputs)?;

    info!(depth = keys.depth, "groth16 membership proof generated");

    Ok(Json(ProofResponse {
        root,
        proof: proof_with_inputs.proof_hex()?,
        public_inputs: proof_with_inputs
            .public_inputs
            .into_iter()
            .map(Element::from)
            .collect(),
    }))
}
