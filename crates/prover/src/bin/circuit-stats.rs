//! Circuit statistics utility - reports constraint counts and proof timing
//!
//! Usage:
//!   cargo run --release --bin circuit-stats           # Just constraint counts
//!   cargo run --release --bin circuit-stats -- --time # Include proof timing (needs keys)

use std::path::Path;
use std::time::Instant;

use ark_bn254::Fr;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use rayon::prelude::*;

use membership_circuits::{
    CircuitInputs, Element, MembershipCircuit, MerkleTree, PoseidonHasher, DEFAULT_DEPTH,
};

const DEPTHS: [usize; 5] = [4, 8, 16, DEFAULT_DEPTH, 32];

fn count_constraints(depth: usize, hasher: &PoseidonHasher) -> usize {
    let circuit = MembershipCircuit::empty(depth, hasher.shared_config());
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit.generate_constraints(cs.clone()).unwrap();
    // Empty circuits use dummy values so they do not satisfy the constraints;
    // the count is still accurate
    cs.num_constraints()
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let include_timing = args.iter().any(|a| a == "--time");
    let hasher = PoseidonHasher::new();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║              MERKLE MEMBERSHIP CIRCUIT STATS             ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");

    println!("─────────────────────────────────────────────────────────────");
    println!("CIRCUIT CONSTRAINTS:");
    println!("─────────────────────────────────────────────────────────────\n");

    let counts: Vec<(usize, usize)> = DEPTHS
        .par_iter()
        .map(|&depth| (depth, count_constraints(depth, &hasher)))
        .collect();

    println!("Depth    Max leaves      Constraints    Per level");
    println!("──────────────────────────────────────────────────");
    for (depth, count) in &counts {
        println!(
            "{:>5}    {:>10}      {:>11}    {:>9}",
            depth,
            1u64 << (depth - 1),
            count,
            count / (depth - 1).max(1)
        );
    }

    if include_timing {
        println!("\n─────────────────────────────────────────────────────────────");
        println!("PROOF TIMING:");
        println!("─────────────────────────────────────────────────────────────\n");

        let keys_path = Path::new("keys");
        if keys_path.join("params.json").exists() {
            run_timing_benchmarks(keys_path, &hasher);
        } else {
            println!("Keys not found. Generate keys first with:");
            println!("  cargo run --release --bin export-vks");
        }
    } else {
        println!("\n(Run with --time to include proof generation timing)");
    }
}

fn run_timing_benchmarks(keys_path: &Path, hasher: &PoseidonHasher) {
    use membership_prover::{prove_membership, setup::CircuitKeyPair};

    println!("Loading keys from {:?}...", keys_path);
    let start = Instant::now();
    let keys = match CircuitKeyPair::load_from_directory(keys_path) {
        Ok(k) => k,
        Err(e) => {
            println!("Failed to load keys: {}", e);
            return;
        }
    };
    println!("Keys loaded in {:?} (depth {})\n", start.elapsed(), keys.depth);

    let leaves: Vec<Element> = (1u64..=64).map(Element::from).collect();
    let start = Instant::now();
    let tree = match MerkleTree::build(&leaves, keys.depth, hasher) {
        Ok(tree) => tree,
        Err(e) => {
            println!("Failed to build tree: {}", e);
            return;
        }
    };
    println!("Tree of {} leaves built in {:?}", leaves.len(), start.elapsed());

    let root = tree.root().unwrap().to_field().unwrap();
    let proof = tree.proof_for(&Element::from(42u64)).unwrap();
    let inputs = CircuitInputs::from_proof(&proof, keys.depth).unwrap();

    // Warm up (first proof is slower due to caching)
    let _ = prove_membership(&keys, root, &inputs);

    const RUNS: usize = 3;

    let mut times = Vec::new();
    for _ in 0..RUNS {
        let start = Instant::now();
        let _ = prove_membership(&keys, root, &inputs);
        times.push(start.elapsed().as_micros());
    }
    let avg_us = times.iter().sum::<u128>() / RUNS as u128;
    println!("Membership proof avg over {} runs: {}ms", RUNS, avg_us / 1000);
}
