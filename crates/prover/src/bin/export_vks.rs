//! Export the membership verifying key.
//!
//! This tool generates or loads keys for one tree depth and exports the
//! verifying key as hex, for on-chain or off-line verifiers.
//!
//! Usage:
//!   cargo run --release --bin export-vks                # DEFAULT_DEPTH, ./keys
//!   cargo run --release --bin export-vks -- 16 keys-16  # depth and directory

use std::path::PathBuf;

use membership_circuits::DEFAULT_DEPTH;
use membership_prover::setup::{setup_membership, CircuitKeyPair};
use rand::{rngs::StdRng, SeedableRng};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let depth = args
        .get(1)
        .map(|d| d.parse::<usize>().expect("Depth must be a number"))
        .unwrap_or(DEFAULT_DEPTH);
    let keys_dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("keys"));

    println!("Loading or generating circuit keys...");

    let keys = if keys_dir.join("params.json").exists() {
        println!("Loading existing keys from {:?}", keys_dir);
        let keys = CircuitKeyPair::load_from_directory(&keys_dir).expect("Failed to load keys");
        if keys.depth != depth {
            eprintln!(
                "Keys in {:?} were generated for depth {}, not {}",
                keys_dir, keys.depth, depth
            );
            std::process::exit(1);
        }
        keys
    } else {
        println!("Running trusted setup for depth {} (this may take a while)...", depth);
        let mut rng = StdRng::from_entropy();
        let keys = setup_membership(depth, &mut rng).expect("Failed to setup circuit");
        keys.save_to_directory(&keys_dir)
            .expect("Failed to save keys");
        println!("Keys saved to {:?}", keys_dir);
        keys
    };

    println!("\n=== Membership Verifying Key (depth {}) ===\n", keys.depth);

    let vk = keys.serialize_vk().expect("Failed to serialize verifying key");

    println!("Membership VK ({} bytes):", vk.len());
    println!("0x{}\n", hex::encode(&vk));

    // Also export as JSON for scripting
    let json = serde_json::json!({
        "depth": keys.depth,
        "membership_vk": format!("0x{}", hex::encode(&vk)),
    });

    let json_path = keys_dir.join("verifying_keys.json");
    std::fs::write(&json_path, serde_json::to_string_pretty(&json).expect("Failed to encode JSON"))
        .expect("Failed to write JSON");
    println!("JSON exported to {:?}", json_path);
}
