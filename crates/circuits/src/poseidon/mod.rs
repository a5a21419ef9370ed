//! Poseidon hash function over the BN254 scalar field.
//!
//! Native and in-circuit versions share one parameter set, so a root computed
//! natively can be re-derived inside an R1CS circuit.

mod config;
mod gadgets;
mod native;


pub use config::poseidon_config;
pub use gadgets::{poseidon_hash_many_var, poseidon_hash_two_var};
pub use native::{poseidon_hash, poseidon_hash_many, poseidon_hash_two, poseidon_hash_two_with};
