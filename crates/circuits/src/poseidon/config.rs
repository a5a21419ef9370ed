//! Poseidon parameters shared by the native hasher and the R1CS gadgets.

use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_crypto_primitives::sponge::Absorb;
use ark_ff::PrimeField;

/// Full rounds (half at the start, half at the end).
pub const FULL_ROUNDS: usize = 8;

/// Partial rounds.
pub const PARTIAL_ROUNDS: usize = 57;

/// S-box exponent.
pub const ALPHA: u64 = 5;

/// Elements absorbed per permutation. Two, so a node hash is a single permutation.
pub const RATE: usize = 2;

/// Capacity elements.
pub const CAPACITY: usize = 1;

/// Seed for round constant derivation, "MEMBERSHIP" as ASCII.
const ROUND_CONSTANT_SEED: u64 = 0x4d45_4d42_4552_5348;

/// Build the Poseidon configuration used for every tree node hash.
pub fn poseidon_config<F: PrimeField + Absorb>() -> PoseidonConfig<F> {
    let width = RATE + CAPACITY;

    PoseidonConfig::new(
        FULL_ROUNDS,
        PARTIAL_ROUNDS,
        ALPHA,
        cauchy_mds(width),
        round_constants(width),
        RATE,
        CAPACITY,
    )
}

/// Round constants from iterating `s -> s^2 + 7` over the field, seeded with a
/// fixed domain tag. Deterministic; not the reference Grain LFSR derivation.
fn round_constants<F: PrimeField>(width: usize) -> Vec<Vec<F>> {
    let mut state = F::from(ROUND_CONSTANT_SEED);

    (0..FULL_ROUNDS + PARTIAL_ROUNDS)
        .map(|_| {
            (0..width)
                .map(|_| {
                    state = state * state + F::from(7u64);
                    state
                })
                .collect()
        })
        .collect()
}

/// Cauchy matrix `m[i][j] = 1 / (x_i + y_j)` with `x_i = i`, `y_j = width + j`.
/// All `x_i + y_j` are distinct and non-zero, so every square submatrix is invertible.
fn cauchy_mds<F: PrimeField>(width: usize) -> Vec<Vec<F>> {
    (0..width)
        .map(|i| {
            (0..width)
                .map(|j| {
                    let denom = F::from((i + width + j) as u64);
                    // denominators are small non-zero integers
                    denom.inverse().unwrap_or_else(F::one)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn test_config_shape() {
        let config = poseidon_config::<Fr>();
        assert_eq!(config.full_rounds, FULL_ROUNDS);
        assert_eq!(config.partial_rounds, PARTIAL_ROUNDS);
        assert_eq!(config.rate, RATE);
        assert_eq!(config.capacity, CAPACITY);
        assert_eq!(config.mds.len(), RATE + CAPACITY);
        assert_eq!(config.ark.len(), FULL_ROUNDS + PARTIAL_ROUNDS);
    }

    #[test]
    fn test_config_deterministic() {
        let config1 = poseidon_config::<Fr>();
        let config2 = poseidon_config::<Fr>();

        assert_eq!(config1.ark, config2.ark);
        assert_eq!(config1.mds, config2.mds);
    }

    #[test]
    fn test_mds_entries_are_inverses() {
        let config = poseidon_config::<Fr>();
        // m[0][0] = 1/3 for width 3
        assert_eq!(config.mds[0][0] * Fr::from(3u64), Fr::from(1u64));
        assert_eq!(config.mds[2][2] * Fr::from(7u64), Fr::from(1u64));
    }
}
