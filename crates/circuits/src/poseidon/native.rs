//! Native Poseidon hash functions (outside circuits).

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{PoseidonConfig, PoseidonSponge};
use ark_crypto_primitives::sponge::CryptographicSponge;

use super::config::poseidon_config;

/// Hash a single field element.
pub fn poseidon_hash(input: Fr) -> Fr {
    poseidon_hash_many(&[input])
}

/// Hash two field elements with a freshly built configuration.
pub fn poseidon_hash_two(a: Fr, b: Fr) -> Fr {
    poseidon_hash_two_with(&poseidon_config(), a, b)
}

/// Hash two field elements with a caller-held configuration.
///
/// Tree construction calls this once per internal node, so callers that hash
/// many pairs should build the configuration once and reuse it.
pub fn poseidon_hash_two_with(config: &PoseidonConfig<Fr>, a: Fr, b: Fr) -> Fr {
    let mut sponge = PoseidonSponge::new(config);
    sponge.absorb(&a);
    sponge.absorb(&b);
    sponge.squeeze_field_elements(1)[0]
}

/// Hash multiple field elements.
pub fn poseidon_hash_many(inputs: &[Fr]) -> Fr {
    let config = poseidon_config::<Fr>();
    let mut sponge = PoseidonSponge::new(&config);
    for input in inputs {
        sponge.absorb(input);
    }
    sponge.squeeze_field_elements(1)[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let a = Fr::from(42u64);
        let b = Fr::from(123u64);

        assert_eq!(poseidon_hash_two(a, b), poseidon_hash_two(a, b));
    }

    #[test]
    fn test_shared_config_matches_fresh_config() {
        let config = poseidon_config();
        let a = Fr::from(7u64);
        let b = Fr::from(9u64);

        assert_eq!(poseidon_hash_two_with(&config, a, b), poseidon_hash_two(a, b));
    }

    #[test]
    fn test_two_is_many_of_two() {
        let a = Fr::from(1u64);
        let b = Fr::from(2u64);
        assert_eq!(poseidon_hash_two(a, b), poseidon_hash_many(&[a, b]));
    }
}
