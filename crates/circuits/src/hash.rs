//! Two-to-one hash functions pluggable into the tree engine.
//!
//! The engine only relies on the [`HashFunction`] contract: `H(left, right)` is
//! deterministic and order-sensitive. [`PoseidonHasher`] is the production
//! choice because the membership circuit re-derives roots with the same
//! permutation. [`AdditiveHasher`] and [`AffineHasher`] are small integer
//! stand-ins with easily hand-checked outputs.

use std::fmt;
use std::sync::Arc;

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ff::PrimeField;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::element::Element;
use crate::error::MerkleError;
use crate::poseidon::{poseidon_config, poseidon_hash_two_with};

/// A deterministic binary function over [`Element`]s.
pub trait HashFunction: Send + Sync {
    /// Combine a left and a right operand into a parent value.
    fn hash(&self, left: &Element, right: &Element) -> Element;

    /// Whether `value` belongs to the hash function's domain.
    fn accepts(&self, _value: &Element) -> bool {
        true
    }

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

impl<H: HashFunction + ?Sized> HashFunction for &H {
    fn hash(&self, left: &Element, right: &Element) -> Element {
        (**self).hash(left, right)
    }

    fn accepts(&self, value: &Element) -> bool {
        (**self).accepts(value)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<H: HashFunction + ?Sized> HashFunction for Arc<H> {
    fn hash(&self, left: &Element, right: &Element) -> Element {
        (**self).hash(left, right)
    }

    fn accepts(&self, value: &Element) -> bool {
        (**self).accepts(value)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Poseidon over the BN254 scalar field.
#[derive(Clone)]
pub struct PoseidonHasher {
    config: Arc<PoseidonConfig<Fr>>,
}

impl PoseidonHasher {
    pub fn new() -> Self {
        Self {
            config: Arc::new(poseidon_config()),
        }
    }

    /// The sponge parameters, shared with the in-circuit gadget.
    pub fn config(&self) -> &PoseidonConfig<Fr> {
        &self.config
    }

    /// A cheap handle on the parameters for circuits that outlive the hasher.
    pub fn shared_config(&self) -> Arc<PoseidonConfig<Fr>> {
        self.config.clone()
    }
}

impl fmt::Debug for PoseidonHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoseidonHasher")
            .field("rate", &self.config.rate)
            .field("full_rounds", &self.config.full_rounds)
            .field("partial_rounds", &self.config.partial_rounds)
            .finish()
    }
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl HashFunction for PoseidonHasher {
    /// Operands outside the field are reduced modulo the field order; callers
    /// reject them beforehand through [`HashFunction::accepts`].
    fn hash(&self, left: &Element, right: &Element) -> Element {
        let l = Fr::from_le_bytes_mod_order(&left.as_biguint().to_bytes_le());
        let r = Fr::from_le_bytes_mod_order(&right.as_biguint().to_bytes_le());
        Element::from_field(poseidon_hash_two_with(&self.config, l, r))
    }

    fn accepts(&self, value: &Element) -> bool {
        value.fits_field()
    }

    fn name(&self) -> &'static str {
        "poseidon-bn254"
    }
}

/// `H(a, b) = a + b` over unbounded integers. Order-insensitive, for hand-checked fixtures only.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdditiveHasher;

impl HashFunction for AdditiveHasher {
    fn hash(&self, left: &Element, right: &Element) -> Element {
        Element::new(left.as_biguint() + right.as_biguint())
    }

    fn name(&self) -> &'static str {
        "additive"
    }
}

/// `H(a, b) = (a * P + b) mod M` for fixed primes `P` and `M`.
#[derive(Clone, Debug)]
pub struct AffineHasher {
    multiplier: BigUint,
    modulus: BigUint,
}

impl AffineHasher {
    /// 2^61 - 1
    pub const DEFAULT_MULTIPLIER: u64 = 2_305_843_009_213_693_951;
    /// 2^64 - 59, the largest prime below 2^64
    pub const DEFAULT_MODULUS: u64 = 18_446_744_073_709_551_557;

    /// Fails when `modulus` is zero.
    pub fn new(multiplier: BigUint, modulus: BigUint) -> Result<Self, MerkleError> {
        if modulus.is_zero() {
            return Err(MerkleError::InvalidElement(
                "affine modulus must be non-zero".into(),
            ));
        }
        Ok(Self {
            multiplier,
            modulus,
        })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }
}

impl Default for AffineHasher {
    fn default() -> Self {
        Self {
            multiplier: BigUint::from(Self::DEFAULT_MULTIPLIER),
            modulus: BigUint::from(Self::DEFAULT_MODULUS),
        }
    }
}

impl HashFunction for AffineHasher {
    fn hash(&self, left: &Element, right: &Element) -> Element {
        let value = (left.as_biguint() * &self.multiplier + right.as_biguint()) % &self.modulus;
        Element::new(value)
    }

    fn accepts(&self, value: &Element) -> bool {
        value.as_biguint() < &self.modulus
    }

    fn name(&self) -> &'static str {
        "affine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::field_modulus;

    #[test]
    fn test_additive() {
        let h = AdditiveHasher;
        assert_eq!(h.hash(&1u64.into(), &2u64.into()), Element::from(3u64));
    }

    #[test]
    fn test_affine_is_order_sensitive() {
        let h = AffineHasher::default();
        let a = Element::from(3u64);
        let b = Element::from(5u64);
        assert_ne!(h.hash(&a, &b), h.hash(&b, &a));
        assert!(h.hash(&a, &b).as_biguint() < h.modulus());
    }

    #[test]
    fn test_poseidon_matches_native_field_hash() {
        let h = PoseidonHasher::new();
        let out = h.hash(&Element::from(1u64), &Element::from(2u64));
        let expected = crate::poseidon::poseidon_hash_two(Fr::from(1u64), Fr::from(2u64));
        assert_eq!(out, Element::from_field(expected));
    }

    #[test]
    fn test_poseidon_domain() {
        let h = PoseidonHasher::new();
        assert!(h.accepts(&Element::from(0u64)));
        assert!(!h.accepts(&Element::new(field_modulus())));
    }

    #[test]
    fn test_affine_rejects_zero_modulus() {
        assert!(matches!(
            AffineHasher::new(BigUint::from(3u64), BigUint::zero()),
            Err(MerkleError::InvalidElement(_))
        ));

        let small = AffineHasher::new(BigUint::from(3u64), BigUint::from(7u64)).unwrap();
        // (4 * 3 + 5) mod 7
        assert_eq!(small.hash(&4u64.into(), &5u64.into()), Element::from(3u64));
    }

    #[test]
    fn test_poseidon_debug_names_parameters() {
        let rendered = format!("{:?}", PoseidonHasher::new());
        assert!(rendered.starts_with("PoseidonHasher"));
        assert!(rendered.contains("partial_rounds: 57"));
    }

    #[test]
    fn test_references_and_arcs_are_hashers() {
        fn run<H: HashFunction>(h: H) -> Element {
            h.hash(&Element::from(4u64), &Element::from(5u64))
        }

        let direct = AffineHasher::default();
        let expected = run(direct.clone());
        assert_eq!(run(&direct), expected);
        assert_eq!(run(Arc::new(direct)), expected);
    }
}
