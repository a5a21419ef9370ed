//! Arbitrary-precision tree elements.
//!
//! Every value stored in a tree (leaves, internal nodes, roots) is an [`Element`]:
//! a non-negative integer of unbounded size. Elements cross text boundaries
//! (JSON, HTTP, files) as base-10 strings so no precision is ever lost.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use num_traits::{Num, Zero};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MerkleError;

/// A value in the hash function's domain.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Element(BigUint);

impl Element {
    /// Wrap a big integer.
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    /// The zero element.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Borrow the underlying integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Consume into the underlying integer.
    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    /// Convert to a BN254 scalar.
    ///
    /// Fails when the value is not strictly below the field modulus; values are
    /// never silently reduced.
    pub fn to_field(&self) -> Result<Fr, MerkleError> {
        if !self.fits_field() {
            return Err(MerkleError::InvalidElement(format!(
                "{} is not below the BN254 scalar modulus",
                self
            )));
        }
        Ok(Fr::from_le_bytes_mod_order(&self.0.to_bytes_le()))
    }

    /// Lift a BN254 scalar into an element.
    pub fn from_field(value: Fr) -> Self {
        Self(BigUint::from_bytes_le(
            &value.into_bigint().to_bytes_le(),
        ))
    }

    /// Whether the value is a canonical BN254 scalar.
    pub fn fits_field(&self) -> bool {
        self.0 < field_modulus()
    }
}

/// The BN254 scalar field modulus.
pub fn field_modulus() -> BigUint {
    BigUint::from_bytes_le(&Fr::MODULUS.to_bytes_le())
}

impl From<u64> for Element {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for Element {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<Fr> for Element {
    fn from(value: Fr) -> Self {
        Self::from_field(value)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_str_radix(10))
    }
}

impl FromStr for Element {
    type Err = MerkleError;

    /// Parse a base-10 string, or a hex string prefixed with `0x`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (digits, radix) = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => (hex, 16),
            None => (trimmed, 10),
        };

        // BigUint::from_str_radix tolerates a leading '+' and underscores
        let valid = !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
        if !valid {
            return Err(MerkleError::InvalidElement(format!("cannot parse {:?}", s)));
        }

        BigUint::from_str_radix(digits, radix)
            .map(Element)
            .map_err(|e| MerkleError::InvalidElement(format!("cannot parse {:?}: {}", s, e)))
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
