//! Integration tests for the merkle module.

use super::*;
use crate::element::Element;
use crate::error::MerkleError;
use crate::hash::{AdditiveHasher, AffineHasher, HashFunction, PoseidonHasher};
use ark_std::rand::{rngs::StdRng, Rng, SeedableRng};

fn elements(values: &[u64]) -> Vec<Element> {
    values.iter().copied().map(Element::from).collect()
}

#[test]
fn test_every_leaf_round_trips() {
    let hasher = AffineHasher::default();
    let depth = 6;

    for n in [1u64, 2, 3, 5, 17] {
        let leaves: Vec<Element> = (1..=n).map(|i| Element::from(i * 1000 + 7)).collect();
        let tree = MerkleTree::build(&leaves, depth, &hasher).unwrap();
        let root = tree.root().unwrap();

        for leaf in &leaves {
            let proof = generate_proof(leaf, &leaves, Some(&tree), depth, &hasher).unwrap();
            assert_eq!(proof.len(), depth, "size {}", n);
            assert_eq!(proof.leaf(), Some(leaf));
            assert!(proof.verify(root, depth, &hasher).unwrap(), "size {} leaf {}", n, leaf);
        }
    }
}

#[test]
fn test_proof_length_is_depth_for_every_size() {
    let hasher = AffineHasher::default();

    for depth in [1usize, 2, 5, 9] {
        let leaves: Vec<Element> = (1..=capacity_of(depth) as u64).map(Element::from).collect();
        let proof = generate_proof(&leaves[0], &leaves, None, depth, &hasher).unwrap();
        assert_eq!(proof.len(), depth);
    }
}

fn capacity_of(depth: usize) -> usize {
    1 << (depth - 1)
}

#[test]
fn test_odd_padding_equivalence() {
    let hasher = AffineHasher::default();
    let odd = MerkleTree::build(&elements(&[10, 20, 30]), 5, &hasher).unwrap();
    let even = MerkleTree::build(&elements(&[10, 20, 30, 30]), 5, &hasher).unwrap();

    assert_eq!(odd.root(), even.root());
    assert_eq!(odd.leaf_count(), 3);
    assert_eq!(even.leaf_count(), 4);
}

#[test]
fn test_tampered_sibling_changes_root() {
    let hasher = AffineHasher::default();
    let leaves = elements(&[3, 1, 4, 1, 5, 9, 2]);
    let tree = MerkleTree::build(&leaves, 5, &hasher).unwrap();
    let root = tree.root().unwrap();
    let proof = tree.proof_for(&Element::from(5u64)).unwrap();

    for i in 1..proof.len() {
        let mut entries = proof.clone().into_entries();
        let bumped = Element::new(entries[i].hash.as_biguint() + 1u32);
        entries[i].hash = bumped;
        let tampered = MerkleProof::new(entries);

        assert!(!tampered.verify(root, 5, &hasher).unwrap(), "sibling {}", i);
    }
}

#[test]
fn test_flipped_direction_changes_root() {
    let hasher = AffineHasher::default();
    // Full tree, so no sibling equals the running value
    let leaves = elements(&[3, 1, 4, 1, 5, 9, 2, 6]);
    let tree = MerkleTree::build(&leaves, 4, &hasher).unwrap();
    let root = tree.root().unwrap();
    let proof = tree.proof_for(&Element::from(4u64)).unwrap();

    for i in 1..proof.len() {
        let mut entries = proof.clone().into_entries();
        entries[i].direction = entries[i].direction.flip();
        let tampered = MerkleProof::new(entries);

        assert!(!tampered.verify(root, 4, &hasher).unwrap(), "entry {}", i);
    }
}

#[test]
fn test_self_paired_entry_direction_is_immaterial() {
    let hasher = AffineHasher::default();
    let leaves = elements(&[3, 1, 4]);
    let tree = MerkleTree::build(&leaves, 5, &hasher).unwrap();
    let root = tree.root().unwrap();
    let proof = tree.proof_for(&Element::from(4u64)).unwrap();

    // Layers 2 and 3 sit above the natural root and pair it with itself
    let mut entries = proof.into_entries();
    entries[3].direction = entries[3].direction.flip();
    entries[4].direction = entries[4].direction.flip();

    assert!(MerkleProof::new(entries).verify(root, 5, &hasher).unwrap());
}

#[test]
fn test_wrong_leaf_fails() {
    let hasher = AffineHasher::default();
    let leaves = elements(&[100, 200, 300, 400]);
    let tree = MerkleTree::build(&leaves, 4, &hasher).unwrap();
    let proof = tree.proof_for(&Element::from(200u64)).unwrap();

    let mut entries = proof.into_entries();
    entries[0].hash = Element::from(201u64);

    assert!(!MerkleProof::new(entries)
        .verify(tree.root().unwrap(), 4, &hasher)
        .unwrap());
}

#[test]
fn test_cache_consistency() {
    let hasher = AffineHasher::default();
    let leaves = elements(&[8, 6, 7, 5, 3, 0, 9]);
    let tree = MerkleTree::build(&leaves, 6, &hasher).unwrap();

    for leaf in &leaves {
        let cached = generate_proof(leaf, &leaves, Some(&tree), 6, &hasher).unwrap();
        let fresh = generate_proof(leaf, &leaves, None, 6, &hasher).unwrap();
        assert_eq!(cached, fresh);
    }
}

#[test]
fn test_worked_example_end_to_end() {
    let leaves = elements(&[1, 2, 3]);
    let tree = MerkleTree::build(&leaves, 4, &AdditiveHasher).unwrap();
    assert_eq!(tree.root(), Some(&Element::from(18u64)));

    let proof = generate_proof(&Element::from(2u64), &leaves, Some(&tree), 4, &AdditiveHasher)
        .unwrap();
    assert!(proof.verify(&Element::from(18u64), 4, &AdditiveHasher).unwrap());

    let inputs = CircuitInputs::from_proof(&proof, 4).unwrap();
    assert_eq!(inputs.path_indices, vec![1, 0, 1, 1]);
    assert_eq!(inputs.into_proof().unwrap(), proof);
}

#[test]
fn test_random_leaves_with_seeded_rng() {
    let hasher = AffineHasher::default();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let depth = 8;

    for _ in 0..4 {
        let n = rng.gen_range(1..=capacity_of(depth));
        let leaves: Vec<Element> = (0..n)
            .map(|_| Element::from(rng.gen_range(0..AffineHasher::DEFAULT_MODULUS)))
            .collect();
        let tree = MerkleTree::build(&leaves, depth, &hasher).unwrap();
        let root = tree.root().unwrap();

        let pick = &leaves[rng.gen_range(0..n)];
        let proof = tree.proof_for(pick).unwrap();
        assert!(proof.verify(root, depth, &hasher).unwrap());
    }
}

#[test]
fn test_poseidon_tree_round_trip() {
    let hasher = PoseidonHasher::new();
    let leaves = elements(&[11, 22, 33, 44, 55]);
    let tree = MerkleTree::build(&leaves, 8, &hasher).unwrap();
    let root = tree.root().unwrap();

    assert!(root.fits_field());
    for leaf in &leaves {
        let proof = tree.proof_for(leaf).unwrap();
        assert!(proof.verify(root, 8, &hasher).unwrap());
    }
}

#[test]
fn test_poseidon_root_differs_from_affine_root() {
    let leaves = elements(&[1, 2, 3, 4]);
    let poseidon = MerkleTree::build(&leaves, 4, &PoseidonHasher::new()).unwrap();
    let affine = MerkleTree::build(&leaves, 4, &AffineHasher::default()).unwrap();

    assert_ne!(poseidon.root(), affine.root());
}

#[test]
fn test_shared_hasher_through_arc() {
    let hasher = std::sync::Arc::new(AffineHasher::default());
    let leaves = elements(&[1, 2, 3]);
    let tree = MerkleTree::build(&leaves, 4, &hasher).unwrap();

    let direct = MerkleTree::build(&leaves, 4, &AffineHasher::default()).unwrap();
    assert_eq!(tree.root(), direct.root());
    assert_eq!(hasher.name(), "affine");
}

#[test]
fn test_errors_surface_in_order() {
    let hasher = AffineHasher::default();

    assert_eq!(
        generate_proof(&Element::from(1u64), &[], None, 4, &hasher),
        Err(MerkleError::EmptyInput)
    );

    let out_of_domain = Element::from(AffineHasher::DEFAULT_MODULUS);
    assert!(matches!(
        generate_proof(&out_of_domain, &elements(&[1]), None, 4, &hasher),
        Err(MerkleError::InvalidElement(_))
    ));

    assert!(matches!(
        generate_proof(&Element::from(1u64), &elements(&[1]), None, 0, &hasher),
        Err(MerkleError::InvalidDepth { .. })
    ));
}
