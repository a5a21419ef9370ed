//! Shared application state.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::RwLock;

use membership_circuits::{Element, MerkleTree, PoseidonHasher};
use membership_prover::CircuitKeyPair;

use crate::config::ServerConfig;

/// Application state shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    pub hasher: PoseidonHasher,
    pub keys: Option<Arc<CircuitKeyPair>>,
    pub trees: RwLock<TreeCache>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: ServerConfig, keys: Option<CircuitKeyPair>) -> Self {
        let trees = RwLock::new(TreeCache::new(config.max_cached_trees));
        Self {
            config,
            hasher: PoseidonHasher::new(),
            keys: keys.map(Arc::new),
            trees,
        }
    }
}

/// Built trees keyed by root, evicted oldest first.
pub struct TreeCache {
    trees: HashMap<Element, Arc<MerkleTree>>,
    order: VecDeque<Element>,
    capacity: usize,
}

impl TreeCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            trees: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, root: &Element) -> Option<Arc<MerkleTree>> {
        self.trees.get(root).cloned()
    }

    /// Cache `tree` under `root`. Re-inserting a known root keeps the existing entry.
    pub fn insert(&mut self, root: Element, tree: Arc<MerkleTree>) {
        if self.trees.contains_key(&root) {
            return;
        }
        while self.trees.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.trees.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(root.clone());
        self.trees.insert(root, tree);
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
