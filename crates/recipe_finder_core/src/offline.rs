//! crates/recipe_finder_core/src/offline.rs
//!
//! The statically bundled recipe dataset used when the network is unreachable.

use crate::domain::Recipe;
use crate::ports::{PortError, PortResult};

const BUNDLED_RECIPES: &str = include_str!("../assets/offline_recipes.json");

#[derive(Debug, Clone, Default)]
pub struct OfflineCatalog {
    recipes: Vec<Recipe>,
}

impl OfflineCatalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// The dataset compiled into the crate.
    pub fn bundled() -> PortResult<Self> {
        Self::from_json(BUNDLED_RECIPES)
    }

    /// Parses a dataset: a JSON array of recipe records.
    pub fn from_json(text: &str) -> PortResult<Self> {
        serde_json::from_str(text)
            .map(Self::new)
            .map_err(|e| PortError::Decode(format!("offline dataset: {}", e)))
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Recipes whose ingredient list contains at least one of `detected`, in dataset order.
    pub fn matching(&self, detected: &[String]) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| detected.iter().any(|ingredient| recipe.uses(ingredient)))
            .cloned()
            .collect()
    }
}
