//! crates/recipe_finder_core/src/session.rs
//!
//! Session-scoped bookmarks.
//!
//! Saved recipes live in memory only. The store starts empty, is dropped with
//! the process, and nothing in it survives a restart.

use crate::domain::SavedRecipe;

#[derive(Debug, Clone, Default)]
pub struct SavedRecipes {
    items: Vec<SavedRecipe>,
}

impl SavedRecipes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves `recipe` if its id is not saved yet, otherwise removes it.
    /// Returns whether the recipe is saved afterwards.
    pub fn toggle(&mut self, recipe: SavedRecipe) -> bool {
        if let Some(pos) = self.items.iter().position(|r| r.id == recipe.id) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(recipe);
            true
        }
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.items.iter().any(|r| r.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.id.as_str()).collect()
    }

    /// Saved recipes, oldest first.
    pub fn list(&self) -> &[SavedRecipe] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
