//! crates/recipe_finder_core/src/menu.rs
//!
//! Curated menus shipped with the client and browsable without a backend.

use serde::{Deserialize, Serialize};

use crate::domain::SavedRecipe;
use crate::ports::{PortError, PortResult};
use crate::session::SavedRecipes;

const BUNDLED_MENUS: &str = include_str!("../assets/menus.json");

/// Ingredients and steps shown for menu items that don't carry their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDetail {
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<MenuDetail>,
}

impl MenuItem {
    pub fn to_saved(&self) -> SavedRecipe {
        SavedRecipe {
            id: self.id.clone(),
            title: self.title.clone(),
            time: self.time.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: String,
    pub title: String,
    /// Advertised size of the category; may exceed the items bundled here.
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub recipes: Vec<MenuItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCatalog {
    #[serde(default)]
    pub fallback: MenuDetail,
    #[serde(default)]
    pub categories: Vec<MenuCategory>,
}

impl MenuCatalog {
    pub fn bundled() -> PortResult<Self> {
        Self::from_json(BUNDLED_MENUS)
    }

    pub fn from_json(text: &str) -> PortResult<Self> {
        serde_json::from_str(text).map_err(|e| PortError::Decode(format!("menu catalog: {}", e)))
    }

    pub fn category(&self, id: &str) -> Option<&MenuCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn find_item(&self, id: &str) -> Option<&MenuItem> {
        self.categories
            .iter()
            .flat_map(|c| c.recipes.iter())
            .find(|item| item.id == id)
    }

    /// The item's own detail, or the catalog fallback when it has none.
    pub fn detail_for<'a>(&'a self, item: &'a MenuItem) -> &'a MenuDetail {
        match &item.detail {
            Some(detail) if !detail.ingredients.is_empty() || !detail.steps.is_empty() => detail,
            _ => &self.fallback,
        }
    }

    /// Toggles the bookmark of the item `id` in `saved`. Returns whether it is
    /// saved afterwards, or `None` for an id no category lists.
    pub fn toggle_saved(&self, saved: &mut SavedRecipes, id: &str) -> Option<bool> {
        self.find_item(id).map(|item| saved.toggle(item.to_saved()))
    }
}
