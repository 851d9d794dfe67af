//! crates/recipe_finder_core/src/decode.rs
//!
//! Decoding of the backend's response bodies.
//!
//! The backend's output format drifted over time: search results arrive as a
//! wrapped list, as a JSON document encoded inside a string field, or as a bare
//! array whose first element holds that string. Each shape is an explicit
//! variant here so the precedence between them stays fixed and testable.

use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::domain::{HistoryEntry, Recipe};

const RAW_OUTPUT: &str = "raw_output";

/// The recognised shapes of a `/search` response body, in precedence order.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchBody {
    /// `{"recipes": [...]}`
    RecipeList(Vec<Value>),
    /// `{"raw_output": "<json>"}`
    RawOutput(String),
    /// `[{"raw_output": "<json>"}, ...]`
    WrappedRawOutput(String),
    Unrecognized,
}

impl SearchBody {
    /// Picks the first shape that matches `body`.
    ///
    /// `recipes` only counts when it is an array and `raw_output` only when it
    /// is a non-empty string.
    pub fn classify(body: Value) -> Self {
        match body {
            Value::Object(mut fields) => {
                if let Some(Value::Array(items)) = fields.remove("recipes") {
                    return SearchBody::RecipeList(items);
                }
                match non_empty_raw(fields.remove(RAW_OUTPUT)) {
                    Some(raw) => SearchBody::RawOutput(raw),
                    None => SearchBody::Unrecognized,
                }
            }
            Value::Array(items) => match items.into_iter().next() {
                Some(Value::Object(mut first)) => match non_empty_raw(first.remove(RAW_OUTPUT)) {
                    Some(raw) => SearchBody::WrappedRawOutput(raw),
                    None => SearchBody::Unrecognized,
                },
                _ => SearchBody::Unrecognized,
            },
            _ => SearchBody::Unrecognized,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            SearchBody::RecipeList(_) => "recipe_list",
            SearchBody::RawOutput(_) => "raw_output",
            SearchBody::WrappedRawOutput(_) => "wrapped_raw_output",
            SearchBody::Unrecognized => "unrecognized",
        }
    }

    /// The recipe list carried by this body, or `None` when it holds none
    /// (unrecognized shape, or embedded text that is not a JSON array).
    /// Elements are kept as received, whatever their shape.
    pub fn into_recipes(self) -> Option<Vec<Recipe>> {
        match self {
            SearchBody::RecipeList(items) => Some(recipes_from_items(items)),
            SearchBody::RawOutput(raw) | SearchBody::WrappedRawOutput(raw) => {
                recipes_from_text(&raw)
            }
            SearchBody::Unrecognized => None,
        }
    }
}

fn non_empty_raw(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(raw)) if !raw.is_empty() => Some(raw),
        _ => None,
    }
}

fn recipes_from_items(items: Vec<Value>) -> Vec<Recipe> {
    items.into_iter().map(Recipe::from).collect()
}

/// Decodes JSON text that should hold a recipe array.
pub fn recipes_from_text(raw: &str) -> Option<Vec<Recipe>> {
    serde_json::from_str::<Vec<Value>>(raw)
        .map(recipes_from_items)
        .map_err(|e| debug!("raw_output is not a recipe array: {}", e))
        .ok()
}

/// Extracts the recipe list of a `/recommend_llm` response.
///
/// A missing or non-array `recommended_recipes` reads as an empty list. When the
/// list is a single element carrying `raw_output`, the embedded text replaces
/// the list; if that text does not decode, the list is returned as received.
pub fn recommended_recipes(body: Value) -> Vec<Recipe> {
    let items = match body {
        Value::Object(mut fields) => match fields.remove("recommended_recipes") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    if let [Value::Object(only)] = items.as_slice() {
        if let Some(Value::String(raw)) = only.get(RAW_OUTPUT) {
            if !raw.is_empty() {
                if let Some(unwrapped) = recipes_from_text(raw) {
                    return unwrapped;
                }
            }
        }
    }

    recipes_from_items(items)
}

/// Reads `detected_ingredients` from a `/predict` response, without duplicates.
pub fn detected_ingredients(body: &Value) -> Vec<String> {
    match body.get("detected_ingredients") {
        Some(Value::Array(items)) => {
            unique(items.iter().filter_map(|v| v.as_str().map(str::to_owned)))
        }
        _ => Vec::new(),
    }
}

/// Drops repeated items, keeping the first occurrence of each.
pub fn unique<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Decodes a history listing; anything but an array of entries yields `None`.
pub fn history_entries(body: Value) -> Option<Vec<HistoryEntry>> {
    if !body.is_array() {
        return None;
    }
    serde_json::from_value(body)
        .map_err(|e| debug!("history listing did not decode: {}", e))
        .ok()
}
