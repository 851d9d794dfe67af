//! crates/recipe_finder_core/src/domain.rs
//!
//! Defines the core data structures exchanged with the recipe backend.
//! The backend owns the schema, so recipe records are carried through
//! untouched and only read through lenient views.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Content type attached to every uploaded photo.
pub const IMAGE_MIME: &str = "image/jpeg";

//=========================================================================================
// Recipes
//=========================================================================================

/// A recipe record as produced by the backend or the bundled datasets.
///
/// The backend owns the schema, so the record is kept exactly as received and
/// serializes back byte-for-byte. The accessors below are read-only views that
/// tolerate missing or oddly typed fields. The search and recommendation
/// endpoints label the dish `title`, while the offline dataset and older
/// backend revisions use `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(Value);

impl Default for Recipe {
    fn default() -> Self {
        Recipe(Value::Object(Map::new()))
    }
}

impl From<Value> for Recipe {
    fn from(value: Value) -> Self {
        Recipe(value)
    }
}

impl From<Recipe> for Value {
    fn from(recipe: Recipe) -> Self {
        recipe.0
    }
}

impl Recipe {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Any field of the record, e.g. `match_score` or `raw_output`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn title(&self) -> Option<&str> {
        self.field("title").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.field("name").and_then(Value::as_str)
    }

    /// Cooking time as display text; numbers are rendered as-is.
    pub fn time(&self) -> Option<String> {
        self.field("time").and_then(text_of)
    }

    pub fn ingredients(&self) -> Vec<&str> {
        self.field("ingredients").map(list_of).unwrap_or_default()
    }

    pub fn steps(&self) -> Vec<&str> {
        self.field("steps").map(list_of).unwrap_or_default()
    }

    /// The label shown for this recipe: `title`, else `name`. Blank strings don't count.
    pub fn display_name(&self) -> Option<&str> {
        [self.title(), self.name()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }

    /// True when the ingredient list contains `ingredient` verbatim.
    pub fn uses(&self, ingredient: &str) -> bool {
        self.ingredients().contains(&ingredient)
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// A list of strings, or a single string (the keyword-matching backend sends `steps: ""`).
fn list_of(value: &Value) -> Vec<&str> {
    match value {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.as_str()],
        _ => Vec::new(),
    }
}

//=========================================================================================
// History
//=========================================================================================

/// The action a history entry records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    #[default]
    Search,
    Image,
    /// Any tag this client does not know about.
    #[serde(other)]
    Other,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Search => "search",
            HistoryKind::Image => "image",
            HistoryKind::Other => "other",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(HistoryKind::Search),
            "image" => Ok(HistoryKind::Image),
            other => Err(format!("unknown history type '{}'", other)),
        }
    }
}

/// A backend-persisted record of a past search or photo detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub recipe_name: String,
    #[serde(rename = "type", default)]
    pub kind: HistoryKind,
    /// Server-assigned; usually naive ISO-8601 with second precision.
    #[serde(default)]
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.naive_local());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }

    /// Relative age of the entry as of `now`, e.g. `5 min ago`.
    pub fn age_label(&self, now: NaiveDateTime) -> String {
        let Some(at) = self.parsed_timestamp() else {
            return self.timestamp.clone();
        };
        let elapsed = now.signed_duration_since(at);
        let minutes = elapsed.num_minutes();
        if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{} min ago", minutes)
        } else if elapsed.num_hours() < 24 {
            format!("{} h ago", elapsed.num_hours())
        } else {
            format!("{} d ago", elapsed.num_days())
        }
    }
}

//=========================================================================================
// Photo detection
//=========================================================================================

/// A local image selected for ingredient detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub path: PathBuf,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File name used for the image at `index` in an upload.
    pub fn upload_name(index: usize) -> String {
        format!("image_{}.jpg", index)
    }
}

/// Where the recommended recipes of a detection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Online,
    Offline,
}

/// Detected ingredients plus recipe candidates for one photo upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionResult {
    pub detected_ingredients: Vec<String>,
    pub recommended_recipes: Vec<Recipe>,
    /// Absent when the flow failed and both lists were reset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<RecommendationSource>,
}

/// The outcome of a home-screen search: results plus the refreshed recent history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchReport {
    pub recipes: Vec<Recipe>,
    pub latest_history: Vec<HistoryEntry>,
}

//=========================================================================================
// Bookmarks
//=========================================================================================

/// A bookmarked recipe. Lives only as long as the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}
