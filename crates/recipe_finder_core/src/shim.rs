//! crates/recipe_finder_core/src/shim.rs
//!
//! The Remote Access Shim: turns application intents (text search, photo
//! recommendation, history append and read) into backend calls and normalizes
//! whatever comes back.
//!
//! Every operation exists in two forms. The `try_*` form reports an [`Outcome`]
//! that tells data, an unusable body and a failed call apart. The plain form
//! collapses anything but data into the operation's empty default and never
//! fails, which is the contract the UI layer is built on.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::decode::{self, SearchBody};
use crate::domain::{
    DetectionResult, HistoryEntry, HistoryKind, ImageRef, Recipe, RecommendationSource,
    SearchReport,
};
use crate::offline::OfflineCatalog;
use crate::ports::{PortError, ReachabilityProbe, RecipeBackend};

/// History label recorded for a photo upload when neither a recipe name nor
/// any ingredient is available. Matches the label the backend already stores.
pub const IMAGE_HISTORY_PLACEHOLDER: &str = "Ảnh nguyên liệu";

//=========================================================================================
// Outcome
//=========================================================================================

/// The result of one shim operation before it is collapsed for the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The backend answered with a usable body.
    Data(T),
    /// The backend answered, but in a shape none of the decoders accept.
    Empty,
    /// The call itself failed (transport, status, body parse).
    Failed(PortError),
}

impl<T> Outcome<T> {
    fn from_decoded(value: Option<T>) -> Self {
        match value {
            Some(value) => Outcome::Data(value),
            None => Outcome::Empty,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Outcome::Data(_))
    }

    /// The data, or `T::default()` for both `Empty` and `Failed`.
    pub fn into_value(self) -> T
    where
        T: Default,
    {
        match self {
            Outcome::Data(value) => value,
            Outcome::Empty | Outcome::Failed(_) => T::default(),
        }
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Data(value) => Outcome::Data(f(value)),
            Outcome::Empty => Outcome::Empty,
            Outcome::Failed(e) => Outcome::Failed(e),
        }
    }
}

/// Label for the history entry of a photo upload: the first recipe's name,
/// else up to three detected ingredients, else [`IMAGE_HISTORY_PLACEHOLDER`].
pub fn history_label(recipes: &[Recipe], detected: &[String]) -> String {
    if let Some(name) = recipes.first().and_then(Recipe::display_name) {
        return name.to_string();
    }
    let joined = detected
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        IMAGE_HISTORY_PLACEHOLDER.to_string()
    } else {
        joined
    }
}

//=========================================================================================
// The Shim
//=========================================================================================

#[derive(Clone)]
pub struct RecipeShim {
    backend: Arc<dyn RecipeBackend>,
    reachability: Arc<dyn ReachabilityProbe>,
    offline: Arc<OfflineCatalog>,
}

impl RecipeShim {
    pub fn new(
        backend: Arc<dyn RecipeBackend>,
        reachability: Arc<dyn ReachabilityProbe>,
        offline: OfflineCatalog,
    ) -> Self {
        Self {
            backend,
            reachability,
            offline: Arc::new(offline),
        }
    }

    pub fn offline_catalog(&self) -> &OfflineCatalog {
        &self.offline
    }

    // --- Text search ---

    pub async fn try_search_recipes(&self, query: &str) -> Outcome<Vec<Recipe>> {
        let body = match self.backend.search(query).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "search request failed");
                return Outcome::Failed(e);
            }
        };
        let classified = SearchBody::classify(body);
        debug!(shape = classified.shape(), "search response received");
        Outcome::from_decoded(classified.into_recipes())
    }

    /// Recipes matching `query`; empty on any failure.
    pub async fn search_recipes(&self, query: &str) -> Vec<Recipe> {
        self.try_search_recipes(query).await.into_value()
    }

    // --- Photo-based recommendation ---

    /// Detects ingredients in `images` and recommends recipes for them.
    ///
    /// Reachability is sampled once up front. When reachable, recipes come from
    /// the recommendation endpoint; otherwise from the offline dataset. Either
    /// way a history entry is recorded on a best-effort basis. A failure at any
    /// step fails the whole operation; partial results are never reported.
    pub async fn try_recommend_from_photos(&self, images: &[ImageRef]) -> Outcome<DetectionResult> {
        let online = self.reachability.is_reachable().await;
        debug!(images = images.len(), online, "starting photo recommendation");

        let predicted = match self.backend.predict(images).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "ingredient detection failed");
                return Outcome::Failed(e);
            }
        };
        let detected = decode::detected_ingredients(&predicted);

        let (recipes, source) = if online {
            let body = match self.backend.recommend(images).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "recipe recommendation failed");
                    return Outcome::Failed(e);
                }
            };
            (decode::recommended_recipes(body), RecommendationSource::Online)
        } else {
            (self.offline.matching(&detected), RecommendationSource::Offline)
        };

        self.add_history(&history_label(&recipes, &detected), HistoryKind::Image)
            .await;

        Outcome::Data(DetectionResult {
            detected_ingredients: detected,
            recommended_recipes: recipes,
            source: Some(source),
        })
    }

    /// Same as [`Self::try_recommend_from_photos`], with failures collapsed to
    /// empty ingredients and empty recipes.
    pub async fn recommend_from_photos(&self, images: &[ImageRef]) -> DetectionResult {
        self.try_recommend_from_photos(images).await.into_value()
    }

    // --- History ---

    /// Appends a history entry. Failures are logged and otherwise ignored.
    pub async fn add_history(&self, recipe_name: &str, kind: HistoryKind) {
        if let Err(e) = self.backend.add_history(recipe_name, kind).await {
            debug!(error = %e, kind = %kind, "history append dropped");
        }
    }

    pub async fn try_latest_history(&self) -> Outcome<Vec<HistoryEntry>> {
        match self.backend.latest_history().await {
            Ok(body) => Outcome::from_decoded(decode::history_entries(body)),
            Err(e) => {
                warn!(error = %e, "latest history request failed");
                Outcome::Failed(e)
            }
        }
    }

    pub async fn latest_history(&self) -> Vec<HistoryEntry> {
        self.try_latest_history().await.into_value()
    }

    pub async fn try_all_history(&self) -> Outcome<Vec<HistoryEntry>> {
        match self.backend.all_history().await {
            Ok(body) => Outcome::from_decoded(decode::history_entries(body)),
            Err(e) => {
                warn!(error = %e, "history request failed");
                Outcome::Failed(e)
            }
        }
    }

    pub async fn all_history(&self) -> Vec<HistoryEntry> {
        self.try_all_history().await.into_value()
    }

    // --- Home-screen flow ---

    /// Records `query` in the history, refreshes the recent history and runs
    /// the search. A blank query does nothing.
    pub async fn search_and_record(&self, query: &str) -> SearchReport {
        let query = query.trim();
        if query.is_empty() {
            return SearchReport::default();
        }

        self.add_history(query, HistoryKind::Search).await;
        let latest_history = self.latest_history().await;
        let recipes = self.search_recipes(query).await;

        SearchReport {
            recipes,
            latest_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockReachabilityProbe, MockRecipeBackend};
    use serde_json::{json, Value};

    fn offline_catalog() -> OfflineCatalog {
        OfflineCatalog::from_json(
            r#"[
                {"name": "Trứng chiên", "ingredients": ["egg", "onion"]},
                {"name": "Gà luộc", "ingredients": ["chicken"]}
            ]"#,
        )
        .unwrap()
    }

    fn shim(backend: MockRecipeBackend, online: bool) -> RecipeShim {
        let mut probe = MockReachabilityProbe::new();
        probe.expect_is_reachable().return_const(online);
        RecipeShim::new(Arc::new(backend), Arc::new(probe), offline_catalog())
    }

    fn images() -> Vec<ImageRef> {
        vec![ImageRef::new("a.jpg"), ImageRef::new("b.jpg")]
    }

    fn to_json<T: serde::Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap()
    }

    // --- search ---

    #[tokio::test]
    async fn search_returns_wrapped_recipes() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_search()
            .withf(|query: &str| query == "pho")
            .returning(|_| Ok(json!({"success": true, "recipes": [{"title": "A"}]})));

        let recipes = shim(backend, true).search_recipes("pho").await;

        assert_eq!(to_json(&recipes), json!([{"title": "A"}]));
    }

    #[tokio::test]
    async fn search_decodes_double_encoded_bodies() {
        let mut backend = MockRecipeBackend::new();
        let mut bodies = vec![
            json!([{"raw_output": "[{\"title\":\"C\"}]"}]),
            json!({"raw_output": "[{\"title\":\"B\"}]"}),
        ];
        backend
            .expect_search()
            .times(2)
            .returning(move |_| Ok(bodies.pop().unwrap()));
        let shim = shim(backend, true);

        assert_eq!(to_json(&shim.search_recipes("x").await), json!([{"title": "B"}]));
        assert_eq!(to_json(&shim.search_recipes("x").await), json!([{"title": "C"}]));
    }

    #[tokio::test]
    async fn search_keeps_records_it_cannot_read() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_search()
            .returning(|_| Ok(json!({"recipes": [{"title": "A", "time": 30}, null]})));

        let recipes = shim(backend, true).search_recipes("x").await;

        assert_eq!(to_json(&recipes), json!([{"title": "A", "time": 30}, null]));
    }

    #[tokio::test]
    async fn search_with_bad_raw_output_is_empty_not_failed() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_search()
            .returning(|_| Ok(json!({"raw_output": "not-json"})));

        let outcome = shim(backend, true).try_search_recipes("x").await;

        assert_eq!(outcome, Outcome::Empty);
        assert!(outcome.into_value().is_empty());
    }

    #[tokio::test]
    async fn search_transport_failure_yields_empty_list() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_search()
            .returning(|_| Err(PortError::Transport("connection refused".to_string())));
        let shim = shim(backend, true);

        assert!(matches!(
            shim.try_search_recipes("x").await,
            Outcome::Failed(PortError::Transport(_))
        ));
        assert!(shim.search_recipes("x").await.is_empty());
    }

    // --- photo recommendation ---

    #[tokio::test]
    async fn online_recommendation_dedups_and_records_first_title() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_predict()
            .withf(|images: &[ImageRef]| images.len() == 2)
            .returning(|_| Ok(json!({"detected_ingredients": ["egg", "egg", "fish"]})));
        backend.expect_recommend().returning(|_| {
            Ok(json!({"recommended_recipes": [{"raw_output": "[{\"title\":\"Canh chua\"}]"}]}))
        });
        backend
            .expect_add_history()
            .withf(|name: &str, kind: &HistoryKind| name == "Canh chua" && *kind == HistoryKind::Image)
            .times(1)
            .returning(|_, _| Ok(()));

        let result = shim(backend, true).recommend_from_photos(&images()).await;

        let mut detected = result.detected_ingredients.clone();
        detected.sort();
        assert_eq!(detected, vec!["egg", "fish"]);
        assert_eq!(result.recommended_recipes[0].display_name(), Some("Canh chua"));
        assert_eq!(result.source, Some(RecommendationSource::Online));
    }

    #[tokio::test]
    async fn offline_recommendation_filters_bundled_dataset() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_predict()
            .returning(|_| Ok(json!({"detected_ingredients": ["egg"]})));
        backend.expect_recommend().never();
        backend
            .expect_add_history()
            .withf(|name: &str, _: &HistoryKind| name == "Trứng chiên")
            .returning(|_, _| Ok(()));

        let result = shim(backend, false).recommend_from_photos(&images()).await;

        assert_eq!(result.recommended_recipes.len(), 1);
        assert!(result.recommended_recipes.iter().all(|r| r.uses("egg")));
        assert_eq!(result.source, Some(RecommendationSource::Offline));
    }

    #[tokio::test]
    async fn offline_without_match_labels_history_with_ingredients() {
        let mut backend = MockRecipeBackend::new();
        backend.expect_predict().returning(|_| {
            Ok(json!({"detected_ingredients": ["tofu", "leek", "rice", "salt"]}))
        });
        backend
            .expect_add_history()
            .withf(|name: &str, _: &HistoryKind| name == "tofu, leek, rice")
            .times(1)
            .returning(|_, _| Ok(()));

        let result = shim(backend, false).recommend_from_photos(&images()).await;

        assert!(result.recommended_recipes.is_empty());
        assert_eq!(result.detected_ingredients.len(), 4);
    }

    #[tokio::test]
    async fn history_failure_does_not_fail_recommendation() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_predict()
            .returning(|_| Ok(json!({"detected_ingredients": ["egg"]})));
        backend
            .expect_recommend()
            .returning(|_| Ok(json!({"recommended_recipes": [{"title": "Omelette"}]})));
        backend
            .expect_add_history()
            .returning(|_, _| Err(PortError::Status(500)));

        let outcome = shim(backend, true).try_recommend_from_photos(&images()).await;

        assert!(outcome.is_data());
    }

    #[tokio::test]
    async fn recommendation_failure_discards_detected_ingredients() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_predict()
            .returning(|_| Ok(json!({"detected_ingredients": ["egg"]})));
        backend
            .expect_recommend()
            .returning(|_| Err(PortError::Status(502)));
        backend.expect_add_history().never();

        let result = shim(backend, true).recommend_from_photos(&images()).await;

        assert_eq!(result, DetectionResult::default());
    }

    #[tokio::test]
    async fn detection_failure_collapses_even_offline() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_predict()
            .returning(|_| Err(PortError::Transport("unreachable".to_string())));

        let result = shim(backend, false).recommend_from_photos(&images()).await;

        assert!(result.detected_ingredients.is_empty());
        assert!(result.recommended_recipes.is_empty());
        assert_eq!(result.source, None);
    }

    // --- history ---

    #[tokio::test]
    async fn latest_history_is_stable_between_reads() {
        let mut backend = MockRecipeBackend::new();
        backend.expect_latest_history().times(2).returning(|| {
            Ok(json!([
                {"recipe_name": "pho", "type": "search", "timestamp": "2025-01-01T08:00:00"},
                {"recipe_name": "egg", "type": "image", "timestamp": "2025-01-01T07:00:00"}
            ]))
        });
        let shim = shim(backend, true);

        let first = shim.latest_history().await;
        let second = shim.latest_history().await;

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn history_reads_fail_to_empty() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_latest_history()
            .returning(|| Err(PortError::Status(500)));
        backend
            .expect_all_history()
            .returning(|| Ok(json!({"detail": "Internal Server Error"})));
        let shim = shim(backend, true);

        assert!(shim.latest_history().await.is_empty());
        assert_eq!(shim.try_all_history().await, Outcome::Empty);
    }

    #[tokio::test]
    async fn add_history_swallows_errors() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_add_history()
            .times(1)
            .returning(|_, _| Err(PortError::Transport("timeout".to_string())));

        shim(backend, true).add_history("pho", HistoryKind::Search).await;
    }

    // --- home-screen flow ---

    #[tokio::test]
    async fn search_and_record_survives_history_server_error() {
        let mut backend = MockRecipeBackend::new();
        backend
            .expect_add_history()
            .withf(|name: &str, kind: &HistoryKind| name == "pho bo" && *kind == HistoryKind::Search)
            .returning(|_, _| Err(PortError::Status(500)));
        backend
            .expect_latest_history()
            .returning(|| Err(PortError::Status(500)));
        backend
            .expect_search()
            .withf(|query: &str| query == "pho bo")
            .returning(|_| Ok(json!({"recipes": [{"title": "Phở bò"}]})));

        let report = shim(backend, true).search_and_record("  pho bo ").await;

        assert_eq!(report.recipes.len(), 1);
        assert!(report.latest_history.is_empty());
    }

    #[tokio::test]
    async fn blank_query_sends_nothing() {
        let backend = MockRecipeBackend::new();

        let report = shim(backend, true).search_and_record("   ").await;

        assert_eq!(report, SearchReport::default());
    }

    // --- labels ---

    #[test]
    fn history_label_fallbacks() {
        let named = vec![Recipe::from(json!({"name": "Xôi lạc"}))];
        let detected = vec!["egg".to_string(), "fish".to_string()];

        assert_eq!(history_label(&named, &detected), "Xôi lạc");
        assert_eq!(history_label(&[Recipe::default()], &detected), "egg, fish");
        assert_eq!(history_label(&[], &[]), IMAGE_HISTORY_PLACEHOLDER);
    }
}
