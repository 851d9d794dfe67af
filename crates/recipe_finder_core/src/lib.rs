pub mod decode;
pub mod domain;
pub mod menu;
pub mod offline;
pub mod ports;
pub mod session;
pub mod shim;

pub use domain::{
    DetectionResult, HistoryEntry, HistoryKind, ImageRef, Recipe, RecommendationSource,
    SavedRecipe, SearchReport,
};
pub use menu::{MenuCatalog, MenuCategory, MenuItem};
pub use offline::OfflineCatalog;
pub use ports::{PortError, PortResult, ReachabilityProbe, RecipeBackend};
pub use session::SavedRecipes;
pub use shim::{history_label, Outcome, RecipeShim};
