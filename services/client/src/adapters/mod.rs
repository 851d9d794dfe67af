pub mod http;
pub mod reachability;

pub use http::HttpRecipeBackend;
pub use reachability::{FixedReachability, TcpReachability};
