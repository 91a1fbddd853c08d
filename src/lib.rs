pub mod app;
pub mod errors;
pub mod handlers;
pub mod insights;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
pub mod toast;
pub mod ui;

pub use app::router;
pub use insights::{aggregate, aggregate_at, summarize};
pub use state::AppState;
pub use storage::{Storage, StorageKey};
pub use store::{KeyValueStore, MemoryStore, load_snapshot, resolve_data_path, resolve_quota};
