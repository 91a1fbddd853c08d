use crate::storage::Storage;
use crate::store::MemoryStore;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub storage: Arc<Mutex<Storage<MemoryStore>>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, store: MemoryStore) -> Self {
        Self {
            data_path,
            storage: Arc::new(Mutex::new(Storage::new(store))),
        }
    }
}
