use crate::clock::SystemClock;
use crate::config::StoreKind;
use crate::storage::MemoryStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub enum Backend {
    Cookie,
    Memory(Arc<Mutex<MemoryStore>>),
}

#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub clock: SystemClock,
}

impl AppState {
    pub fn new(store: StoreKind) -> Self {
        let backend = match store {
            StoreKind::Cookie => Backend::Cookie,
            StoreKind::Memory => Backend::Memory(Arc::new(Mutex::new(MemoryStore::new()))),
        };
        Self {
            backend,
            clock: SystemClock,
        }
    }
}
