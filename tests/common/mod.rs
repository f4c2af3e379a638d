use krishi_core::application::session::SessionService;
use krishi_core::infrastructure::in_memory::{
    InMemoryAccountStore, InMemoryProfileStore, InMemorySessionStore,
};
use krishi_core::infrastructure::json_file::JsonFileStore;
use std::path::Path;

#[allow(dead_code)]
pub async fn in_memory_service() -> SessionService {
    SessionService::initialize(
        Box::new(InMemoryAccountStore::new()),
        Box::new(InMemorySessionStore::new()),
        Box::new(InMemoryProfileStore::new()),
    )
    .await
    .expect("in-memory initialization cannot fail")
}

/// A service backed by a single JSON file, reopened per call to simulate a
/// process restart.
#[allow(dead_code)]
pub async fn file_service(path: &Path) -> SessionService {
    let store = JsonFileStore::open(path);
    SessionService::initialize(
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(store),
    )
    .await
    .expect("file-backed initialization failed")
}
