use std::sync::Arc;

use sp_core::{ArticleStore, Error, Result};

pub mod backends;
pub mod persist;

pub use backends::memory::MemoryStore;
pub use backends::supabase::SupabaseStore;

#[cfg(feature = "sqlite")]
pub use backends::sqlite::SqliteStore;

/// Build the configured store backend.
///
/// "supabase" reads its credentials from the environment and fails with a
/// configuration error when they are absent; that error is fatal to the
/// process by design.
pub async fn create_store(kind: &str) -> Result<Arc<dyn ArticleStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "supabase" => Ok(Arc::new(SupabaseStore::from_env()?)),
        #[cfg(feature = "sqlite")]
        "sqlite" => Ok(Arc::new(
            SqliteStore::new(std::path::Path::new("articles.db")).await?,
        )),
        other => Err(Error::Config(format!("unknown store backend: {other}"))),
    }
}

pub mod prelude {
    pub use super::persist::save_articles;
    pub use super::{create_store, MemoryStore};
    pub use sp_core::ArticleStore;
}
