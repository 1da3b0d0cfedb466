pub mod memory;
pub mod supabase;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
