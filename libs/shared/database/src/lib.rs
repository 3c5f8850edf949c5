pub mod memory;
pub mod store;
pub mod supabase;

use std::sync::Arc;

use tracing::info;

use shared_config::AppConfig;

pub use memory::MemoryStore;
pub use store::SchedulingStore;
pub use supabase::{SupabaseClient, SupabaseStore};

/// Pick the store backing the service: Supabase when configured, otherwise
/// an in-process store that lives as long as the server.
pub fn connect(config: &AppConfig) -> Arc<dyn SchedulingStore> {
    if config.is_database_configured() {
        info!("Using Supabase store at {}", config.supabase_url);
        Arc::new(SupabaseStore::new(config))
    } else {
        info!("Using in-memory store");
        Arc::new(MemoryStore::new())
    }
}
