pub mod json_backend;
pub mod memory;

use crate::errors::Result;

/// Entry holding the JSON-serialised transaction list.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Entry holding the JSON-serialised budget map.
pub const BUDGETS_KEY: &str = "budgets";

/// Abstraction over string key-value backends holding the ledger entries.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
