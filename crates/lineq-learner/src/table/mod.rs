//! Value table and its persistence
pub mod store;
pub mod value_table;

pub use self::store::{InMemoryStore, JsonFileStore, TableStore};
pub use self::value_table::ValueTable;
