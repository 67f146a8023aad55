pub mod capacity;
mod chain;
pub mod chain_map;
pub mod config;
pub mod error;
pub mod hasher;
pub use capacity::{MAX_CAPACITY, MIN_CAPACITY};
pub use chain_map::{ChainedMap, ResizeProgress};
pub use config::TableConfig;
pub use error::{Absence, Result, TableError};
pub use hasher::HashKeys;
