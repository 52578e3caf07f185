//! Content loaders for reading inventory data from files.
//!
//! Each loader reads one file and returns armory-core types; the
//! [`ContentFactory`] ties them to a data directory and validates the result.

pub mod config;
pub mod factory;
pub mod item;
pub mod sets;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use item::ItemLoader;
pub use sets::ArmorSetLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
