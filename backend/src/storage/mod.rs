//! Storage layer: trait seam plus the SQLite implementation.

pub mod sqlite;
pub mod traits;

pub use traits::{BackupStorage, CustomerStorage, PackageStorage};
