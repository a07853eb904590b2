//! # SQLite Storage Module
//!
//! SQLite-backed implementations of the storage traits, all sharing the one
//! [`DbConnection`](crate::db::DbConnection) pool handle created at process
//! start.

pub mod backup_repository;
pub mod customer_repository;
pub mod package_repository;

pub use backup_repository::BackupRepository;
pub use customer_repository::CustomerRepository;
pub use package_repository::PackageRepository;
