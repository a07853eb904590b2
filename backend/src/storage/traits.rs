//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::models::{BillingStatus, Customer, Package};

/// Trait defining the interface for package storage operations
#[async_trait]
pub trait PackageStorage: Send + Sync {
    /// Store a new package; the store assigns the identifier.
    /// Returns the stored package with its assigned id.
    async fn store_package(&self, package: &Package) -> Result<Package>;

    /// Retrieve a specific package by id
    async fn get_package(&self, id: i64) -> Result<Option<Package>>;

    /// Retrieve a package by its unique name
    async fn get_package_by_name(&self, name: &str) -> Result<Option<Package>>;

    /// List all packages ordered by name ascending
    async fn list_packages(&self) -> Result<Vec<Package>>;

    /// Update an existing package (full-record replace keyed by id)
    async fn update_package(&self, package: &Package) -> Result<()>;

    /// Delete a package by id; deleting a missing id is a no-op
    async fn delete_package(&self, id: i64) -> Result<()>;
}

/// Trait defining the interface for customer storage operations
#[async_trait]
pub trait CustomerStorage: Send + Sync {
    /// Store a new customer; the store assigns the identifier.
    /// Returns the stored customer with its assigned id.
    async fn store_customer(&self, customer: &Customer) -> Result<Customer>;

    /// Retrieve a specific customer by id
    async fn get_customer(&self, id: i64) -> Result<Option<Customer>>;

    /// Retrieve a customer by its unique business-facing code
    async fn get_customer_by_code(&self, code: &str) -> Result<Option<Customer>>;

    /// List all customers ordered by name ascending
    async fn list_customers(&self) -> Result<Vec<Customer>>;

    /// Update an existing customer (full-record replace keyed by id)
    async fn update_customer(&self, customer: &Customer) -> Result<()>;

    /// Update only the stored status field of a customer
    async fn update_customer_status(&self, id: i64, status: BillingStatus) -> Result<()>;

    /// Apply a renewal in one atomic update: status becomes `Paid`, the
    /// expiry advances to `new_expiry` and the payment instant is stamped
    async fn apply_renewal(
        &self,
        id: i64,
        new_expiry: NaiveDate,
        paid_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Delete a customer by id; deleting a missing id is a no-op
    async fn delete_customer(&self, id: i64) -> Result<()>;
}

/// Trait defining the wholesale-replace operation used by backup restore
#[async_trait]
pub trait BackupStorage: Send + Sync {
    /// Clear both tables and insert the replacement rows inside a single
    /// transaction; a failure partway through leaves the store untouched
    async fn replace_all(&self, packages: &[Package], customers: &[Customer]) -> Result<()>;
}
