//! Wholesale-replace storage used by backup restore.
//!
//! Restore is the one multi-statement unit in the system: both tables are
//! cleared and re-filled inside a single transaction so a failure partway
//! through rolls back to the pre-import state. Rows are inserted with their
//! exported identifiers so customer→package links survive the round trip.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;

use crate::db::DbConnection;
use crate::domain::models::{Customer, Package};
use crate::storage::traits::BackupStorage;

/// Backup repository over the shared SQLite pool
#[derive(Clone)]
pub struct BackupRepository {
    db: DbConnection,
}

impl BackupRepository {
    /// Create a new backup repository
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BackupStorage for BackupRepository {
    async fn replace_all(&self, packages: &[Package], customers: &[Customer]) -> Result<()> {
        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .context("Failed to begin restore transaction")?;

        sqlx::query("DELETE FROM customers")
            .execute(&mut *tx)
            .await
            .context("Failed to clear customers")?;
        sqlx::query("DELETE FROM packages")
            .execute(&mut *tx)
            .await
            .context("Failed to clear packages")?;

        for package in packages {
            sqlx::query("INSERT INTO packages (id, name, description, rate) VALUES (?, ?, ?, ?)")
                .bind(package.id)
                .bind(&package.name)
                .bind(&package.description)
                .bind(package.rate)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to restore package '{}'", package.name))?;
        }

        for customer in customers {
            sqlx::query(
                "INSERT INTO customers (id, customerId, name, phone, address, packageId, monthlyRate, status, expiryDate, lastPaymentDate)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(customer.id)
            .bind(&customer.customer_code)
            .bind(&customer.name)
            .bind(&customer.phone)
            .bind(&customer.address)
            .bind(customer.package_id)
            .bind(customer.monthly_rate)
            .bind(customer.status.to_string())
            .bind(customer.expiry_date.format("%Y-%m-%d").to_string())
            .bind(customer.last_payment_date.map(|d| d.to_rfc3339()))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to restore customer '{}'", customer.customer_code))?;
        }

        tx.commit().await.context("Failed to commit restore transaction")?;

        info!(
            "Restored store wholesale: {} packages, {} customers",
            packages.len(),
            customers.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::BillingStatus;
    use crate::storage::sqlite::{CustomerRepository, PackageRepository};
    use crate::storage::traits::{CustomerStorage, PackageStorage};
    use chrono::NaiveDate;

    fn package(id: i64, name: &str) -> Package {
        Package {
            id,
            name: name.to_string(),
            description: format!("{} plan", name),
            rate: 20.0,
        }
    }

    fn customer(id: i64, code: &str, package_id: Option<i64>) -> Customer {
        Customer {
            id,
            customer_code: code.to_string(),
            name: format!("Customer {}", code),
            phone: "555-0000".to_string(),
            address: "1 Main St".to_string(),
            package_id,
            monthly_rate: 20.0,
            status: BillingStatus::Pending,
            expiry_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            last_payment_date: None,
        }
    }

    #[tokio::test]
    async fn test_replace_all_replaces_previous_contents() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let packages = PackageRepository::new(db.clone());
        let customers = CustomerRepository::new(db.clone());
        let backup = BackupRepository::new(db);

        packages.store_package(&package(0, "Old plan")).await.expect("Failed to store");
        customers
            .store_customer(&customer(0, "OLD-001", None))
            .await
            .expect("Failed to store");

        backup
            .replace_all(
                &[package(5, "New plan")],
                &[customer(9, "NEW-001", Some(5))],
            )
            .await
            .expect("Failed to replace");

        let all_packages = packages.list_packages().await.expect("Failed to list");
        assert_eq!(all_packages.len(), 1);
        assert_eq!(all_packages[0].id, 5);
        assert_eq!(all_packages[0].name, "New plan");

        let all_customers = customers.list_customers().await.expect("Failed to list");
        assert_eq!(all_customers.len(), 1);
        assert_eq!(all_customers[0].id, 9);
        // The plan link survives because ids are preserved
        assert_eq!(all_customers[0].package_id, Some(5));
    }

    #[tokio::test]
    async fn test_failed_replace_rolls_back() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let packages = PackageRepository::new(db.clone());
        let backup = BackupRepository::new(db);

        packages.store_package(&package(0, "Kept plan")).await.expect("Failed to store");

        // Two packages with the same name violate UNIQUE mid-transaction
        let result = backup
            .replace_all(&[package(1, "Dup"), package(2, "Dup")], &[])
            .await;
        assert!(result.is_err());

        let all_packages = packages.list_packages().await.expect("Failed to list");
        assert_eq!(all_packages.len(), 1);
        assert_eq!(all_packages[0].name, "Kept plan");
    }
}
