//! # ISP Billing Backend
//!
//! Contains all non-UI logic for the subscriber billing tracker.
//!
//! The backend is UI-agnostic: screens talk to the services exposed here and
//! device capabilities (receipt printer, reminder transport) are injected
//! behind the traits in [`domain::collaborators`].
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! UI Layer (screens, out of scope here)
//!     ↓
//! Domain Layer (business logic, services)
//!     ↓
//! Storage Layer (SQLite persistence)
//! ```
//!
//! One [`db::DbConnection`] is created at process start and passed
//! explicitly to every repository; there is no ambient global handle.

use anyhow::Result;

pub mod db;
pub mod domain;
pub mod storage;

pub use db::DbConnection;

use storage::sqlite::{BackupRepository, CustomerRepository, PackageRepository};

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub package_service: domain::PackageService,
    pub customer_service: domain::CustomerService,
    pub billing_service: domain::BillingService,
    pub reminder_service: domain::ReminderService,
    pub backup_service: domain::BackupService,
}

impl Backend {
    /// Create a backend over an already-opened connection
    pub fn new(db: DbConnection) -> Self {
        let package_repository = PackageRepository::new(db.clone());
        let customer_repository = CustomerRepository::new(db.clone());
        let backup_repository = BackupRepository::new(db);

        let package_service = domain::PackageService::new(package_repository.clone());
        let customer_service = domain::CustomerService::new(
            customer_repository.clone(),
            package_repository.clone(),
        );
        let billing_service = domain::BillingService::new(
            customer_repository.clone(),
            package_repository.clone(),
        );
        let reminder_service = domain::ReminderService::new(
            customer_repository.clone(),
            package_repository.clone(),
        );
        let backup_service = domain::BackupService::new(
            customer_repository,
            package_repository,
            backup_repository,
        );

        Backend {
            package_service,
            customer_service,
            billing_service,
            reminder_service,
            backup_service,
        }
    }

    /// Open the standard database and build the backend; called once at
    /// process start
    pub async fn init() -> Result<Self> {
        let db = DbConnection::init().await?;
        Ok(Self::new(db))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::billing::RecordPaymentCommand;
    use crate::domain::commands::customers::CreateCustomerCommand;
    use crate::domain::commands::packages::CreatePackageCommand;
    use chrono::NaiveDate;

    // End-to-end wiring: every service works against the one shared handle
    #[tokio::test]
    async fn test_backend_services_share_one_store() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let backend = Backend::new(db);
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let package = backend
            .package_service
            .create_package(CreatePackageCommand {
                name: "Basic".to_string(),
                description: "Entry plan".to_string(),
                rate: 15.0,
            })
            .await
            .expect("Failed to create package");

        let customer = backend
            .customer_service
            .create_customer(
                CreateCustomerCommand {
                    customer_code: "CUST-001".to_string(),
                    name: "Alice".to_string(),
                    phone: "555-0001".to_string(),
                    address: "1 Main St".to_string(),
                    package_id: Some(package.package.id),
                    monthly_rate: 15.0,
                },
                today,
            )
            .await
            .expect("Failed to create customer");

        let payment = backend
            .billing_service
            .record_payment(RecordPaymentCommand {
                customer_id: customer.customer.id,
                amount: 15.0,
                paid_at: None,
            })
            .await
            .expect("Failed to record payment");
        assert_eq!(payment.previous_expiry, customer.customer.expiry_date);

        let items = backend
            .customer_service
            .list_customers_for_display(today)
            .await
            .expect("Failed to list for display");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].package_name, "Basic");
        assert_eq!(items[0].effective_status, "Paid");

        let exported = backend
            .backup_service
            .export_backup()
            .await
            .expect("Failed to export");
        assert_eq!(exported.customer_count, 1);
        assert_eq!(exported.package_count, 1);
    }
}
