use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};

use shared::{ReminderBatch, ReminderDispatchSummary, ReminderFailure, ReminderNotice};

use crate::domain::billing;
use crate::domain::collaborators::ReminderSender;
use crate::storage::sqlite::{CustomerRepository, PackageRepository};
use crate::storage::traits::{CustomerStorage, PackageStorage};

/// Service that selects the customers due for a renewal reminder and feeds
/// the two dispatch paths: the combined message opened in an external
/// messaging app (recipient list) and the automated per-customer send loop.
#[derive(Clone)]
pub struct ReminderService {
    customer_repository: CustomerRepository,
    package_repository: PackageRepository,
}

impl ReminderService {
    /// Create a new ReminderService
    pub fn new(
        customer_repository: CustomerRepository,
        package_repository: PackageRepository,
    ) -> Self {
        Self {
            customer_repository,
            package_repository,
        }
    }

    /// Build the reminder batch for `today`: customers expiring tomorrow
    /// whose effective status is not `Paid`, in store order. Running this
    /// twice without a mutation in between yields the same batch.
    pub async fn reminder_batch(&self, today: NaiveDate) -> Result<ReminderBatch> {
        let customers = self.customer_repository.list_customers().await?;
        let selected = billing::reminder_window(&customers, today);

        info!("Selected {} of {} customers for reminders", selected.len(), customers.len());

        let mut notices = Vec::with_capacity(selected.len());
        let mut recipients = Vec::with_capacity(selected.len());
        for customer in &selected {
            let package_name = match customer.package_id {
                Some(id) => self
                    .package_repository
                    .get_package(id)
                    .await?
                    .map(|p| p.name),
                None => None,
            };

            notices.push(ReminderNotice {
                customer_name: customer.name.clone(),
                customer_code: customer.customer_code.clone(),
                package_name: package_name.unwrap_or_else(|| "Unknown".to_string()),
                expiry_date: customer.expiry_date.format("%Y-%m-%d").to_string(),
                monthly_rate: format!("{:.2}", customer.monthly_rate),
                phone: customer.phone.clone(),
            });
            recipients.push(customer.phone.clone());
        }

        Ok(ReminderBatch { notices, recipients })
    }

    /// Run the automated send loop over the batch for `today`. A failed send
    /// is recorded and the loop continues; nothing in the store changes.
    pub async fn dispatch_reminders(
        &self,
        today: NaiveDate,
        sender: &dyn ReminderSender,
    ) -> Result<ReminderDispatchSummary> {
        let batch = self.reminder_batch(today).await?;

        let mut sent = 0;
        let mut failures = Vec::new();
        for notice in &batch.notices {
            match sender.send_reminder(notice) {
                Ok(()) => sent += 1,
                Err(e) => {
                    warn!("Reminder to {} failed: {}", notice.customer_code, e);
                    failures.push(ReminderFailure {
                        customer_code: notice.customer_code.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!("Dispatched reminders: {} sent, {} failed", sent, failures.len());

        Ok(ReminderDispatchSummary {
            attempted: batch.notices.len(),
            sent,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::domain::models::{BillingStatus, Customer, Package};
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup_test_service() -> (ReminderService, CustomerRepository, PackageRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let customer_repo = CustomerRepository::new(db.clone());
        let package_repo = PackageRepository::new(db);
        (
            ReminderService::new(customer_repo.clone(), package_repo.clone()),
            customer_repo,
            package_repo,
        )
    }

    async fn store_customer(
        repo: &CustomerRepository,
        code: &str,
        name: &str,
        status: BillingStatus,
        expiry: NaiveDate,
        package_id: Option<i64>,
    ) {
        repo.store_customer(&Customer {
            id: 0,
            customer_code: code.to_string(),
            name: name.to_string(),
            phone: format!("555-{}", code),
            address: "1 Main St".to_string(),
            package_id,
            monthly_rate: 20.0,
            status,
            expiry_date: expiry,
            last_payment_date: None,
        })
        .await
        .expect("Failed to store customer");
    }

    /// Sender double that records every notice
    struct RecordingSender(Mutex<Vec<ReminderNotice>>);

    impl ReminderSender for RecordingSender {
        fn send_reminder(&self, notice: &ReminderNotice) -> Result<()> {
            self.0.lock().unwrap().push(notice.clone());
            Ok(())
        }
    }

    /// Sender double that fails for one specific customer
    struct FlakySender {
        failing_code: String,
    }

    impl ReminderSender for FlakySender {
        fn send_reminder(&self, notice: &ReminderNotice) -> Result<()> {
            if notice.customer_code == self.failing_code {
                Err(anyhow::anyhow!("messaging app unavailable"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_batch_selects_tomorrow_unpaid_only() {
        let (service, customers, packages) = setup_test_service().await;
        let today = date(2024, 3, 9);

        let package = packages
            .store_package(&Package {
                id: 0,
                name: "Basic".to_string(),
                description: "Entry plan".to_string(),
                rate: 15.0,
            })
            .await
            .expect("Failed to store package");

        store_customer(&customers, "CUST-001", "Alice", BillingStatus::Pending, date(2024, 3, 10), Some(package.id)).await;
        store_customer(&customers, "CUST-002", "Bob", BillingStatus::Pending, date(2024, 3, 11), None).await;
        store_customer(&customers, "CUST-003", "Carol", BillingStatus::Paid, date(2024, 3, 10), None).await;

        let batch = service.reminder_batch(today).await.expect("Failed to build batch");

        assert_eq!(batch.notices.len(), 1);
        let notice = &batch.notices[0];
        assert_eq!(notice.customer_code, "CUST-001");
        assert_eq!(notice.package_name, "Basic");
        assert_eq!(notice.expiry_date, "2024-03-10");
        assert_eq!(notice.monthly_rate, "20.00");
        assert_eq!(batch.recipients, vec!["555-CUST-001".to_string()]);
    }

    #[tokio::test]
    async fn test_batch_is_idempotent() {
        let (service, customers, _) = setup_test_service().await;
        let today = date(2024, 3, 9);

        store_customer(&customers, "CUST-001", "Alice", BillingStatus::Pending, date(2024, 3, 10), None).await;
        store_customer(&customers, "CUST-002", "Bob", BillingStatus::Due, date(2024, 3, 10), None).await;

        let first = service.reminder_batch(today).await.expect("Failed to build batch");
        let second = service.reminder_batch(today).await.expect("Failed to build batch");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_dispatch_sends_each_selected_customer() {
        let (service, customers, _) = setup_test_service().await;
        let today = date(2024, 3, 9);

        store_customer(&customers, "CUST-001", "Alice", BillingStatus::Pending, date(2024, 3, 10), None).await;
        store_customer(&customers, "CUST-002", "Bob", BillingStatus::Due, date(2024, 3, 10), None).await;

        let sender = RecordingSender(Mutex::new(Vec::new()));
        let summary = service
            .dispatch_reminders(today, &sender)
            .await
            .expect("Failed to dispatch");

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.sent, 2);
        assert!(summary.failures.is_empty());
        assert_eq!(sender.0.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_send_does_not_abort_the_loop() {
        let (service, customers, _) = setup_test_service().await;
        let today = date(2024, 3, 9);

        store_customer(&customers, "CUST-001", "Alice", BillingStatus::Pending, date(2024, 3, 10), None).await;
        store_customer(&customers, "CUST-002", "Bob", BillingStatus::Pending, date(2024, 3, 10), None).await;

        let sender = FlakySender { failing_code: "CUST-001".to_string() };
        let summary = service
            .dispatch_reminders(today, &sender)
            .await
            .expect("Dispatch itself should not fail");

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].customer_code, "CUST-001");
    }

    #[tokio::test]
    async fn test_empty_store_yields_empty_batch() {
        let (service, _, _) = setup_test_service().await;

        let batch = service.reminder_batch(date(2024, 3, 9)).await.expect("Failed to build batch");
        assert!(batch.notices.is_empty());
        assert!(batch.recipients.is_empty());
    }
}
