use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};

use shared::{CustomerListItem, DashboardSummary};

use crate::domain::billing;
use crate::domain::commands::customers::{
    CreateCustomerCommand, CreateCustomerResult, DeleteCustomerResult, GetCustomerResult,
    ListCustomersResult, UpdateCustomerCommand, UpdateCustomerResult,
};
use crate::domain::models::{BillingStatus, Customer, CustomerValidationError};
use crate::storage::sqlite::{CustomerRepository, PackageRepository};
use crate::storage::traits::{CustomerStorage, PackageStorage};

/// Plan name shown when a customer's package link is missing or dangling
const UNKNOWN_PACKAGE: &str = "Unknown";

/// Service for managing subscribers
#[derive(Clone)]
pub struct CustomerService {
    customer_repository: CustomerRepository,
    package_repository: PackageRepository,
}

impl CustomerService {
    /// Create a new CustomerService
    pub fn new(
        customer_repository: CustomerRepository,
        package_repository: PackageRepository,
    ) -> Self {
        Self {
            customer_repository,
            package_repository,
        }
    }

    /// Register a new customer. New customers always start `Pending` with
    /// the default expiry window; `today` anchors that window.
    pub async fn create_customer(
        &self,
        command: CreateCustomerCommand,
        today: NaiveDate,
    ) -> Result<CreateCustomerResult> {
        info!("Creating customer: code={}, name={}", command.customer_code, command.name);

        let customer_code = command.customer_code.trim().to_string();
        let name = command.name.trim().to_string();
        self.validate_fields(&customer_code, &name, command.monthly_rate)?;

        // Uniqueness check before any write
        if self
            .customer_repository
            .get_customer_by_code(&customer_code)
            .await?
            .is_some()
        {
            warn!("Rejected duplicate customer code: {}", customer_code);
            return Err(CustomerValidationError::DuplicateCustomerCode(customer_code).into());
        }

        let customer = Customer {
            id: 0,
            customer_code,
            name,
            phone: command.phone.trim().to_string(),
            address: command.address.trim().to_string(),
            package_id: command.package_id,
            monthly_rate: command.monthly_rate,
            status: BillingStatus::Pending,
            expiry_date: billing::default_expiry(today),
            last_payment_date: None,
        };

        let customer = self.customer_repository.store_customer(&customer).await?;

        info!("Created customer: {} with id: {}", customer.customer_code, customer.id);

        Ok(CreateCustomerResult { customer })
    }

    /// List all customers, ordered by name
    pub async fn list_customers(&self) -> Result<ListCustomersResult> {
        let customers = self.customer_repository.list_customers().await?;

        info!("Found {} customers", customers.len());

        Ok(ListCustomersResult { customers })
    }

    /// Get a customer by id
    pub async fn get_customer(&self, id: i64) -> Result<GetCustomerResult> {
        let customer = self.customer_repository.get_customer(id).await?;

        if customer.is_none() {
            warn!("Customer not found: {}", id);
        }

        Ok(GetCustomerResult { customer })
    }

    /// Edit a customer's identity and plan link. Billing fields (status,
    /// expiry, last payment) are carried over unchanged; they move only
    /// through the billing operations.
    pub async fn update_customer(&self, command: UpdateCustomerCommand) -> Result<UpdateCustomerResult> {
        info!("Updating customer: {}", command.id);

        let existing = self
            .customer_repository
            .get_customer(command.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Customer not found: {}", command.id))?;

        let customer_code = command.customer_code.trim().to_string();
        let name = command.name.trim().to_string();
        self.validate_fields(&customer_code, &name, command.monthly_rate)?;

        // The new code must not collide with a different customer
        if let Some(other) = self
            .customer_repository
            .get_customer_by_code(&customer_code)
            .await?
        {
            if other.id != existing.id {
                warn!("Rejected duplicate customer code on update: {}", customer_code);
                return Err(CustomerValidationError::DuplicateCustomerCode(customer_code).into());
            }
        }

        let customer = Customer {
            id: existing.id,
            customer_code,
            name,
            phone: command.phone.trim().to_string(),
            address: command.address.trim().to_string(),
            package_id: command.package_id,
            monthly_rate: command.monthly_rate,
            status: existing.status,
            expiry_date: existing.expiry_date,
            last_payment_date: existing.last_payment_date,
        };

        self.customer_repository.update_customer(&customer).await?;

        info!("Updated customer: {} with id: {}", customer.customer_code, customer.id);

        Ok(UpdateCustomerResult { customer })
    }

    /// Delete a customer. Deleting a missing id is a no-op.
    pub async fn delete_customer(&self, id: i64) -> Result<DeleteCustomerResult> {
        info!("Deleting customer: {}", id);

        let existing = self.customer_repository.get_customer(id).await?;

        self.customer_repository.delete_customer(id).await?;

        let success_message = match existing {
            Some(customer) => format!("Customer '{}' deleted successfully", customer.name),
            None => format!("Customer {} was already gone", id),
        };

        Ok(DeleteCustomerResult { success_message })
    }

    /// List customers decorated for display: effective status derived for
    /// `today` and plan name resolved, with "Unknown" for missing links.
    pub async fn list_customers_for_display(&self, today: NaiveDate) -> Result<Vec<CustomerListItem>> {
        let customers = self.customer_repository.list_customers().await?;

        let mut items = Vec::with_capacity(customers.len());
        for customer in customers {
            let package_name = self.resolve_package_name(customer.package_id).await?;
            let effective =
                billing::effective_status(customer.status, customer.expiry_date, today);

            items.push(CustomerListItem {
                customer: customer.to_dto(),
                effective_status: effective.to_string(),
                package_name,
            });
        }

        Ok(items)
    }

    /// Aggregate counts for the dashboard, derived on demand for `today`
    pub async fn dashboard_summary(&self, today: NaiveDate) -> Result<DashboardSummary> {
        let customers = self.customer_repository.list_customers().await?;
        let packages = self.package_repository.list_packages().await?;

        let mut paid = 0;
        let mut pending = 0;
        let mut due = 0;
        for customer in &customers {
            match billing::effective_status(customer.status, customer.expiry_date, today) {
                BillingStatus::Paid => paid += 1,
                BillingStatus::Pending => pending += 1,
                BillingStatus::Due => due += 1,
            }
        }

        Ok(DashboardSummary {
            total_customers: customers.len(),
            paid,
            pending,
            due,
            total_packages: packages.len(),
        })
    }

    async fn resolve_package_name(&self, package_id: Option<i64>) -> Result<String> {
        let resolved = match package_id {
            Some(id) => self.package_repository.get_package(id).await?.map(|p| p.name),
            None => None,
        };
        Ok(resolved.unwrap_or_else(|| UNKNOWN_PACKAGE.to_string()))
    }

    fn validate_fields(&self, customer_code: &str, name: &str, monthly_rate: f64) -> Result<()> {
        if customer_code.is_empty() {
            return Err(CustomerValidationError::EmptyCustomerCode.into());
        }
        if name.is_empty() {
            return Err(CustomerValidationError::EmptyName.into());
        }
        if monthly_rate < 0.0 {
            return Err(CustomerValidationError::NegativeRate.into());
        }
        Ok(())
    }
}
