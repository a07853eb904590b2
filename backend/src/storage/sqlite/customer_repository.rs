//! SQLite-backed customer repository.
//!
//! Dates are persisted as ISO-8601 text: calendar dates for the expiry,
//! RFC 3339 instants for the payment stamp.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::DbConnection;
use crate::domain::models::{BillingStatus, Customer};
use crate::storage::traits::CustomerStorage;

const SELECT_COLUMNS: &str = "id, customerId, name, phone, address, packageId, monthlyRate, status, expiryDate, lastPaymentDate";

/// Customer repository over the shared SQLite pool
#[derive(Clone)]
pub struct CustomerRepository {
    db: DbConnection,
}

impl CustomerRepository {
    /// Create a new customer repository
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_customer(row: &SqliteRow) -> Result<Customer> {
        let code: String = row.get("customerId");

        let status_label: String = row.get("status");
        let status = BillingStatus::from_string(&status_label)
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("Stored status for customer '{}' is invalid", code))?;

        let expiry_raw: String = row.get("expiryDate");
        let expiry_date = NaiveDate::parse_from_str(&expiry_raw, "%Y-%m-%d")
            .with_context(|| format!("Stored expiry date for customer '{}' is invalid", code))?;

        let last_payment_raw: Option<String> = row.get("lastPaymentDate");
        let last_payment_date = match last_payment_raw {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map(|d| d.with_timezone(&Utc))
                    .with_context(|| {
                        format!("Stored payment date for customer '{}' is invalid", code)
                    })?,
            ),
            None => None,
        };

        Ok(Customer {
            id: row.get("id"),
            customer_code: code,
            name: row.get("name"),
            phone: row.get("phone"),
            address: row.get("address"),
            package_id: row.get("packageId"),
            monthly_rate: row.get("monthlyRate"),
            status,
            expiry_date,
            last_payment_date,
        })
    }
}

#[async_trait]
impl CustomerStorage for CustomerRepository {
    async fn store_customer(&self, customer: &Customer) -> Result<Customer> {
        let result = sqlx::query(
            "INSERT INTO customers (customerId, name, phone, address, packageId, monthlyRate, status, expiryDate, lastPaymentDate)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&customer.customer_code)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.package_id)
        .bind(customer.monthly_rate)
        .bind(customer.status.to_string())
        .bind(customer.expiry_date.format("%Y-%m-%d").to_string())
        .bind(customer.last_payment_date.map(|d| d.to_rfc3339()))
        .execute(self.db.pool())
        .await
        .with_context(|| format!("Failed to insert customer '{}'", customer.customer_code))?;

        debug!(
            "Inserted customer '{}' with id {}",
            customer.customer_code,
            result.last_insert_rowid()
        );

        let mut stored = customer.clone();
        stored.id = result.last_insert_rowid();
        Ok(stored)
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>> {
        let row = sqlx::query(&format!("SELECT {} FROM customers WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .context("Failed to query customer by id")?;

        row.as_ref().map(Self::row_to_customer).transpose()
    }

    async fn get_customer_by_code(&self, code: &str) -> Result<Option<Customer>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM customers WHERE customerId = ?",
            SELECT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(self.db.pool())
        .await
        .context("Failed to query customer by code")?;

        row.as_ref().map(Self::row_to_customer).transpose()
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM customers ORDER BY name ASC",
            SELECT_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await
        .context("Failed to list customers")?;

        rows.iter().map(Self::row_to_customer).collect()
    }

    async fn update_customer(&self, customer: &Customer) -> Result<()> {
        sqlx::query(
            "UPDATE customers
             SET customerId = ?, name = ?, phone = ?, address = ?, packageId = ?, monthlyRate = ?, status = ?, expiryDate = ?, lastPaymentDate = ?
             WHERE id = ?",
        )
        .bind(&customer.customer_code)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.package_id)
        .bind(customer.monthly_rate)
        .bind(customer.status.to_string())
        .bind(customer.expiry_date.format("%Y-%m-%d").to_string())
        .bind(customer.last_payment_date.map(|d| d.to_rfc3339()))
        .bind(customer.id)
        .execute(self.db.pool())
        .await
        .with_context(|| format!("Failed to update customer {}", customer.id))?;

        Ok(())
    }

    async fn update_customer_status(&self, id: i64, status: BillingStatus) -> Result<()> {
        // Manual status change touches only the status column
        sqlx::query("UPDATE customers SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id)
            .execute(self.db.pool())
            .await
            .with_context(|| format!("Failed to update status of customer {}", id))?;

        Ok(())
    }

    async fn apply_renewal(
        &self,
        id: i64,
        new_expiry: NaiveDate,
        paid_at: DateTime<Utc>,
    ) -> Result<()> {
        // Single statement so the three fields change together or not at all
        sqlx::query("UPDATE customers SET status = ?, expiryDate = ?, lastPaymentDate = ? WHERE id = ?")
            .bind(BillingStatus::Paid.to_string())
            .bind(new_expiry.format("%Y-%m-%d").to_string())
            .bind(paid_at.to_rfc3339())
            .bind(id)
            .execute(self.db.pool())
            .await
            .with_context(|| format!("Failed to apply renewal to customer {}", id))?;

        Ok(())
    }

    async fn delete_customer(&self, id: i64) -> Result<()> {
        // Deleting a missing id is a no-op, not an error
        sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await
            .with_context(|| format!("Failed to delete customer {}", id))?;

        Ok(())
    }
}
