use serde::{Deserialize, Serialize};

/// Service package (plan) as exchanged with the presentation layer and the
/// backup file. Field names mirror the persisted column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    /// Plan name, unique across packages
    pub name: String,
    pub description: String,
    /// Monthly rate for the plan
    pub rate: f64,
}

/// Customer row as exchanged with the presentation layer and the backup file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    /// Business-facing customer code, unique across customers
    pub customer_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Linked package id; None when the customer has no (or a dangling) plan link
    pub package_id: Option<i64>,
    /// Rate snapshot taken when the customer was linked to the plan;
    /// may drift from the package's current rate
    pub monthly_rate: f64,
    /// Stored status label: "Paid", "Pending" or "Due"
    pub status: String,
    /// Expiry date as ISO-8601 calendar date (YYYY-MM-DD)
    pub expiry_date: String,
    /// Instant of the last recorded payment (RFC 3339), if any
    pub last_payment_date: Option<String>,
}

/// On-disk backup document: exactly two top-level keys, each an array of
/// rows matching the table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupFile {
    pub customers: Vec<Customer>,
    pub packages: Vec<Package>,
}

/// A customer decorated for list display: the effective status is derived
/// on demand from the stored status and the current date, and the package
/// name is resolved with an "Unknown" fallback for missing links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerListItem {
    pub customer: Customer,
    /// Derived status label shown to the user ("Paid", "Pending" or "Due")
    pub effective_status: String,
    /// Resolved plan name, or "Unknown" when the link is missing
    pub package_name: String,
}

/// Aggregate counts for the dashboard screen, derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_customers: usize,
    pub paid: usize,
    pub pending: usize,
    pub due: usize,
    pub total_packages: usize,
}

/// Field bundle handed to a reminder collaborator. The collaborator owns
/// templating and transport; the core only supplies the values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderNotice {
    pub customer_name: String,
    pub customer_code: String,
    pub package_name: String,
    /// Expiry date formatted for display (YYYY-MM-DD)
    pub expiry_date: String,
    /// Monthly rate formatted for display
    pub monthly_rate: String,
    /// Destination phone number
    pub phone: String,
}

/// One reminder run's selection, ready for both dispatch paths: the
/// combined-message path consumes `recipients`, the automated send loop
/// consumes `notices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderBatch {
    pub notices: Vec<ReminderNotice>,
    /// Phone numbers of every selected customer, in selection order
    pub recipients: Vec<String>,
}

/// Outcome of the automated per-customer reminder loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderDispatchSummary {
    pub attempted: usize,
    pub sent: usize,
    pub failures: Vec<ReminderFailure>,
}

/// A single failed reminder send; the rest of the loop is unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderFailure {
    pub customer_code: String,
    pub error: String,
}

/// Field bundle handed to a receipt collaborator after a recorded payment.
/// References the pre-renewal expiry, not the advanced one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub customer_name: String,
    pub customer_code: String,
    pub package_name: String,
    pub amount_paid: f64,
    /// Expiry date the customer had before this payment (YYYY-MM-DD)
    pub previous_expiry: String,
    /// Instant the receipt was issued (RFC 3339)
    pub issued_at: String,
}

/// Result of exporting the store to the backup format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupExportResponse {
    pub json_content: String,
    pub filename: String,
    pub customer_count: usize,
    pub package_count: usize,
}
