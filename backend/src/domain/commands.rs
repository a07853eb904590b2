//! Domain-level command and query types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The presentation layer is responsible for
//! mapping its input widgets to these internal types.

pub mod packages {
    use crate::domain::models::Package;

    /// Input for creating a new package.
    #[derive(Debug, Clone)]
    pub struct CreatePackageCommand {
        pub name: String,
        pub description: String,
        pub rate: f64,
    }

    /// Input for updating an existing package (full-record replace).
    #[derive(Debug, Clone)]
    pub struct UpdatePackageCommand {
        pub id: i64,
        pub name: String,
        pub description: String,
        pub rate: f64,
    }

    /// Result of creating a package.
    #[derive(Debug, Clone)]
    pub struct CreatePackageResult {
        pub package: Package,
    }

    /// Result of updating a package.
    #[derive(Debug, Clone)]
    pub struct UpdatePackageResult {
        pub package: Package,
    }

    /// Result of listing packages.
    #[derive(Debug, Clone)]
    pub struct ListPackagesResult {
        pub packages: Vec<Package>,
    }

    /// Result of looking up a single package.
    #[derive(Debug, Clone)]
    pub struct GetPackageResult {
        pub package: Option<Package>,
    }

    /// Result of deleting a package.
    #[derive(Debug, Clone)]
    pub struct DeletePackageResult {
        pub success_message: String,
    }
}

pub mod customers {
    use crate::domain::models::Customer;

    /// Input for registering a new customer. Status and expiry are not
    /// accepted here; new customers always start `Pending` with the default
    /// expiry window.
    #[derive(Debug, Clone)]
    pub struct CreateCustomerCommand {
        pub customer_code: String,
        pub name: String,
        pub phone: String,
        pub address: String,
        pub package_id: Option<i64>,
        pub monthly_rate: f64,
    }

    /// Input for editing a customer's identity and plan link. Billing fields
    /// (status, expiry, last payment) change only through the billing
    /// operations.
    #[derive(Debug, Clone)]
    pub struct UpdateCustomerCommand {
        pub id: i64,
        pub customer_code: String,
        pub name: String,
        pub phone: String,
        pub address: String,
        pub package_id: Option<i64>,
        pub monthly_rate: f64,
    }

    /// Result of creating a customer.
    #[derive(Debug, Clone)]
    pub struct CreateCustomerResult {
        pub customer: Customer,
    }

    /// Result of updating a customer.
    #[derive(Debug, Clone)]
    pub struct UpdateCustomerResult {
        pub customer: Customer,
    }

    /// Result of listing customers.
    #[derive(Debug, Clone)]
    pub struct ListCustomersResult {
        pub customers: Vec<Customer>,
    }

    /// Result of looking up a single customer.
    #[derive(Debug, Clone)]
    pub struct GetCustomerResult {
        pub customer: Option<Customer>,
    }

    /// Result of deleting a customer.
    #[derive(Debug, Clone)]
    pub struct DeleteCustomerResult {
        pub success_message: String,
    }
}

pub mod billing {
    use chrono::{DateTime, NaiveDate, Utc};

    use crate::domain::models::{BillingStatus, Customer};

    /// Input for recording a payment against a customer.
    #[derive(Debug, Clone)]
    pub struct RecordPaymentCommand {
        pub customer_id: i64,
        pub amount: f64,
        /// Optional payment instant override; uses the current time if not provided
        pub paid_at: Option<DateTime<Utc>>,
    }

    /// Result of a recorded payment. `previous_expiry` is the expiry the
    /// customer had before the renewal; receipts reference it, not the
    /// advanced expiry now stored on `customer`.
    #[derive(Debug, Clone)]
    pub struct RecordPaymentResult {
        pub customer: Customer,
        pub previous_expiry: NaiveDate,
        pub amount: f64,
        pub paid_at: DateTime<Utc>,
    }

    /// Input for forcing a stored status without a payment.
    #[derive(Debug, Clone)]
    pub struct ChangeStatusCommand {
        pub customer_id: i64,
        pub status: BillingStatus,
    }

    /// Result of a manual status change.
    #[derive(Debug, Clone)]
    pub struct ChangeStatusResult {
        pub customer: Customer,
    }
}

pub mod backup {
    /// Result of importing a backup document.
    #[derive(Debug, Clone)]
    pub struct ImportBackupResult {
        pub customer_count: usize,
        pub package_count: usize,
        pub success_message: String,
    }
}
