//! Domain models for the billing core.

pub mod customer;
pub mod package;

pub use customer::{BillingStatus, Customer, CustomerValidationError, PaymentError};
pub use package::{Package, PackageValidationError};
