//! Domain layer: business logic and rules for subscriber billing.

pub mod backup_service;
pub mod billing;
pub mod billing_service;
pub mod collaborators;
pub mod commands;
pub mod customer_service;
pub mod models;
pub mod package_service;
pub mod reminder_service;

pub use backup_service::BackupService;
pub use billing_service::BillingService;
pub use collaborators::{ReceiptPrinter, ReminderSender};
pub use customer_service::CustomerService;
pub use package_service::PackageService;
pub use reminder_service::ReminderService;
