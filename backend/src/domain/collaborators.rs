//! Capability interfaces for device-level collaborators.
//!
//! The printer, messaging app and any other device capability sit behind
//! narrow traits so the billing logic runs and tests without a device
//! present. The core hands over fully-formed field bundles; templating,
//! locale formatting and transport belong to the implementations.

use anyhow::Result;
use shared::{Receipt, ReminderNotice};

/// A collaborator that can deliver a renewal reminder to one customer
pub trait ReminderSender: Send + Sync {
    fn send_reminder(&self, notice: &ReminderNotice) -> Result<()>;
}

/// A collaborator that can print (or share) a payment receipt
pub trait ReceiptPrinter: Send + Sync {
    fn print_receipt(&self, receipt: &Receipt) -> Result<()>;
}
