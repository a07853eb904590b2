use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};

use shared::Receipt;

use crate::domain::billing;
use crate::domain::collaborators::ReceiptPrinter;
use crate::domain::commands::billing::{
    ChangeStatusCommand, ChangeStatusResult, RecordPaymentCommand, RecordPaymentResult,
};
use crate::domain::models::{BillingStatus, PaymentError};
use crate::storage::sqlite::{CustomerRepository, PackageRepository};
use crate::storage::traits::{CustomerStorage, PackageStorage};

/// Service for the billing operations on a customer: recording payments,
/// forcing a stored status and issuing receipts.
#[derive(Clone)]
pub struct BillingService {
    customer_repository: CustomerRepository,
    package_repository: PackageRepository,
}

impl BillingService {
    /// Create a new BillingService
    pub fn new(
        customer_repository: CustomerRepository,
        package_repository: PackageRepository,
    ) -> Self {
        Self {
            customer_repository,
            package_repository,
        }
    }

    /// Record a payment: advance the expiry by the renewal period, mark the
    /// customer `Paid` and stamp the payment instant, all in one write.
    ///
    /// The returned result carries the pre-renewal expiry; receipts reference
    /// that value, not the advanced one.
    pub async fn record_payment(&self, command: RecordPaymentCommand) -> Result<RecordPaymentResult> {
        info!(
            "Recording payment: customer={}, amount={}",
            command.customer_id, command.amount
        );

        // Rejected before any write; NaN fails this check too
        if !(command.amount > 0.0) {
            warn!("Rejected non-positive payment amount: {}", command.amount);
            return Err(PaymentError::NonPositiveAmount.into());
        }

        let mut customer = self
            .customer_repository
            .get_customer(command.customer_id)
            .await?
            .ok_or(PaymentError::CustomerNotFound(command.customer_id))?;

        let previous_expiry = customer.expiry_date;
        let new_expiry = billing::renewed_expiry(previous_expiry);
        let paid_at = command.paid_at.unwrap_or_else(Utc::now);

        self.customer_repository
            .apply_renewal(customer.id, new_expiry, paid_at)
            .await?;

        customer.status = BillingStatus::Paid;
        customer.expiry_date = new_expiry;
        customer.last_payment_date = Some(paid_at);

        info!(
            "Recorded payment for {}: expiry {} -> {}",
            customer.customer_code, previous_expiry, new_expiry
        );

        Ok(RecordPaymentResult {
            customer,
            previous_expiry,
            amount: command.amount,
            paid_at,
        })
    }

    /// Force a stored status without a payment. Only the status field moves;
    /// expiry and payment date stay untouched.
    pub async fn change_status(&self, command: ChangeStatusCommand) -> Result<ChangeStatusResult> {
        info!(
            "Changing status: customer={}, status={}",
            command.customer_id,
            command.status.to_string()
        );

        let mut customer = self
            .customer_repository
            .get_customer(command.customer_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Customer not found: {}", command.customer_id))?;

        self.customer_repository
            .update_customer_status(customer.id, command.status)
            .await?;

        customer.status = command.status;

        Ok(ChangeStatusResult { customer })
    }

    /// Assemble the receipt for a recorded payment and hand it to the
    /// printer collaborator. The payment is already persisted when this is
    /// called; a printing failure surfaces to the caller but does not undo
    /// the renewal.
    pub async fn issue_receipt(
        &self,
        payment: &RecordPaymentResult,
        printer: &dyn ReceiptPrinter,
    ) -> Result<Receipt> {
        let package_name = match payment.customer.package_id {
            Some(id) => self
                .package_repository
                .get_package(id)
                .await?
                .map(|p| p.name),
            None => None,
        };

        let receipt = Receipt {
            customer_name: payment.customer.name.clone(),
            customer_code: payment.customer.customer_code.clone(),
            package_name: package_name.unwrap_or_else(|| "Unknown".to_string()),
            amount_paid: payment.amount,
            previous_expiry: payment.previous_expiry.format("%Y-%m-%d").to_string(),
            issued_at: payment.paid_at.to_rfc3339(),
        };

        printer
            .print_receipt(&receipt)
            .context("Receipt printing failed; the recorded payment still stands")?;

        info!("Printed receipt for customer {}", receipt.customer_code);

        Ok(receipt)
    }
}
