//! Billing status derivation and reminder selection.
//!
//! Pure date logic; nothing in this module touches storage. The displayed
//! ("effective") status is recomputed on every read so it always reflects the
//! current date, and is never written back or cached.
//!
//! All comparisons run at calendar-date granularity. The stored-status check
//! and the reminder window share that granularity on purpose; the
//! expiring-today tests below pin down the boundary behavior this choice
//! produces (a customer is not `Due` until the day after expiry, and a paid
//! customer expiring today already shows `Pending`).

use chrono::{Duration, NaiveDate};

use crate::domain::models::{BillingStatus, Customer};

/// Days added to the expiry date when a payment is recorded
pub const RENEWAL_PERIOD_DAYS: i64 = 30;

/// New customers start with an expiry this many days out
pub const DEFAULT_EXPIRY_DAYS: i64 = 30;

/// Reminders go to customers expiring exactly this many days ahead
pub const REMINDER_LEAD_DAYS: i64 = 1;

/// Derive the status shown to the user from the stored status, the expiry
/// date and the reference date.
///
/// The check order matters: the stored `Paid` label only holds while the
/// expiry is strictly in the future, and a lapsed expiry overrides whatever
/// label is stored.
pub fn effective_status(stored: BillingStatus, expiry: NaiveDate, today: NaiveDate) -> BillingStatus {
    if stored == BillingStatus::Paid && expiry > today {
        BillingStatus::Paid
    } else if expiry < today {
        BillingStatus::Due
    } else {
        BillingStatus::Pending
    }
}

/// Whole days from `today` until `expiry`; negative once the expiry has lapsed
pub fn days_until_expiry(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

/// Select the customers due for a renewal reminder: expiry exactly
/// [`REMINDER_LEAD_DAYS`] ahead of `today` and effective status not `Paid`.
///
/// Preserves the input order and never mutates anything, so a run is
/// idempotent for a fixed `today`.
pub fn reminder_window(customers: &[Customer], today: NaiveDate) -> Vec<Customer> {
    customers
        .iter()
        .filter(|customer| {
            days_until_expiry(customer.expiry_date, today) == REMINDER_LEAD_DAYS
                && effective_status(customer.status, customer.expiry_date, today) != BillingStatus::Paid
        })
        .cloned()
        .collect()
}

/// Expiry assigned to a newly created customer
pub fn default_expiry(today: NaiveDate) -> NaiveDate {
    today + Duration::days(DEFAULT_EXPIRY_DAYS)
}

/// Expiry after a recorded payment: the renewal period extends the *old*
/// expiry, not the payment date
pub fn renewed_expiry(old_expiry: NaiveDate) -> NaiveDate {
    old_expiry + Duration::days(RENEWAL_PERIOD_DAYS)
}
