use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stored billing status of a customer. The label shown to the user is the
/// *effective* status derived in `domain::billing`, not this field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BillingStatus {
    Paid,
    Pending,
    Due,
}

impl BillingStatus {
    /// Convert to the exact label used in storage and display
    pub fn to_string(&self) -> String {
        match self {
            BillingStatus::Paid => "Paid".to_string(),
            BillingStatus::Pending => "Pending".to_string(),
            BillingStatus::Due => "Due".to_string(),
        }
    }

    /// Parse from a stored label
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "paid" => Ok(BillingStatus::Paid),
            "pending" => Ok(BillingStatus::Pending),
            "due" => Ok(BillingStatus::Due),
            _ => Err(format!("Invalid billing status: {}", s)),
        }
    }
}

/// Domain model representing a subscriber of the service.
///
/// `package_id` is a nullable reference: a customer whose plan was deleted
/// (or never set) carries `None` and is shown with an "Unknown" plan name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    /// Business-facing code, unique across customers
    pub customer_code: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub package_id: Option<i64>,
    /// Rate snapshot; may drift from the linked package's current rate
    pub monthly_rate: f64,
    pub status: BillingStatus,
    pub expiry_date: NaiveDate,
    pub last_payment_date: Option<DateTime<Utc>>,
}

impl Customer {
    /// Convert to the DTO shared with the presentation layer and backup file
    pub fn to_dto(&self) -> shared::Customer {
        shared::Customer {
            id: self.id,
            customer_id: self.customer_code.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            package_id: self.package_id,
            monthly_rate: self.monthly_rate,
            status: self.status.to_string(),
            expiry_date: self.expiry_date.format("%Y-%m-%d").to_string(),
            last_payment_date: self.last_payment_date.map(|d| d.to_rfc3339()),
        }
    }

    /// Build a domain customer from a backup/DTO row
    pub fn from_dto(dto: &shared::Customer) -> Result<Self> {
        let status = BillingStatus::from_string(&dto.status)
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("Invalid status for customer '{}'", dto.customer_id))?;

        let expiry_date = NaiveDate::parse_from_str(&dto.expiry_date, "%Y-%m-%d")
            .with_context(|| format!("Invalid expiry date for customer '{}'", dto.customer_id))?;

        let last_payment_date = match &dto.last_payment_date {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map(|d| d.with_timezone(&Utc))
                    .with_context(|| {
                        format!("Invalid last payment date for customer '{}'", dto.customer_id)
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            id: dto.id,
            customer_code: dto.customer_id.clone(),
            name: dto.name.clone(),
            phone: dto.phone.clone(),
            address: dto.address.clone(),
            package_id: dto.package_id,
            monthly_rate: dto.monthly_rate,
            status,
            expiry_date,
            last_payment_date,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CustomerValidationError {
    #[error("Customer code cannot be empty")]
    EmptyCustomerCode,
    #[error("Customer name cannot be empty")]
    EmptyName,
    #[error("Monthly rate cannot be negative")]
    NegativeRate,
    #[error("A customer with code '{0}' already exists")]
    DuplicateCustomerCode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment amount must be positive")]
    NonPositiveAmount,
    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [BillingStatus::Paid, BillingStatus::Pending, BillingStatus::Due] {
            let label = status.to_string();
            let parsed = BillingStatus::from_string(&label).expect("Failed to parse label");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(BillingStatus::from_string("paid").unwrap(), BillingStatus::Paid);
        assert_eq!(BillingStatus::from_string("DUE").unwrap(), BillingStatus::Due);
        assert!(BillingStatus::from_string("overdue").is_err());
    }

    #[test]
    fn test_customer_dto_round_trip() {
        let customer = Customer {
            id: 7,
            customer_code: "CUST-007".to_string(),
            name: "Asha Rao".to_string(),
            phone: "555-0107".to_string(),
            address: "7 Hill Rd".to_string(),
            package_id: Some(2),
            monthly_rate: 25.0,
            status: BillingStatus::Paid,
            expiry_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            last_payment_date: Some("2024-02-09T08:30:00Z".parse().unwrap()),
        };

        let dto = customer.to_dto();
        assert_eq!(dto.customer_id, "CUST-007");
        assert_eq!(dto.status, "Paid");
        assert_eq!(dto.expiry_date, "2024-03-10");

        let back = Customer::from_dto(&dto).expect("Failed to rebuild from DTO");
        assert_eq!(back, customer);
    }

    #[test]
    fn test_customer_from_dto_rejects_bad_dates() {
        let mut dto = Customer {
            id: 1,
            customer_code: "CUST-001".to_string(),
            name: "Test".to_string(),
            phone: "555-0001".to_string(),
            address: "1 Main St".to_string(),
            package_id: None,
            monthly_rate: 10.0,
            status: BillingStatus::Pending,
            expiry_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            last_payment_date: None,
        }
        .to_dto();

        dto.expiry_date = "10/03/2024".to_string();
        assert!(Customer::from_dto(&dto).is_err());
    }
}
