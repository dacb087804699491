use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decision::CreditDecision;

/// Length every customer identifier must have at the public boundary.
pub const CUSTOMER_ID_LENGTH: usize = 10;

/// Identifier wrapper for customers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub String);

impl CustomerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_valid_format(&self) -> bool {
        self.0.chars().count() == CUSTOMER_ID_LENGTH
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bureau figures kept for a customer with a credit file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditHistoryRecord {
    pub missed_payments: u32,
    pub existing_monthly_debt: Decimal,
}

/// Whether a customer has a credit file at all.
///
/// `NotOnFile` is not the same thing as a file with zero missed payments: young applicants
/// without a file are penalized for the missing history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditHistory {
    NotOnFile,
    OnFile(CreditHistoryRecord),
}

impl CreditHistory {
    pub fn on_file(missed_payments: u32, existing_monthly_debt: Decimal) -> Self {
        Self::OnFile(CreditHistoryRecord {
            missed_payments,
            existing_monthly_debt,
        })
    }

    pub fn is_on_file(&self) -> bool {
        matches!(self, Self::OnFile(_))
    }

    pub fn missed_payments(&self) -> u32 {
        match self {
            Self::NotOnFile => 0,
            Self::OnFile(record) => record.missed_payments,
        }
    }

    pub fn existing_monthly_debt(&self) -> Decimal {
        match self {
            Self::NotOnFile => Decimal::ZERO,
            Self::OnFile(record) => record.existing_monthly_debt,
        }
    }
}

impl From<Option<CreditHistoryRecord>> for CreditHistory {
    fn from(value: Option<CreditHistoryRecord>) -> Self {
        value.map_or(Self::NotOnFile, Self::OnFile)
    }
}

/// Employment arrangements the scoring rubric recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    SelfEmployed,
    PartTime,
    FullTime,
}

impl EmploymentType {
    /// Numeric code used by the employment-history provider.
    pub const fn provider_code(self) -> i64 {
        match self {
            EmploymentType::SelfEmployed => 1,
            EmploymentType::PartTime => 2,
            EmploymentType::FullTime => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EmploymentType::SelfEmployed => "self-employed",
            EmploymentType::PartTime => "part-time",
            EmploymentType::FullTime => "full-time",
        }
    }
}

/// Raised when the provider sends an employment code outside the agreed contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised employment type code {0}")]
pub struct UnknownEmploymentType(pub i64);

impl TryFrom<i64> for EmploymentType {
    type Error = UnknownEmploymentType;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(EmploymentType::SelfEmployed),
            2 => Ok(EmploymentType::PartTime),
            3 => Ok(EmploymentType::FullTime),
            other => Err(UnknownEmploymentType(other)),
        }
    }
}

/// Current employment snapshot. Net monthly income must be positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentProfile {
    pub employment_type: EmploymentType,
    pub employment_duration_months: u32,
    pub current_net_monthly_income: Decimal,
}

/// Customer master data as stored by the customer repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: CustomerId,
    pub date_of_birth: NaiveDate,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
}

impl CustomerRecord {
    /// Age in whole years on `today`; a birthday later in the year has not counted yet.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        let born = self.date_of_birth;
        let mut age = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            age -= 1;
        }

        u32::try_from(age).unwrap_or(0)
    }
}

/// Inbound scoring command as received from API and batch callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCreditRequest {
    pub customer_id: CustomerId,
    #[serde(rename = "requestedCreditAmount")]
    pub requested_amount: Decimal,
}

impl ScoreCreditRequest {
    pub fn new(customer_id: impl Into<String>, requested_amount: Decimal) -> Self {
        Self {
            customer_id: CustomerId::new(customer_id),
            requested_amount,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.customer_id.has_valid_format() {
            return Err(ValidationError::InvalidCustomerId {
                length: self.customer_id.as_str().chars().count(),
            });
        }

        if self.requested_amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(self.requested_amount));
        }

        Ok(())
    }
}

/// Reasons an inbound command is rejected before any lookup happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("customer id must be 10 characters, got {length}")]
    InvalidCustomerId { length: usize },
    #[error("requested amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
}

/// Response surfaced to the outermost caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditDecisionResponse {
    pub customer_id: CustomerId,
    pub decision: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_credit_amount: Decimal,
}

impl CreditDecisionResponse {
    pub fn new(
        customer_id: CustomerId,
        decision: CreditDecision,
        max_credit_amount: Decimal,
    ) -> Self {
        Self {
            customer_id,
            decision: decision.label().to_string(),
            max_credit_amount,
        }
    }
}
