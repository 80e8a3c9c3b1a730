use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a non-negative monetary amount submitted as a payment.
///
/// Negative payments are rejected at construction. Zero is allowed: it is
/// recorded like any other payment but does not count towards
/// [`crate::domain::invoice::Invoice::has_existing_payments`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::ValidationError(
                "Amount must not be negative".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// A payment addressed to a single invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Reference of the invoice this payment settles.
    pub reference: String,
    pub amount: Amount,
}

impl Payment {
    pub fn new(reference: impl Into<String>, amount: Amount) -> Self {
        Self {
            reference: reference.into(),
            amount,
        }
    }
}
