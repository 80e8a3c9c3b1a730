use std::fmt;

/// Result of submitting a payment against an invoice.
///
/// Every variant is a successful completion of the operation; rejections such as
/// [`PaymentOutcome::InvalidAmount`] leave the invoice untouched. Fatal conditions are
/// reported through [`crate::error::PaymentError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    AlreadyFullyPaid,
    NoPaymentNeeded,
    /// The payment exceeds what the invoice still accepts. `existing_payments` tells
    /// whether the ceiling was the partial balance remaining or the full invoice amount.
    InvalidAmount {
        existing_payments: bool,
    },
    FinalPartialPaymentFullyPaid,
    FullyPaidNow,
    AnotherPartialPayment,
    PartiallyPaidNow,
}

impl PaymentOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            PaymentOutcome::AlreadyFullyPaid => "invoice was already fully paid",
            PaymentOutcome::NoPaymentNeeded => "no payment needed",
            PaymentOutcome::InvalidAmount {
                existing_payments: true,
            } => "the payment is greater than the partial amount remaining",
            PaymentOutcome::InvalidAmount {
                existing_payments: false,
            } => "the payment is greater than the invoice amount",
            PaymentOutcome::FinalPartialPaymentFullyPaid => {
                "final partial payment received, invoice is now fully paid"
            }
            PaymentOutcome::FullyPaidNow => "invoice is now fully paid",
            PaymentOutcome::AnotherPartialPayment => {
                "another partial payment received, still not fully paid"
            }
            PaymentOutcome::PartiallyPaidNow => "invoice is now partially paid",
        }
    }

    /// True when the payment was recorded on the invoice.
    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            PaymentOutcome::FinalPartialPaymentFullyPaid
                | PaymentOutcome::FullyPaidNow
                | PaymentOutcome::AnotherPartialPayment
                | PaymentOutcome::PartiallyPaidNow
        )
    }
}

impl fmt::Display for PaymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
