use super::outcome::PaymentOutcome;
use super::payment::Payment;
use crate::error::PaymentError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Flat surcharge applied to every payment on a commercial invoice.
pub const COMMERCIAL_TAX_RATE: Decimal = dec!(0.14);

/// Decimal places kept on computed tax.
pub const TAX_SCALE: u32 = 4;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    Standard,
    Commercial,
}

/// Tax owed for a payment of `amount` on a commercial invoice.
///
/// Rounded half-to-even at [`TAX_SCALE`] places. Amounts with at most two decimal
/// places produce an exact product, so rounding only affects sub-cent payments.
pub fn commercial_tax(amount: Decimal) -> Decimal {
    (amount * COMMERCIAL_TAX_RATE)
        .round_dp_with_strategy(TAX_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// An invoice and the payments recorded against it.
///
/// `amount` and `type` never change after creation; `amount_paid`, `tax_amount`
/// and `payments` only grow, through [`Invoice::apply_payment`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Invoice {
    reference: String,
    amount: Decimal,
    amount_paid: Decimal,
    tax_amount: Decimal,
    r#type: InvoiceType,
    payments: Vec<Payment>,
}

impl Invoice {
    /// Creates an unpaid invoice.
    pub fn new(
        reference: impl Into<String>,
        amount: Decimal,
        r#type: InvoiceType,
    ) -> Result<Self, PaymentError> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(PaymentError::ValidationError(
                "Invoice reference must not be empty".to_string(),
            ));
        }
        if amount < Decimal::ZERO {
            return Err(PaymentError::ValidationError(
                "Invoice amount must not be negative".to_string(),
            ));
        }
        Ok(Self::restore(
            reference,
            amount,
            Decimal::ZERO,
            Decimal::ZERO,
            r#type,
            Vec::new(),
        ))
    }

    /// Rebuilds an invoice from previously persisted state.
    ///
    /// No invariant is checked here; corrupted state surfaces as
    /// [`PaymentError::InvalidInvoiceState`] when a payment is applied.
    pub fn restore(
        reference: impl Into<String>,
        amount: Decimal,
        amount_paid: Decimal,
        tax_amount: Decimal,
        r#type: InvoiceType,
        payments: Vec<Payment>,
    ) -> Self {
        Self {
            reference: reference.into(),
            amount,
            amount_paid,
            tax_amount,
            r#type,
            payments,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn amount_paid(&self) -> Decimal {
        self.amount_paid
    }

    pub fn tax_amount(&self) -> Decimal {
        self.tax_amount
    }

    pub fn invoice_type(&self) -> InvoiceType {
        self.r#type
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn remaining_amount(&self) -> Decimal {
        self.amount - self.amount_paid
    }

    fn payments_total(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount.value()).sum()
    }

    pub fn has_existing_payments(&self) -> bool {
        !self.payments.is_empty() && !self.payments_total().is_zero()
    }

    pub fn is_fully_paid(&self) -> bool {
        let total = self.payments_total();
        self.has_existing_payments() && self.amount == total && !total.is_zero()
    }

    /// Checks that a zero-amount invoice carries no payments.
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.amount.is_zero() && !self.payments.is_empty() {
            return Err(PaymentError::InvalidInvoiceState);
        }
        Ok(())
    }

    /// Decides whether `payment` is admissible and records it if so.
    ///
    /// Rejections return an outcome and leave the invoice unchanged. Only the two
    /// fatal conditions come back as errors.
    pub fn apply_payment(&mut self, payment: &Payment) -> Result<PaymentOutcome, PaymentError> {
        if payment.reference != self.reference {
            return Err(PaymentError::NoMatchingInvoice);
        }
        self.validate()?;

        if self.is_fully_paid() {
            return Ok(PaymentOutcome::AlreadyFullyPaid);
        }
        if self.amount.is_zero() {
            return Ok(PaymentOutcome::NoPaymentNeeded);
        }

        let had_payments = self.has_existing_payments();
        let ceiling = if had_payments {
            self.remaining_amount()
        } else {
            self.amount
        };
        let amount = payment.amount.value();
        if amount > ceiling {
            return Ok(PaymentOutcome::InvalidAmount {
                existing_payments: had_payments,
            });
        }

        self.amount_paid += amount;
        if self.r#type == InvoiceType::Commercial {
            self.tax_amount += commercial_tax(amount);
        }
        self.payments.push(payment.clone());

        // Pre-call flag paired with the post-mutation total.
        let subsequent = had_payments && self.amount_paid != amount;
        let outcome = match (self.remaining_amount().is_zero(), subsequent) {
            (true, true) => PaymentOutcome::FinalPartialPaymentFullyPaid,
            (true, false) => PaymentOutcome::FullyPaidNow,
            (false, true) => PaymentOutcome::AnotherPartialPayment,
            (false, false) => PaymentOutcome::PartiallyPaidNow,
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::Amount;

    fn pay(reference: &str, amount: Decimal) -> Payment {
        Payment::new(reference, Amount::new(amount).unwrap())
    }

    fn invoice_with_payments(amount: Decimal, paid: &[Decimal]) -> Invoice {
        let payments: Vec<Payment> = paid.iter().map(|a| pay("INV-1", *a)).collect();
        let total: Decimal = paid.iter().sum();
        Invoice::restore(
            "INV-1",
            amount,
            total,
            Decimal::ZERO,
            InvoiceType::Standard,
            payments,
        )
    }

    #[test]
    fn test_invoice_new_validation() {
        assert!(Invoice::new("INV-1", dec!(0), InvoiceType::Standard).is_ok());
        assert!(matches!(
            Invoice::new("INV-1", dec!(-1), InvoiceType::Standard),
            Err(PaymentError::ValidationError(_))
        ));
        assert!(matches!(
            Invoice::new("  ", dec!(10), InvoiceType::Standard),
            Err(PaymentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_derived_quantities() {
        let invoice = invoice_with_payments(dec!(100), &[dec!(30), dec!(20)]);
        assert_eq!(invoice.remaining_amount(), dec!(50));
        assert!(invoice.has_existing_payments());
        assert!(!invoice.is_fully_paid());

        let paid = invoice_with_payments(dec!(100), &[dec!(60), dec!(40)]);
        assert!(paid.is_fully_paid());

        let fresh = Invoice::new("INV-1", dec!(100), InvoiceType::Standard).unwrap();
        assert!(!fresh.has_existing_payments());
        assert!(!fresh.is_fully_paid());
    }

    #[test]
    fn test_first_partial_then_final_payment() {
        let mut invoice = Invoice::new("INV-1", dec!(100), InvoiceType::Standard).unwrap();

        let outcome = invoice.apply_payment(&pay("INV-1", dec!(50))).unwrap();
        assert_eq!(outcome, PaymentOutcome::PartiallyPaidNow);
        assert_eq!(invoice.amount_paid(), dec!(50));

        let outcome = invoice.apply_payment(&pay("INV-1", dec!(50))).unwrap();
        assert_eq!(outcome, PaymentOutcome::FinalPartialPaymentFullyPaid);
        assert_eq!(invoice.amount_paid(), dec!(100));
        assert_eq!(invoice.remaining_amount(), dec!(0));
        assert_eq!(invoice.payments().len(), 2);
        assert_eq!(invoice.tax_amount(), dec!(0));
    }

    #[test]
    fn test_another_partial_payment() {
        let mut invoice = invoice_with_payments(dec!(100), &[dec!(20)]);
        let outcome = invoice.apply_payment(&pay("INV-1", dec!(30))).unwrap();
        assert_eq!(outcome, PaymentOutcome::AnotherPartialPayment);
        assert_eq!(invoice.remaining_amount(), dec!(50));
    }

    #[test]
    fn test_commercial_full_payment_adds_tax() {
        let mut invoice = Invoice::new("INV-1", dec!(100), InvoiceType::Commercial).unwrap();
        let outcome = invoice.apply_payment(&pay("INV-1", dec!(100))).unwrap();
        assert_eq!(outcome, PaymentOutcome::FullyPaidNow);
        assert_eq!(invoice.tax_amount(), dec!(14.00));
    }

    #[test]
    fn test_commercial_tax_accumulates_per_payment() {
        let mut invoice = Invoice::new("INV-1", dec!(100), InvoiceType::Commercial).unwrap();
        invoice.apply_payment(&pay("INV-1", dec!(25.50))).unwrap();
        invoice.apply_payment(&pay("INV-1", dec!(10))).unwrap();
        assert_eq!(invoice.tax_amount(), dec!(3.57) + dec!(1.40));
    }

    #[test]
    fn test_commercial_tax_rounds_half_even() {
        // 0.0075 * 0.14 = 0.00105
        assert_eq!(commercial_tax(dec!(0.0075)), dec!(0.0010));
        // 0.0025 * 0.14 = 0.00035
        assert_eq!(commercial_tax(dec!(0.0025)), dec!(0.0004));
        assert_eq!(commercial_tax(dec!(19.99)), dec!(2.7986));
    }

    #[test]
    fn test_zero_amount_invoice_needs_no_payment() {
        let mut invoice = Invoice::new("INV-1", dec!(0), InvoiceType::Standard).unwrap();
        let before = invoice.clone();
        let outcome = invoice.apply_payment(&pay("INV-1", dec!(10))).unwrap();
        assert_eq!(outcome, PaymentOutcome::NoPaymentNeeded);
        assert_eq!(invoice, before);
    }

    #[test]
    fn test_zero_amount_invoice_with_payments_is_invalid() {
        let mut invoice = invoice_with_payments(dec!(0), &[dec!(5)]);
        let result = invoice.apply_payment(&pay("INV-1", dec!(1)));
        assert!(matches!(result, Err(PaymentError::InvalidInvoiceState)));
    }

    #[test]
    fn test_already_fully_paid() {
        let mut invoice = invoice_with_payments(dec!(100), &[dec!(100)]);
        let before = invoice.clone();
        let outcome = invoice.apply_payment(&pay("INV-1", dec!(1))).unwrap();
        assert_eq!(outcome, PaymentOutcome::AlreadyFullyPaid);
        assert_eq!(invoice, before);
    }

    #[test]
    fn test_overpayment_against_partial_balance() {
        let mut invoice = invoice_with_payments(dec!(100), &[dec!(50), dec!(30)]);
        let before = invoice.clone();
        let outcome = invoice.apply_payment(&pay("INV-1", dec!(30))).unwrap();
        assert_eq!(
            outcome,
            PaymentOutcome::InvalidAmount {
                existing_payments: true
            }
        );
        assert_eq!(invoice, before);
    }

    #[test]
    fn test_overpayment_on_first_payment() {
        let mut invoice = Invoice::new("INV-1", dec!(100), InvoiceType::Commercial).unwrap();
        let before = invoice.clone();
        let outcome = invoice.apply_payment(&pay("INV-1", dec!(100.01))).unwrap();
        assert_eq!(
            outcome,
            PaymentOutcome::InvalidAmount {
                existing_payments: false
            }
        );
        assert_eq!(invoice, before);
    }

    #[test]
    fn test_sole_payment_check_uses_post_mutation_total() {
        // Existing payments recorded but amount_paid was never updated, so after
        // applying 40 the total paid equals the payment itself.
        let mut invoice = Invoice::restore(
            "INV-1",
            dec!(100),
            dec!(0),
            dec!(0),
            InvoiceType::Standard,
            vec![pay("INV-1", dec!(60))],
        );
        let outcome = invoice.apply_payment(&pay("INV-1", dec!(40))).unwrap();
        assert_eq!(outcome, PaymentOutcome::PartiallyPaidNow);
        assert_eq!(invoice.amount_paid(), dec!(40));
    }

    #[test]
    fn test_payment_for_other_invoice_is_rejected() {
        let mut invoice = Invoice::new("INV-1", dec!(100), InvoiceType::Standard).unwrap();
        let result = invoice.apply_payment(&pay("INV-2", dec!(10)));
        assert!(matches!(result, Err(PaymentError::NoMatchingInvoice)));
        assert!(invoice.payments().is_empty());
    }

    #[test]
    fn test_zero_valued_payments_do_not_count_as_existing() {
        let invoice = invoice_with_payments(dec!(100), &[dec!(0), dec!(0)]);
        assert!(!invoice.payments().is_empty());
        assert!(!invoice.has_existing_payments());
        assert!(!invoice.is_fully_paid());
    }

    #[test]
    fn test_zero_payment_on_fresh_invoice() {
        let mut invoice = Invoice::new("INV-1", dec!(100), InvoiceType::Commercial).unwrap();
        let outcome = invoice.apply_payment(&pay("INV-1", dec!(0))).unwrap();

        assert_eq!(outcome, PaymentOutcome::PartiallyPaidNow);
        assert_eq!(invoice.payments().len(), 1);
        assert_eq!(invoice.amount_paid(), dec!(0));
        assert_eq!(invoice.tax_amount(), dec!(0));
        assert!(!invoice.has_existing_payments());
    }

    #[test]
    fn test_payment_after_zero_payments_is_treated_as_first() {
        // Ceiling is the full amount and the outcome is not a "final partial" one.
        let mut invoice = invoice_with_payments(dec!(100), &[dec!(0)]);
        let outcome = invoice.apply_payment(&pay("INV-1", dec!(100))).unwrap();
        assert_eq!(outcome, PaymentOutcome::FullyPaidNow);
        assert!(invoice.is_fully_paid());

        let mut invoice = invoice_with_payments(dec!(100), &[dec!(0)]);
        let outcome = invoice.apply_payment(&pay("INV-1", dec!(100.01))).unwrap();
        assert_eq!(
            outcome,
            PaymentOutcome::InvalidAmount {
                existing_payments: false
            }
        );
    }

    #[test]
    fn test_zero_payment_on_zero_amount_invoice() {
        let mut invoice = Invoice::new("INV-0", dec!(0), InvoiceType::Standard).unwrap();
        let before = invoice.clone();
        let outcome = invoice.apply_payment(&pay("INV-0", dec!(0))).unwrap();
        assert_eq!(outcome, PaymentOutcome::NoPaymentNeeded);
        assert_eq!(invoice, before);
    }

    #[test]
    fn test_stored_zero_payment_on_zero_amount_invoice_is_invalid() {
        let json = r#"{"reference":"INV-0","amount":"0","amount_paid":"0","tax_amount":"0","type":"standard","payments":[{"reference":"INV-0","amount":"0"}]}"#;
        let mut invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.payments().len(), 1);

        let result = invoice.apply_payment(&pay("INV-0", dec!(0)));
        assert!(matches!(result, Err(PaymentError::InvalidInvoiceState)));
    }

    #[test]
    fn test_invoice_type_serialization() {
        let json = serde_json::to_string(&InvoiceType::Commercial).unwrap();
        assert_eq!(json, "\"commercial\"");
    }
}
