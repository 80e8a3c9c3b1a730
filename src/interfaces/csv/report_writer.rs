use crate::domain::invoice::{Invoice, InvoiceType};
use crate::domain::outcome::PaymentOutcome;
use crate::domain::payment::Payment;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct OutcomeRecord<'a> {
    reference: &'a str,
    amount: Decimal,
    outcome: &'static str,
}

#[derive(Debug, Serialize)]
struct InvoiceRecord<'a> {
    reference: &'a str,
    r#type: InvoiceType,
    amount: Decimal,
    amount_paid: Decimal,
    tax_amount: Decimal,
    remaining: Decimal,
    payments: usize,
}

/// Writes one `reference,amount,outcome` row per processed payment.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_outcome(&mut self, payment: &Payment, outcome: PaymentOutcome) -> Result<()> {
        self.writer.serialize(OutcomeRecord {
            reference: &payment.reference,
            amount: payment.amount.value().normalize(),
            outcome: outcome.message(),
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes the state of each invoice, amounts normalized (`50.00` prints as `50`).
pub struct InvoiceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> InvoiceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_invoices(&mut self, invoices: Vec<Invoice>) -> Result<()> {
        for invoice in &invoices {
            self.writer.serialize(InvoiceRecord {
                reference: invoice.reference(),
                r#type: invoice.invoice_type(),
                amount: invoice.amount().normalize(),
                amount_paid: invoice.amount_paid().normalize(),
                tax_amount: invoice.tax_amount().normalize(),
                remaining: invoice.remaining_amount().normalize(),
                payments: invoice.payments().len(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
