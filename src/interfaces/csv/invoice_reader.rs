use crate::domain::invoice::{Invoice, InvoiceType};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct InvoiceRecord {
    reference: String,
    amount: Decimal,
    r#type: InvoiceType,
}

/// Reads new invoices from a CSV source with `reference, amount, type` columns.
pub struct InvoiceReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InvoiceReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator of unpaid invoices, one per row.
    pub fn invoices(self) -> impl Iterator<Item = Result<Invoice>> {
        self.reader.into_deserialize::<InvoiceRecord>().map(|result| {
            let record = result.map_err(PaymentError::from)?;
            Invoice::new(record.reference, record.amount, record.r#type)
        })
    }
}
