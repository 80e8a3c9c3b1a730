use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("There is no invoice matching this payment")]
    NoMatchingInvoice,
    #[error("The invoice is in an invalid state, it has an amount of 0 and it has payments.")]
    InvalidInvoiceState,
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for PaymentError {
    fn from(err: rocksdb::Error) -> Self {
        PaymentError::InternalError(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
