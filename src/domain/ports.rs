use super::invoice::Invoice;
use crate::error::Result;
use async_trait::async_trait;

/// Storage for invoices, keyed by reference.
///
/// Implementations must make `load` and `save` for a given reference linearizable
/// with respect to concurrent loads and saves of the same reference. The payment
/// processor performs an unguarded read-modify-write, so hosts that accept
/// payments concurrently must serialize them per reference (a per-reference lock
/// or a transactional backend).
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn load(&self, reference: &str) -> Result<Option<Invoice>>;
    async fn save(&self, invoice: Invoice) -> Result<()>;
    async fn all_invoices(&self) -> Result<Vec<Invoice>>;
}

pub type InvoiceRepositoryBox = Box<dyn InvoiceRepository>;
