use crate::domain::invoice::Invoice;
use crate::domain::outcome::PaymentOutcome;
use crate::domain::payment::Payment;
use crate::domain::ports::InvoiceRepositoryBox;
use crate::error::{PaymentError, Result};
use tracing::{debug, info};

/// Records payments against invoices held in a repository.
///
/// Each call loads the invoice, decides, and persists before returning, so
/// payments processed one after another observe each other's effects.
pub struct PaymentProcessor {
    repository: InvoiceRepositoryBox,
}

impl PaymentProcessor {
    pub fn new(repository: InvoiceRepositoryBox) -> Self {
        Self { repository }
    }

    /// Applies `payment` to the invoice it references.
    ///
    /// Fails with [`PaymentError::NoMatchingInvoice`] when the reference is unknown and
    /// with [`PaymentError::InvalidInvoiceState`] when the stored invoice is corrupt.
    /// Storage errors propagate unchanged. Every other case is an outcome; only
    /// applied outcomes write to the repository.
    pub async fn process(&self, payment: Payment) -> Result<PaymentOutcome> {
        let mut invoice = self
            .repository
            .load(&payment.reference)
            .await?
            .ok_or(PaymentError::NoMatchingInvoice)?;

        let outcome = invoice.apply_payment(&payment)?;
        debug!(
            reference = %payment.reference,
            amount = %payment.amount.value(),
            %outcome,
            "payment evaluated"
        );

        if outcome.is_applied() {
            self.repository.save(invoice).await?;
            info!(reference = %payment.reference, %outcome, "payment recorded");
        } else {
            debug!(reference = %payment.reference, %outcome, "payment not recorded");
        }

        Ok(outcome)
    }

    /// Returns the repository's invoices, consuming the processor.
    pub async fn into_results(self) -> Result<Vec<Invoice>> {
        self.repository.all_invoices().await
    }
}
