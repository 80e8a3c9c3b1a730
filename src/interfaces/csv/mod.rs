pub mod invoice_reader;
pub mod payment_reader;
pub mod report_writer;
