//! Domain layer: invoices, payments, outcomes and the storage port they depend on.

pub mod invoice;
pub mod outcome;
pub mod payment;
pub mod ports;
