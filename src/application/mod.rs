//! Application layer containing the payment orchestration.
//!
//! This module defines the `PaymentProcessor`, the entry point for recording a
//! payment: it loads the target invoice through the repository port, lets the
//! invoice decide the outcome, and persists accepted payments.

pub mod processor;
