//! Return-order domain module.
//!
//! This crate contains the return-claim state machine, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). Persistence and
//! refund orchestration live in `vendora-infra`.

pub mod return_order;

pub use return_order::{ReturnOrder, ReturnOrderItem, ReturnStatus, ReviewRecord};
