//! `vendora-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{AggregateRoot, ExpectedVersion};
pub use entity::Entity;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{
    ItemId, OrderId, OrderItemId, OrderShopId, ReturnOrderId, ReturnOrderItemId, ShopId,
    TransactionId, UserId, VoucherId,
};
pub use money::Money;
pub use value_object::ValueObject;
