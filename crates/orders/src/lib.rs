//! Orders domain module.
//!
//! This crate contains the purchase-side model (orders, per-shop sub-orders,
//! line items, vouchers, thin catalog types). It is deterministic domain
//! logic only: no IO, no HTTP, no storage.

pub mod catalog;
pub mod order;
pub mod voucher;

pub use catalog::{Item, Shop};
pub use order::{Order, OrderItem, OrderItemStatus, OrderShop, OrderShopStatus, OrderStatus, UserAddress};
pub use voucher::{recompute_refund_amount, Voucher, VoucherMethod, VoucherTarget};
