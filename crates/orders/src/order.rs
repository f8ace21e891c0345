//! Order aggregate: one buyer checkout, split per seller shop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendora_core::{
    AggregateRoot, ItemId, Money, OrderId, OrderItemId, OrderShopId, ShopId, UserId, ValueObject,
};

/// Order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipping,
    Completed,
    Canceled,
}

/// Per-shop sub-order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderShopStatus {
    Pending,
    Preparing,
    Shipping,
    Delivered,
    Canceled,
}

/// Line-item lifecycle. `ReturnRequest` marks an item under an open return claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderItemStatus {
    Pending,
    Delivered,
    ReturnRequest,
    Returned,
    Canceled,
}

/// Delivery address snapshot taken at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAddress {
    pub recipient: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub country: String,
}

impl ValueObject for UserAddress {}

/// Order line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub item_id: ItemId,
    pub status: OrderItemStatus,
    pub quantity: u32,
    /// Unit price in smallest currency unit.
    pub price: Money,
    /// quantity * price, frozen at checkout.
    pub total_amount: Money,
}

impl OrderItem {
    pub fn is_returnable(&self) -> bool {
        matches!(self.status, OrderItemStatus::Delivered)
    }
}

/// Per-seller sub-order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderShop {
    pub id: OrderShopId,
    pub shop_id: ShopId,
    pub status: OrderShopStatus,
    pub shipping_fee: Money,
    pub shop_discount: Money,
    pub shipping_discount: Money,
    pub items: Vec<OrderItem>,
}

impl OrderShop {
    /// Sum of line totals before discounts.
    pub fn items_subtotal(&self) -> Money {
        self.items
            .iter()
            .fold(Money::ZERO, |acc, item| {
                // Checkout already validated each total; widening via i64 is fine here.
                Money::from_minor(acc.as_minor() + item.total_amount.as_minor())
            })
    }
}

/// Aggregate root: Order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    buyer: UserId,
    address: UserAddress,
    status: OrderStatus,
    shops: Vec<OrderShop>,
    placed_at: DateTime<Utc>,
    version: u64,
}

impl Order {
    pub fn new(
        id: OrderId,
        buyer: UserId,
        address: UserAddress,
        shops: Vec<OrderShop>,
        placed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            buyer,
            address,
            status: OrderStatus::Pending,
            shops,
            placed_at,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn buyer(&self) -> UserId {
        self.buyer
    }

    pub fn address(&self) -> &UserAddress {
        &self.address
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn shops(&self) -> &[OrderShop] {
        &self.shops
    }

    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
