//! Thin catalog types referenced by orders.

use serde::{Deserialize, Serialize};

use vendora_core::{AggregateRoot, ItemId, Money, ShopId, UserId};

/// A seller's shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    id: ShopId,
    owner: UserId,
    name: String,
    version: u64,
}

impl Shop {
    pub fn new(id: ShopId, owner: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            version: 0,
        }
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl AggregateRoot for Shop {
    type Id = ShopId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// A catalog item offered by a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    shop_id: ShopId,
    name: String,
    price: Money,
    stock: u32,
    version: u64,
}

impl Item {
    pub fn new(id: ItemId, shop_id: ShopId, name: impl Into<String>, price: Money, stock: u32) -> Self {
        Self {
            id,
            shop_id,
            name: name.into(),
            price,
            stock,
            version: 0,
        }
    }

    pub fn shop_id(&self) -> ShopId {
        self.shop_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }
}

impl AggregateRoot for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
