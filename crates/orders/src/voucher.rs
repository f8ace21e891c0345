//! Discount vouchers and refund-amount recomputation.
//!
//! Vouchers are read-only inputs here: pricing a return claim re-derives the
//! refundable amount from the order lines and the vouchers that were applied
//! at checkout, but never mutates a voucher.

use serde::{Deserialize, Serialize};

use vendora_core::{Money, OrderItemId, VoucherId};

use crate::order::OrderShop;

/// How a voucher's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherMethod {
    /// `value` is an absolute discount in smallest currency units.
    FixAmount,
    /// `value` is a percentage (0..=100) of the discounted base.
    Percent,
}

/// What the voucher discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherTarget {
    Shop,
    Shipping,
    Item,
}

/// Discount rule applied at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: VoucherId,
    pub method: VoucherMethod,
    pub target: VoucherTarget,
    pub value: i64,
    /// Cap for percent vouchers; ignored for fix-amount.
    pub max_discount: Option<Money>,
}

impl Voucher {
    /// Discount this voucher grants on `base`. Never exceeds `base`.
    pub fn discount_on(&self, base: Money) -> Money {
        let base_minor = base.as_minor().max(0);
        let raw = match self.method {
            VoucherMethod::FixAmount => self.value.max(0),
            VoucherMethod::Percent => {
                let pct = self.value.clamp(0, 100) as i128;
                let discounted = (base_minor as i128 * pct) / 100;
                let capped = match self.max_discount {
                    Some(cap) => discounted.min(cap.as_minor().max(0) as i128),
                    None => discounted,
                };
                capped as i64
            }
        };
        Money::from_minor(raw.min(base_minor))
    }
}

/// Recompute the refundable amount for a set of disputed items in one
/// sub-order.
///
/// Goods-target discounts (shop and item vouchers, plus the discount frozen
/// on the sub-order at checkout) are shared across the selected items in
/// proportion to their share of the goods subtotal; shipping-target vouchers
/// do not reduce a goods refund. Rounding is toward the marketplace (floor),
/// so the refund never exceeds what the buyer actually paid.
pub fn recompute_refund_amount(
    shop: &OrderShop,
    selected: &[OrderItemId],
    vouchers: &[Voucher],
) -> Money {
    let subtotal = shop.items_subtotal().as_minor();
    if subtotal <= 0 {
        return Money::ZERO;
    }

    let selected_total: i128 = shop
        .items
        .iter()
        .filter(|item| selected.contains(&item.id))
        .map(|item| item.total_amount.as_minor().max(0) as i128)
        .sum();
    if selected_total == 0 {
        return Money::ZERO;
    }

    let mut goods_discount: i128 = shop.shop_discount.as_minor().max(0) as i128;
    for voucher in vouchers {
        match voucher.target {
            VoucherTarget::Shop | VoucherTarget::Item => {
                goods_discount +=
                    voucher.discount_on(Money::from_minor(subtotal)).as_minor() as i128;
            }
            VoucherTarget::Shipping => {}
        }
    }
    // A discount larger than the goods subtotal never happened at checkout.
    goods_discount = goods_discount.min(subtotal as i128);

    let discount_share = goods_discount * selected_total / subtotal as i128;
    let refund = (selected_total - discount_share).max(0);
    Money::from_minor(refund as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{OrderItem, OrderItemStatus, OrderShopStatus};
    use proptest::prelude::*;
    use vendora_core::{ItemId, OrderShopId, ShopId};

    fn shop_with_items(totals: &[i64], shop_discount: i64) -> OrderShop {
        OrderShop {
            id: OrderShopId::new(),
            shop_id: ShopId::new(),
            status: OrderShopStatus::Delivered,
            shipping_fee: Money::from_minor(50),
            shop_discount: Money::from_minor(shop_discount),
            shipping_discount: Money::ZERO,
            items: totals
                .iter()
                .map(|&t| OrderItem {
                    id: OrderItemId::new(),
                    item_id: ItemId::new(),
                    status: OrderItemStatus::Delivered,
                    quantity: 1,
                    price: Money::from_minor(t),
                    total_amount: Money::from_minor(t),
                })
                .collect(),
        }
    }

    #[test]
    fn fix_amount_discount_never_exceeds_base() {
        let voucher = Voucher {
            id: VoucherId::new(),
            method: VoucherMethod::FixAmount,
            target: VoucherTarget::Shop,
            value: 500,
            max_discount: None,
        };
        assert_eq!(voucher.discount_on(Money::from_minor(300)), Money::from_minor(300));
        assert_eq!(voucher.discount_on(Money::from_minor(800)), Money::from_minor(500));
    }

    #[test]
    fn percent_discount_respects_the_cap() {
        let voucher = Voucher {
            id: VoucherId::new(),
            method: VoucherMethod::Percent,
            target: VoucherTarget::Shop,
            value: 50,
            max_discount: Some(Money::from_minor(120)),
        };
        assert_eq!(voucher.discount_on(Money::from_minor(1000)), Money::from_minor(120));
        assert_eq!(voucher.discount_on(Money::from_minor(200)), Money::from_minor(100));
    }

    #[test]
    fn refund_without_discounts_is_the_selected_total() {
        let shop = shop_with_items(&[100, 200, 300], 0);
        let selected = vec![shop.items[0].id, shop.items[2].id];
        assert_eq!(
            recompute_refund_amount(&shop, &selected, &[]),
            Money::from_minor(400)
        );
    }

    #[test]
    fn shop_discount_is_shared_proportionally() {
        // Subtotal 600, discount 60; returning the 300-line carries half the discount.
        let shop = shop_with_items(&[300, 300], 60);
        let selected = vec![shop.items[0].id];
        assert_eq!(
            recompute_refund_amount(&shop, &selected, &[]),
            Money::from_minor(270)
        );
    }

    #[test]
    fn shipping_vouchers_do_not_reduce_the_goods_refund() {
        let shop = shop_with_items(&[250], 0);
        let vouchers = vec![Voucher {
            id: VoucherId::new(),
            method: VoucherMethod::FixAmount,
            target: VoucherTarget::Shipping,
            value: 100,
            max_discount: None,
        }];
        let selected = vec![shop.items[0].id];
        assert_eq!(
            recompute_refund_amount(&shop, &selected, &vouchers),
            Money::from_minor(250)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the refund is bounded by [0, selected total] for any
        /// combination of line totals, shop discount, and percent voucher.
        #[test]
        fn refund_is_bounded_by_selected_total(
            totals in prop::collection::vec(1i64..100_000, 1..8),
            discount in 0i64..50_000,
            percent in 0i64..=100,
        ) {
            let shop = shop_with_items(&totals, discount);
            let selected: Vec<_> = shop.items.iter().map(|i| i.id).collect();
            let vouchers = vec![Voucher {
                id: VoucherId::new(),
                method: VoucherMethod::Percent,
                target: VoucherTarget::Shop,
                value: percent,
                max_discount: None,
            }];

            let selected_total: i64 = totals.iter().sum();
            let refund = recompute_refund_amount(&shop, &selected, &vouchers);

            prop_assert!(!refund.is_negative());
            prop_assert!(refund.as_minor() <= selected_total);
        }

        /// Property: with no discounts at all, the refund equals the selected total.
        #[test]
        fn undiscounted_refund_is_exact(
            totals in prop::collection::vec(1i64..100_000, 1..8),
        ) {
            let shop = shop_with_items(&totals, 0);
            let selected: Vec<_> = shop.items.iter().map(|i| i.id).collect();
            let refund = recompute_refund_amount(&shop, &selected, &[]);
            prop_assert_eq!(refund.as_minor(), totals.iter().sum::<i64>());
        }
    }
}
