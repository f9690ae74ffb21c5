//! Shopping cart lines and the add-to-cart request.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::{CartLineId, ProductId};

/// One product in a member's cart (matches the `/cart/list` response).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub cart_product_id: CartLineId,
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub price: i64,
    pub quantity: u32,
    #[serde(default)]
    pub checked: bool,
}

impl CartLine {
    pub fn amount(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// Total of the checked lines.
pub fn checked_total(lines: &[CartLine]) -> i64 {
    lines.iter().filter(|l| l.checked).map(CartLine::amount).sum()
}

/// Body of `POST /cart/insert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub member_id: String,
    pub product_id: ProductId,
    pub quantity: u32,
}

impl AddToCart {
    pub fn new(member_id: impl Into<String>, product_id: ProductId, quantity: u32) -> DomainResult<Self> {
        if quantity < 1 {
            return Err(DomainError::field(
                "quantity",
                "Purchase quantity must be at least 1.",
            ));
        }
        Ok(Self {
            member_id: member_id.into(),
            product_id,
            quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(price: i64, quantity: u32, checked: bool) -> CartLine {
        CartLine {
            cart_product_id: CartLineId::new(1),
            product_id: ProductId::new(1),
            name: "Latte".to_string(),
            image: "latte.png".to_string(),
            price,
            quantity,
            checked,
        }
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(AddToCart::new("m-1", ProductId::new(3), 0).is_err());
    }

    #[test]
    fn serializes_camel_case() {
        let req = AddToCart::new("m-1", ProductId::new(3), 2).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"memberId": "m-1", "productId": 3, "quantity": 2}));
    }

    #[test]
    fn total_ignores_unchecked_lines() {
        let lines = vec![line(1000, 2, true), line(500, 4, false)];
        assert_eq!(checked_total(&lines), 2000);
    }

    proptest! {
        #[test]
        fn any_positive_quantity_is_accepted(q in 1u32..10_000) {
            let req = AddToCart::new("m", ProductId::new(1), q).unwrap();
            prop_assert_eq!(req.quantity, q);
        }
    }
}
