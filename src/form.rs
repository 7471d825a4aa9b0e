// ===============================
// src/form.rs
// ===============================
//
// Form "Nueva Venta": validasi di sisi presentasi, sebelum SaleRecorder
// dipanggil. Stok dicek terhadap inventory yang terakhir dibaca, tanpa
// memanggil remote store.
//
use crate::domain::InventoryItem;
use crate::error::{Error, Result};

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 100;
pub const DEFAULT_UNIT_PRICE: f64 = 2.50;
pub const DEFAULT_NOTES: &str = "Venta";

#[derive(Debug, Clone, PartialEq)]
pub struct SaleForm {
    pub product: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub notes: String,
}

impl SaleForm {
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            quantity: MIN_QUANTITY,
            unit_price: DEFAULT_UNIT_PRICE,
            notes: DEFAULT_NOTES.to_string(),
        }
    }

    /// Choices offered by the product selector.
    pub fn choices(items: &[InventoryItem]) -> Vec<&str> {
        items.iter().map(|i| i.product.as_str()).collect()
    }

    pub fn validate(&self, items: &[InventoryItem]) -> Result<()> {
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&self.quantity) {
            return Err(Error::InvalidSale(format!(
                "quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY}, got {}",
                self.quantity
            )));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(Error::InvalidSale(format!("unit price must be >= 0, got {}", self.unit_price)));
        }
        let item = items
            .iter()
            .find(|i| i.product == self.product)
            .ok_or_else(|| Error::ProductNotFound(self.product.clone()))?;
        let requested = f64::from(self.quantity);
        if requested > item.quantity {
            return Err(Error::InsufficientStock {
                product: self.product.clone(),
                requested,
                available: item.quantity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> Vec<InventoryItem> {
        vec![
            InventoryItem { product: "Widget".into(), quantity: 10.0, purchase_price: 1.0, sale_price: 2.5, row: 2 },
            InventoryItem { product: "Gadget".into(), quantity: 2.0, purchase_price: 3.0, sale_price: 5.0, row: 3 },
        ]
    }

    #[test]
    fn defaults() {
        let f = SaleForm::new("Widget");
        assert_eq!(f.quantity, 1);
        assert_eq!(f.unit_price, 2.5);
        assert_eq!(f.notes, "Venta");
        assert!(f.validate(&inventory()).is_ok());
        assert_eq!(SaleForm::choices(&inventory()), ["Widget", "Gadget"]);
    }

    #[test]
    fn quantity_bounds() {
        let inv = vec![InventoryItem { product: "W".into(), quantity: 500.0, purchase_price: 1.0, sale_price: 1.0, row: 2 }];
        let mut f = SaleForm::new("W");
        f.quantity = 0;
        assert!(matches!(f.validate(&inv), Err(Error::InvalidSale(_))));
        f.quantity = 101;
        assert!(matches!(f.validate(&inv), Err(Error::InvalidSale(_))));
        f.quantity = 100;
        assert!(f.validate(&inv).is_ok());
    }

    #[test]
    fn price_must_be_non_negative() {
        let mut f = SaleForm::new("Widget");
        f.unit_price = -0.1;
        assert!(matches!(f.validate(&inventory()), Err(Error::InvalidSale(_))));
        f.unit_price = 0.0;
        assert!(f.validate(&inventory()).is_ok());
    }

    #[test]
    fn stock_is_checked_against_last_read() {
        let mut f = SaleForm::new("Gadget");
        f.quantity = 3;
        match f.validate(&inventory()) {
            Err(Error::InsufficientStock { available, requested, .. }) => {
                assert_eq!(available, 2.0);
                assert_eq!(requested, 3.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        f.quantity = 2;
        assert!(f.validate(&inventory()).is_ok());
    }

    #[test]
    fn unknown_product() {
        let f = SaleForm::new("Nope");
        assert!(matches!(f.validate(&inventory()), Err(Error::ProductNotFound(_))));
    }
}
