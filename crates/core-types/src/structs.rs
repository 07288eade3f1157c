use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stocked product as it exists in the `products` table.
///
/// `quantity` is the current stock on hand. It is allowed to go negative:
/// sales decrement it without a floor, so an oversell shows up as negative
/// stock rather than a rejected sale.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    /// Current list price.
    pub price: Decimal,
    /// Unit acquisition cost; zero when unknown.
    pub cost: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting or updating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub cost: Decimal,
    pub quantity: i32,
}

impl NewProduct {
    /// Boundary validation: reject before any SQL runs, so a bad payload
    /// never mutates state.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("product name must not be empty".into()));
        }
        if self.price < Decimal::ZERO {
            return Err(CoreError::Validation("product price must not be negative".into()));
        }
        if self.cost < Decimal::ZERO {
            return Err(CoreError::Validation("product cost must not be negative".into()));
        }
        Ok(())
    }
}

/// A registered customer.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// Payload for inserting or updating a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl NewCustomer {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("customer name must not be empty".into()));
        }
        Ok(())
    }
}

/// A sale row. `unit_price` is the price at the time of sale and `total` is
/// `quantity * unit_price`, stored redundantly so aggregates never depend on
/// the product's current price.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Sale {
    pub id: i32,
    pub product_id: i32,
    pub customer_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub sold_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting or updating a sale. The total is computed by the
/// repository, never supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub product_id: i32,
    pub customer_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub sold_at: DateTime<Utc>,
}

impl NewSale {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.quantity < 1 {
            return Err(CoreError::Validation("sale quantity must be at least 1".into()));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(CoreError::Validation("sale unit price must not be negative".into()));
        }
        Ok(())
    }

    /// The redundant stored total.
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A sale joined with its product (and, when present, customer) for listing.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub category: Option<String>,
    pub customer_id: Option<i32>,
    pub customer_name: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub sold_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_sale() -> NewSale {
        NewSale {
            product_id: 1,
            customer_id: None,
            quantity: 3,
            unit_price: dec!(12.50),
            sold_at: Utc.with_ymd_and_hms(2024, 5, 10, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn sale_total_is_quantity_times_unit_price() {
        assert_eq!(sample_sale().total(), dec!(37.50));
    }

    #[test]
    fn sale_rejects_zero_quantity() {
        let mut sale = sample_sale();
        sale.quantity = 0;
        assert!(sale.validate().is_err());
    }

    #[test]
    fn sale_rejects_negative_price() {
        let mut sale = sample_sale();
        sale.unit_price = dec!(-1);
        assert!(sale.validate().is_err());
    }

    #[test]
    fn product_requires_name() {
        let product = NewProduct {
            name: "   ".into(),
            category: None,
            price: dec!(10),
            cost: dec!(4),
            quantity: 5,
        };
        assert!(product.validate().is_err());
    }

    #[test]
    fn product_accepts_zero_cost() {
        let product = NewProduct {
            name: "Lighter".into(),
            category: Some("Accessories".into()),
            price: dec!(3.50),
            cost: Decimal::ZERO,
            quantity: 100,
        };
        assert!(product.validate().is_ok());
    }
}
