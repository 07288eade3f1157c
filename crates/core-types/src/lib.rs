pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AnomalyKind, Granularity, RankMetric, WEEKDAY_NAMES};
pub use error::CoreError;
pub use structs::{
    Customer, NewCustomer, NewProduct, NewSale, Product, Sale, SaleRecord,
};
