//! # Shopfront Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database. It is the system's single source of truth for
//! products, customers and sales.
//!
//! ## Architectural Principles
//!
//! - **Adapter layer:** This crate encapsulates all database-specific logic.
//!   It provides a clean, typed API to the rest of the application, hiding
//!   the underlying SQL.
//! - **Explicit ownership:** There is no global connection state. `connect`
//!   builds a pool from caller-supplied settings and `DbRepository` owns it;
//!   reconnecting with new parameters is constructing a new repository.
//! - **Atomic inventory:** Every mutation that touches stock (sale add,
//!   update, delete) runs inside a single transaction, so a failure can
//!   never leave the row mutation and the quantity adjustment half-applied.
//! - **Total aggregates:** Analytical reads never fail on empty data; each
//!   documents its zero/empty/`Option` default.
//!
//! ## Public API
//!
//! - `connect`: builds the connection pool from `DatabaseSettings`.
//! - `ensure_schema`: idempotent schema creation/upgrade.
//! - `DbRepository`: CRUD plus the aggregate report queries.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod reports;
pub mod repository;
pub mod schema;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
pub use reports::{
    CustomerFrequency, CustomerRevenue, CustomerStats, CustomerTicket, DailyRevenue,
    PeriodRevenue, PriceQuantityPair, PriceStats, ProductMargin, ProductRank, ProductTrend,
    SalesAnomaly, StockTurnover, WeekdayRevenue, DAYS_OF_STOCK_CAP,
};
pub use repository::DbRepository;
pub use schema::ensure_schema;
