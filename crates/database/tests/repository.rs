//! Integration tests against a live PostgreSQL instance.
//!
//! These are `#[ignore]`d so the default suite passes without a database.
//! Run them with:
//!
//! ```text
//! SHOPFRONT_TEST_DATABASE_URL=postgres://postgres@localhost/shopfront_test \
//!     cargo test -p database -- --ignored
//! ```

use chrono::{Duration, TimeZone, Utc};
use core_types::{NewCustomer, NewProduct, NewSale};
use database::{ensure_schema, DbError, DbRepository};
use rust_decimal_macros::dec;
use sqlx::PgPool;

async fn test_repository() -> DbRepository {
    let url = std::env::var("SHOPFRONT_TEST_DATABASE_URL")
        .expect("SHOPFRONT_TEST_DATABASE_URL must point at a scratch database");
    let pool = PgPool::connect(&url).await.expect("connect to test database");
    ensure_schema(&pool).await.expect("schema bootstrap");
    DbRepository::new(pool)
}

fn product(name: &str, quantity: i32) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        category: Some("integration-test".to_string()),
        price: dec!(25.00),
        cost: dec!(10.00),
        quantity,
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn product_round_trip() {
    let repo = test_repository().await;

    let created = repo
        .add_product(&product("rt-cigarillo-box", 12))
        .await
        .expect("insert");
    let fetched = repo
        .get_product(created.id)
        .await
        .expect("fetch")
        .expect("product should exist");

    assert_eq!(fetched.name, "rt-cigarillo-box");
    assert_eq!(fetched.category.as_deref(), Some("integration-test"));
    assert_eq!(fetched.price, dec!(25.00));
    assert_eq!(fetched.cost, dec!(10.00));
    assert_eq!(fetched.quantity, 12);

    repo.delete_product(created.id).await.expect("cleanup");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn sale_lifecycle_restores_and_applies_stock() {
    let repo = test_repository().await;
    let created = repo
        .add_product(&product("lc-pipe-tobacco", 20))
        .await
        .expect("insert product");
    let sold_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    // Selling 5 takes the stock from 20 to 15.
    let sale = repo
        .add_sale(&NewSale {
            product_id: created.id,
            customer_id: None,
            quantity: 5,
            unit_price: dec!(25.00),
            sold_at,
        })
        .await
        .expect("add sale");
    let after_add = repo.get_product(created.id).await.unwrap().unwrap();
    assert_eq!(after_add.quantity, 15);
    assert_eq!(sale.total, dec!(125.00));

    // Rewriting to 3 first restores the 5 (22), then applies the 3 (19).
    repo.update_sale(
        sale.id,
        &NewSale {
            product_id: created.id,
            customer_id: None,
            quantity: 3,
            unit_price: dec!(25.00),
            sold_at,
        },
    )
    .await
    .expect("update sale");
    let after_update = repo.get_product(created.id).await.unwrap().unwrap();
    assert_eq!(after_update.quantity, 19);

    // Deleting restores the 3.
    repo.delete_sale(sale.id).await.expect("delete sale");
    let after_delete = repo.get_product(created.id).await.unwrap().unwrap();
    assert_eq!(after_delete.quantity, 22);

    repo.delete_product(created.id).await.expect("cleanup");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn empty_range_aggregates_default_to_zero() {
    let repo = test_repository().await;

    // A window decades before any fixture data.
    let start = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
    let end = start + Duration::days(30);

    assert_eq!(repo.total_revenue(start, end, None).await.unwrap(), dec!(0));
    assert_eq!(repo.sale_count(start, end, None).await.unwrap(), 0);
    assert_eq!(repo.average_ticket(start, end, None).await.unwrap(), dec!(0));
    assert!(repo.daily_revenue(start, end, None).await.unwrap().is_empty());
    assert!(repo.sales_anomalies(start, end, None).await.unwrap().is_empty());
    assert!(repo.product_trends(start, end, None).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn price_stats_of_unknown_category_is_none() {
    let repo = test_repository().await;
    let stats = repo
        .price_stats(Some("category-that-does-not-exist"))
        .await
        .expect("query");
    assert!(stats.is_none());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn deleting_a_product_with_sales_is_rejected() {
    let repo = test_repository().await;
    let created = repo
        .add_product(&product("guard-snuff-tin", 10))
        .await
        .expect("insert product");
    let sale = repo
        .add_sale(&NewSale {
            product_id: created.id,
            customer_id: None,
            quantity: 1,
            unit_price: dec!(25.00),
            sold_at: Utc::now(),
        })
        .await
        .expect("add sale");

    let rejected = repo.delete_product(created.id).await;
    assert!(matches!(rejected, Err(DbError::ProductInUse(id)) if id == created.id));

    repo.delete_sale(sale.id).await.expect("cleanup sale");
    repo.delete_product(created.id).await.expect("cleanup product");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn deleting_a_customer_detaches_their_sales() {
    let repo = test_repository().await;
    let created = repo
        .add_product(&product("det-rolling-paper", 50))
        .await
        .expect("insert product");
    let customer = repo
        .add_customer(&NewCustomer {
            name: "det-test-customer".to_string(),
            email: None,
            phone: None,
        })
        .await
        .expect("insert customer");
    let sale = repo
        .add_sale(&NewSale {
            product_id: created.id,
            customer_id: Some(customer.id),
            quantity: 2,
            unit_price: dec!(25.00),
            sold_at: Utc::now(),
        })
        .await
        .expect("add sale");

    repo.delete_customer(customer.id).await.expect("delete customer");

    let detached = repo.get_sale(sale.id).await.unwrap().expect("sale survives");
    assert_eq!(detached.customer_id, None);

    repo.delete_sale(sale.id).await.expect("cleanup sale");
    repo.delete_product(created.id).await.expect("cleanup product");
}
