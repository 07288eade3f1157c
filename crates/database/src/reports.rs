//! Read-only aggregate views over the sales history.
//!
//! Every query here shares the same contract: date-range filters are
//! inclusive on both bounds, the category filter is optional (no predicate
//! is applied when it is `None`), and an empty result is always a documented
//! zero/empty/`Option` default rather than an error, so presentation code
//! can render whatever comes back without null-checking.

use crate::repository::DbRepository;
use crate::DbError;
use analytics::detect_anomalies;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{AnomalyKind, Granularity, RankMetric};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// Sentinel for "stock on hand but no sales in range": the stockout horizon
/// is effectively unbounded, reported as 999 days.
pub const DAYS_OF_STOCK_CAP: f64 = 999.0;

/// One day of summed revenue.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub day: NaiveDate,
    pub revenue: Decimal,
}

/// Revenue summed into a `date_trunc` bucket.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PeriodRevenue {
    pub period: DateTime<Utc>,
    pub revenue: Decimal,
}

/// Revenue summed by day of week, 0 = Sunday .. 6 = Saturday.
///
/// Weekdays without sales are absent; use `WEEKDAY_NAMES` to label rows.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WeekdayRevenue {
    pub weekday: i32,
    pub revenue: Decimal,
}

/// A product ranked by total quantity or total revenue.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProductRank {
    pub name: String,
    pub value: Decimal,
}

/// Quantity movement between the two halves of a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTrend {
    pub product_id: i32,
    pub name: String,
    pub first_half: i64,
    pub second_half: i64,
    /// Percentage change between halves. A product that only sold in the
    /// second half reports exactly 100.
    pub change_pct: f64,
}

/// Inventory velocity for one product over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTurnover {
    pub product_id: i32,
    pub name: String,
    pub stock: i32,
    pub sold: i64,
    pub price: Decimal,
    /// Units sold divided by current stock; 0 when there is no stock.
    pub turnover: f64,
    /// Estimated days until stockout at the observed daily rate; capped at
    /// `DAYS_OF_STOCK_CAP` when nothing sold, 0 when there is no stock.
    pub days_of_stock: f64,
}

/// Descriptive statistics over product list prices.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PriceStats {
    pub count: i64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; 0 with fewer than two products.
    pub std_dev: f64,
}

/// A day whose revenue sits at or beyond two standard deviations from the
/// period mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesAnomaly {
    pub day: NaiveDate,
    pub revenue: f64,
    pub mean: f64,
    /// Distance from the mean in population standard deviations.
    pub deviations: f64,
    pub kind: AnomalyKind,
}

/// Raw (list price, quantity sold) observation for one product, for
/// consumer-side correlation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PriceQuantityPair {
    pub price: Decimal,
    pub quantity: i64,
}

/// Per-product profitability over a date range.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProductMargin {
    pub product_id: i32,
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub cost: Decimal,
    pub unit_margin: Decimal,
    /// Margin over price, as a percentage. `None` for zero-priced products.
    pub margin_pct: Option<Decimal>,
    pub quantity_sold: i64,
    pub revenue: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
}

/// A customer ranked by purchase count.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CustomerFrequency {
    pub customer_id: i32,
    pub name: String,
    pub purchases: i64,
    pub total_spent: Decimal,
}

/// A customer ranked by average ticket.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CustomerTicket {
    pub customer_id: i32,
    pub name: String,
    pub purchases: i64,
    pub total_spent: Decimal,
    pub average_ticket: Decimal,
}

/// Per-customer revenue summary over a date range.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CustomerRevenue {
    pub customer_id: i32,
    pub name: String,
    pub sales: i64,
    pub revenue: Decimal,
    pub average_ticket: Decimal,
    pub first_sale: DateTime<Utc>,
    pub last_sale: DateTime<Utc>,
}

/// Fleet-wide customer statistics.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CustomerStats {
    pub total_customers: i64,
    pub customers_with_sales: i64,
    pub total_sales: i64,
    pub total_revenue: Decimal,
    pub average_ticket: Decimal,
}

#[derive(Debug, FromRow)]
struct ProductQuantity {
    product_id: i32,
    name: String,
    quantity: i64,
}

#[derive(Debug, FromRow)]
struct StockRow {
    product_id: i32,
    name: String,
    stock: i32,
    sold: i64,
    price: Decimal,
}

impl DbRepository {
    /// Sum of sale totals in the range; 0 when nothing matched.
    pub async fn total_revenue(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> Result<Decimal, DbError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(v.total), 0)
            FROM sales v
            JOIN products p ON v.product_id = p.id
            WHERE v.sold_at BETWEEN $1 AND $2
              AND ($3::TEXT IS NULL OR p.category = $3)
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(category)
        .fetch_one(self.pool())
        .await?;
        Ok(total)
    }

    /// Number of sales in the range.
    pub async fn sale_count(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM sales v
            JOIN products p ON v.product_id = p.id
            WHERE v.sold_at BETWEEN $1 AND $2
              AND ($3::TEXT IS NULL OR p.category = $3)
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(category)
        .fetch_one(self.pool())
        .await?;
        Ok(count)
    }

    /// Revenue per sale over the range; 0 when there were no sales.
    pub async fn average_ticket(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> Result<Decimal, DbError> {
        let count = self.sale_count(start, end, category).await?;
        if count == 0 {
            return Ok(Decimal::ZERO);
        }
        let total = self.total_revenue(start, end, category).await?;
        Ok(total / Decimal::from(count))
    }

    /// Revenue summed per calendar day, ascending. Days without sales are
    /// absent.
    pub async fn daily_revenue(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> Result<Vec<DailyRevenue>, DbError> {
        let rows = sqlx::query_as::<_, DailyRevenue>(
            r#"
            SELECT (v.sold_at AT TIME ZONE 'UTC')::DATE AS day, SUM(v.total) AS revenue
            FROM sales v
            JOIN products p ON v.product_id = p.id
            WHERE v.sold_at BETWEEN $1 AND $2
              AND ($3::TEXT IS NULL OR p.category = $3)
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(category)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Revenue summed into day/week/month buckets, ascending by bucket.
    pub async fn revenue_by_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
        category: Option<&str>,
    ) -> Result<Vec<PeriodRevenue>, DbError> {
        let rows = sqlx::query_as::<_, PeriodRevenue>(
            r#"
            SELECT date_trunc($4, v.sold_at) AS period, SUM(v.total) AS revenue
            FROM sales v
            JOIN products p ON v.product_id = p.id
            WHERE v.sold_at BETWEEN $1 AND $2
              AND ($3::TEXT IS NULL OR p.category = $3)
            GROUP BY period
            ORDER BY period
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(category)
        .bind(granularity.as_trunc_unit())
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Revenue summed by day of week. Only weekdays with at least one sale
    /// appear, so callers must not assume all seven rows are present.
    pub async fn sales_by_weekday(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> Result<Vec<WeekdayRevenue>, DbError> {
        let rows = sqlx::query_as::<_, WeekdayRevenue>(
            r#"
            SELECT EXTRACT(DOW FROM v.sold_at AT TIME ZONE 'UTC')::INT AS weekday,
                   SUM(v.total) AS revenue
            FROM sales v
            JOIN products p ON v.product_id = p.id
            WHERE v.sold_at BETWEEN $1 AND $2
              AND ($3::TEXT IS NULL OR p.category = $3)
            GROUP BY weekday
            ORDER BY weekday
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(category)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// The best-selling products by units or by revenue, descending. The
    /// date range is optional; without one the ranking covers all history.
    /// Ordering between tied products is not deterministic.
    pub async fn top_products(
        &self,
        limit: i64,
        metric: RankMetric,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        category: Option<&str>,
    ) -> Result<Vec<ProductRank>, DbError> {
        let value_expr = match metric {
            RankMetric::Quantity => "SUM(v.quantity)::NUMERIC",
            RankMetric::Revenue => "SUM(v.total)",
        };
        let rows = sqlx::query_as::<_, ProductRank>(&format!(
            r#"
            SELECT p.name, {value_expr} AS value
            FROM sales v
            JOIN products p ON v.product_id = p.id
            WHERE ($1::TIMESTAMPTZ IS NULL OR v.sold_at >= $1)
              AND ($2::TIMESTAMPTZ IS NULL OR v.sold_at <= $2)
              AND ($3::TEXT IS NULL OR p.category = $3)
            GROUP BY p.id, p.name
            ORDER BY value DESC
            LIMIT $4
            "#
        ))
        .bind(start)
        .bind(end)
        .bind(category)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Splits the range at its midpoint and reports the percentage change in
    /// units sold per product between the halves, descending by change.
    ///
    /// The midpoint belongs to both halves. Products with sales in neither
    /// half do not appear.
    pub async fn product_trends(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> Result<Vec<ProductTrend>, DbError> {
        let midpoint = start + (end - start) / 2;
        let first = self.quantities_by_product(start, midpoint, category).await?;
        let second = self.quantities_by_product(midpoint, end, category).await?;

        let mut merged: BTreeMap<i32, (String, i64, i64)> = BTreeMap::new();
        for row in first {
            merged.insert(row.product_id, (row.name, row.quantity, 0));
        }
        for row in second {
            merged
                .entry(row.product_id)
                .and_modify(|e| e.2 = row.quantity)
                .or_insert((row.name, 0, row.quantity));
        }

        let mut trends: Vec<ProductTrend> = merged
            .into_iter()
            .filter(|(_, (_, first_half, second_half))| *first_half != 0 || *second_half != 0)
            .map(|(product_id, (name, first_half, second_half))| ProductTrend {
                product_id,
                name,
                first_half,
                second_half,
                change_pct: half_over_half_change(first_half, second_half),
            })
            .collect();

        trends.sort_by(|a, b| {
            b.change_pct
                .partial_cmp(&a.change_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(trends)
    }

    async fn quantities_by_product(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> Result<Vec<ProductQuantity>, DbError> {
        let rows = sqlx::query_as::<_, ProductQuantity>(
            r#"
            SELECT p.id AS product_id, p.name, SUM(v.quantity)::BIGINT AS quantity
            FROM sales v
            JOIN products p ON v.product_id = p.id
            WHERE v.sold_at BETWEEN $1 AND $2
              AND ($3::TEXT IS NULL OR p.category = $3)
            GROUP BY p.id, p.name
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(category)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Inventory velocity per product: units sold in range against current
    /// stock, plus the projected days until stockout.
    pub async fn stock_turnover(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> Result<Vec<StockTurnover>, DbError> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT p.id AS product_id, p.name, p.quantity AS stock,
                   COALESCE(SUM(v.quantity), 0)::BIGINT AS sold, p.price
            FROM products p
            LEFT JOIN sales v ON p.id = v.product_id AND v.sold_at BETWEEN $1 AND $2
            WHERE ($3::TEXT IS NULL OR p.category = $3)
            GROUP BY p.id, p.name, p.quantity, p.price
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(category)
        .fetch_all(self.pool())
        .await?;

        let days = days_in_range(start, end);
        Ok(rows
            .into_iter()
            .map(|row| {
                let (turnover, days_of_stock) = turnover_metrics(row.stock, row.sold, days);
                StockTurnover {
                    product_id: row.product_id,
                    name: row.name,
                    stock: row.stock,
                    sold: row.sold,
                    price: row.price,
                    turnover,
                    days_of_stock,
                }
            })
            .collect())
    }

    /// Count, mean, median, min, max and sample standard deviation of
    /// product list prices. `None` when no products match the filter.
    pub async fn price_stats(&self, category: Option<&str>) -> Result<Option<PriceStats>, DbError> {
        let stats = sqlx::query_as::<_, PriceStats>(
            r#"
            SELECT COUNT(*) AS count,
                   COALESCE(AVG(price)::FLOAT8, 0) AS mean,
                   COALESCE(PERCENTILE_CONT(0.5) WITHIN GROUP (ORDER BY price::FLOAT8), 0) AS median,
                   COALESCE(MIN(price)::FLOAT8, 0) AS min,
                   COALESCE(MAX(price)::FLOAT8, 0) AS max,
                   COALESCE(STDDEV(price)::FLOAT8, 0) AS std_dev
            FROM products
            WHERE ($1::TEXT IS NULL OR category = $1)
            "#,
        )
        .bind(category)
        .fetch_one(self.pool())
        .await?;

        Ok(if stats.count == 0 { None } else { Some(stats) })
    }

    /// Days whose revenue sits at or beyond two population standard
    /// deviations from the period mean. Empty with fewer than three days of
    /// data.
    pub async fn sales_anomalies(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> Result<Vec<SalesAnomaly>, DbError> {
        let series = self.daily_revenue(start, end, category).await?;
        let values: Vec<f64> = series
            .iter()
            .map(|d| d.revenue.to_f64().unwrap_or(0.0))
            .collect();

        Ok(detect_anomalies(&values)
            .into_iter()
            .map(|point| SalesAnomaly {
                day: series[point.index].day,
                revenue: point.value,
                mean: point.mean,
                deviations: point.deviations,
                kind: point.kind,
            })
            .collect())
    }

    /// Raw (list price, units sold) pairs per product. Consumers compute
    /// Pearson correlation themselves and need at least two pairs for it to
    /// mean anything.
    pub async fn price_quantity_pairs(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> Result<Vec<PriceQuantityPair>, DbError> {
        let rows = sqlx::query_as::<_, PriceQuantityPair>(
            r#"
            SELECT p.price, SUM(v.quantity)::BIGINT AS quantity
            FROM sales v
            JOIN products p ON v.product_id = p.id
            WHERE v.sold_at BETWEEN $1 AND $2
              AND ($3::TEXT IS NULL OR p.category = $3)
            GROUP BY p.id, p.price
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(category)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Per-product profitability over the range, descending by profit.
    /// Products without sales still appear with zeroed aggregates.
    pub async fn margin_analysis(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> Result<Vec<ProductMargin>, DbError> {
        let rows = sqlx::query_as::<_, ProductMargin>(
            r#"
            SELECT p.id AS product_id, p.name, p.category, p.price, p.cost,
                   (p.price - p.cost) AS unit_margin,
                   ((p.price - p.cost) / NULLIF(p.price, 0) * 100) AS margin_pct,
                   COALESCE(SUM(v.quantity), 0)::BIGINT AS quantity_sold,
                   COALESCE(SUM(v.total), 0) AS revenue,
                   (COALESCE(SUM(v.quantity), 0) * p.cost) AS total_cost,
                   (COALESCE(SUM(v.total), 0) - COALESCE(SUM(v.quantity), 0) * p.cost) AS profit
            FROM products p
            LEFT JOIN sales v ON p.id = v.product_id AND v.sold_at BETWEEN $1 AND $2
            WHERE ($3::TEXT IS NULL OR p.category = $3)
            GROUP BY p.id, p.name, p.category, p.price, p.cost
            ORDER BY profit DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(category)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Customers ranked by number of purchases, ties broken by total spend.
    /// Customers without a qualifying sale are excluded.
    pub async fn top_customers_by_frequency(
        &self,
        limit: i64,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<CustomerFrequency>, DbError> {
        let rows = sqlx::query_as::<_, CustomerFrequency>(
            r#"
            SELECT c.id AS customer_id, c.name,
                   COUNT(v.id) AS purchases, SUM(v.total) AS total_spent
            FROM customers c
            JOIN sales v ON c.id = v.customer_id
            WHERE ($1::TIMESTAMPTZ IS NULL OR v.sold_at >= $1)
              AND ($2::TIMESTAMPTZ IS NULL OR v.sold_at <= $2)
            GROUP BY c.id, c.name
            ORDER BY purchases DESC, total_spent DESC
            LIMIT $3
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Customers ranked by average ticket, descending. Customers without a
    /// qualifying sale are excluded.
    pub async fn top_customers_by_ticket(
        &self,
        limit: i64,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<CustomerTicket>, DbError> {
        let rows = sqlx::query_as::<_, CustomerTicket>(
            r#"
            SELECT c.id AS customer_id, c.name,
                   COUNT(v.id) AS purchases, SUM(v.total) AS total_spent,
                   AVG(v.total) AS average_ticket
            FROM customers c
            JOIN sales v ON c.id = v.customer_id
            WHERE ($1::TIMESTAMPTZ IS NULL OR v.sold_at >= $1)
              AND ($2::TIMESTAMPTZ IS NULL OR v.sold_at <= $2)
            GROUP BY c.id, c.name
            ORDER BY average_ticket DESC
            LIMIT $3
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Per-customer revenue, ticket and first/last purchase over the range,
    /// descending by revenue. Customers without a sale in range are
    /// excluded.
    pub async fn revenue_by_customer(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CustomerRevenue>, DbError> {
        let rows = sqlx::query_as::<_, CustomerRevenue>(
            r#"
            SELECT c.id AS customer_id, c.name,
                   COUNT(v.id) AS sales, SUM(v.total) AS revenue,
                   AVG(v.total) AS average_ticket,
                   MIN(v.sold_at) AS first_sale, MAX(v.sold_at) AS last_sale
            FROM customers c
            JOIN sales v ON c.id = v.customer_id
            WHERE v.sold_at BETWEEN $1 AND $2
            GROUP BY c.id, c.name
            ORDER BY revenue DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Fleet-wide customer statistics. The date filter narrows which sales
    /// count, never which customers exist, so `total_customers` is stable
    /// across ranges.
    pub async fn customer_stats(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<CustomerStats, DbError> {
        let stats = sqlx::query_as::<_, CustomerStats>(
            r#"
            SELECT COUNT(DISTINCT c.id) AS total_customers,
                   COUNT(DISTINCT v.customer_id) AS customers_with_sales,
                   COUNT(v.id) AS total_sales,
                   COALESCE(SUM(v.total), 0) AS total_revenue,
                   COALESCE(AVG(v.total), 0) AS average_ticket
            FROM customers c
            LEFT JOIN sales v ON c.id = v.customer_id
                AND ($1::TIMESTAMPTZ IS NULL OR v.sold_at >= $1)
                AND ($2::TIMESTAMPTZ IS NULL OR v.sold_at <= $2)
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(self.pool())
        .await?;
        Ok(stats)
    }
}

/// Percentage change in units between the halves of a range. A product with
/// no first-half sales but second-half sales reports a flat 100 rather than
/// a division blow-up.
fn half_over_half_change(first: i64, second: i64) -> f64 {
    if first > 0 {
        (second - first) as f64 / first as f64 * 100.0
    } else if second > 0 {
        100.0
    } else {
        0.0
    }
}

/// Whole days covered by the range, floored at 1 so single-day ranges never
/// divide by zero.
fn days_in_range(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_days().max(1)
}

/// (turnover, days-of-stock) for one product.
fn turnover_metrics(stock: i32, sold: i64, days: i64) -> (f64, f64) {
    let stock_f = f64::from(stock);
    let sold_f = sold as f64;

    let turnover = if stock > 0 { sold_f / stock_f } else { 0.0 };

    let daily_rate = sold_f / days as f64;
    let days_of_stock = if daily_rate > 0.0 {
        stock_f / daily_rate
    } else if stock > 0 {
        DAYS_OF_STOCK_CAP
    } else {
        0.0
    };

    (turnover, days_of_stock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn change_pct_is_exactly_100_for_new_movers() {
        assert_eq!(half_over_half_change(0, 7), 100.0);
        assert_eq!(half_over_half_change(0, 1), 100.0);
    }

    #[test]
    fn change_pct_for_ordinary_movement() {
        assert_eq!(half_over_half_change(10, 15), 50.0);
        assert_eq!(half_over_half_change(10, 5), -50.0);
        assert_eq!(half_over_half_change(4, 4), 0.0);
    }

    #[test]
    fn change_pct_for_no_movement_at_all() {
        assert_eq!(half_over_half_change(0, 0), 0.0);
    }

    #[test]
    fn days_in_range_floors_at_one() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(days_in_range(start, start), 1);

        let end = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        assert_eq!(days_in_range(start, end), 10);
    }

    #[test]
    fn turnover_zero_stock_is_all_zero() {
        // Even with sales in range, no stock means turnover 0 and 0 days of
        // stock.
        assert_eq!(turnover_metrics(0, 40, 30), (0.0, 0.0));
        assert_eq!(turnover_metrics(0, 0, 30), (0.0, 0.0));
    }

    #[test]
    fn turnover_no_sales_caps_days_of_stock() {
        let (turnover, days_of_stock) = turnover_metrics(25, 0, 30);
        assert_eq!(turnover, 0.0);
        assert_eq!(days_of_stock, DAYS_OF_STOCK_CAP);
    }

    #[test]
    fn turnover_ordinary_case() {
        // 60 units in 30 days against 20 in stock: turnover 3, two units a
        // day, ten days of cover.
        let (turnover, days_of_stock) = turnover_metrics(20, 60, 30);
        assert!((turnover - 3.0).abs() < 1e-9);
        assert!((days_of_stock - 10.0).abs() < 1e-9);
    }
}
