use analytics::{linear_trend, pearson_correlation};
use chrono::{DateTime, Months, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use core_types::{Granularity, NewCustomer, NewProduct, NewSale, RankMetric, WEEKDAY_NAMES};
use database::{connect, ensure_schema, DbRepository};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// The main entry point for the shopfront application.
#[tokio::main]
async fn main() {
    // Load environment variables (database password in particular) from .env.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command-line arguments before touching the database.
    let cli = Cli::parse();

    let settings = configuration::load_settings().expect("Failed to load configuration");
    let pool = connect(&settings.database)
        .await
        .expect("Failed to connect to the database");
    ensure_schema(&pool)
        .await
        .expect("Failed to prepare the database schema");
    let repo = DbRepository::new(pool);

    if let Err(e) = run(cli.command, &repo).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Inventory, sales and customer analytics for a small retail counter.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// A plain date window, inclusive on both ends.
#[derive(Args)]
struct WindowArgs {
    /// Start date (YYYY-MM-DD); defaults to six months ago.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl WindowArgs {
    fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = Utc::now().date_naive();
        let to = self.to.unwrap_or(today);
        let from = self
            .from
            .unwrap_or_else(|| today.checked_sub_months(Months::new(6)).unwrap_or(today));
        (
            from.and_hms_opt(0, 0, 0).unwrap().and_utc(),
            to.and_hms_opt(23, 59, 59).unwrap().and_utc(),
        )
    }
}

/// A date window plus the optional category filter most reports accept.
#[derive(Args)]
struct RangeArgs {
    #[command(flatten)]
    window: WindowArgs,

    /// Restrict to a single product category.
    #[arg(long)]
    category: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the product catalogue.
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Manage registered customers.
    Customers {
        #[command(subcommand)]
        command: CustomerCommands,
    },
    /// Record and inspect sales.
    Sales {
        #[command(subcommand)]
        command: SaleCommands,
    },
    /// Headline figures for a date window: sales, revenue, average ticket.
    Summary(RangeArgs),
    /// Revenue grouped by day, week or month.
    Revenue {
        #[command(flatten)]
        range: RangeArgs,
        /// Bucket size: day, week or month.
        #[arg(long, default_value = "day")]
        granularity: Granularity,
    },
    /// Revenue by day of the week.
    Weekdays(RangeArgs),
    /// Best sellers by units or by revenue.
    TopProducts {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value_t = 10)]
        limit: i64,
        /// Rank by revenue instead of units sold.
        #[arg(long)]
        by_revenue: bool,
    },
    /// Per-product movement between the two halves of the window.
    Trends(RangeArgs),
    /// Stock turnover and projected days of stock per product.
    Turnover(RangeArgs),
    /// Descriptive statistics over product list prices.
    PriceStats {
        /// Restrict to a single product category.
        #[arg(long)]
        category: Option<String>,
    },
    /// Days with revenue far outside the window's normal band.
    Anomalies(RangeArgs),
    /// Pearson correlation between list price and units sold.
    Correlation(RangeArgs),
    /// Per-product margin and profit figures.
    Margins(RangeArgs),
    /// Customers ranked by purchase count or average ticket.
    TopCustomers {
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, default_value_t = 10)]
        limit: i64,
        /// Rank by average ticket instead of purchase count.
        #[arg(long)]
        by_ticket: bool,
    },
    /// Revenue, ticket and first/last purchase per customer.
    CustomerRevenue(WindowArgs),
    /// Fleet-wide customer statistics.
    CustomerStats(WindowArgs),
}

#[derive(Subcommand)]
enum ProductCommands {
    /// List every product.
    List,
    /// Add a product to the catalogue.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        price: Decimal,
        #[arg(long, default_value_t = Decimal::ZERO)]
        cost: Decimal,
        #[arg(long, default_value_t = 0)]
        quantity: i32,
    },
    /// Delete a product (rejected while sales still reference it).
    Remove { id: i32 },
}

#[derive(Subcommand)]
enum CustomerCommands {
    /// List every customer.
    List,
    /// Register a customer.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a customer; their sales are kept and detached.
    Remove { id: i32 },
}

#[derive(Subcommand)]
enum SaleCommands {
    /// List every sale, newest first.
    List,
    /// Record a sale and decrement the product's stock.
    Add {
        #[arg(long)]
        product_id: i32,
        #[arg(long)]
        customer_id: Option<i32>,
        #[arg(long)]
        quantity: i32,
        /// Unit price; defaults to the product's current list price.
        #[arg(long)]
        price: Option<Decimal>,
        /// Sale date (YYYY-MM-DD); defaults to now.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a sale and restore its quantity to the product.
    Remove { id: i32 },
}

// ==============================================================================
// Command dispatch
// ==============================================================================

async fn run(command: Commands, repo: &DbRepository) -> anyhow::Result<()> {
    match command {
        Commands::Products { command } => handle_products(command, repo).await,
        Commands::Customers { command } => handle_customers(command, repo).await,
        Commands::Sales { command } => handle_sales(command, repo).await,
        Commands::Summary(range) => handle_summary(range, repo).await,
        Commands::Revenue { range, granularity } => handle_revenue(range, granularity, repo).await,
        Commands::Weekdays(range) => handle_weekdays(range, repo).await,
        Commands::TopProducts {
            range,
            limit,
            by_revenue,
        } => handle_top_products(range, limit, by_revenue, repo).await,
        Commands::Trends(range) => handle_trends(range, repo).await,
        Commands::Turnover(range) => handle_turnover(range, repo).await,
        Commands::PriceStats { category } => handle_price_stats(category, repo).await,
        Commands::Anomalies(range) => handle_anomalies(range, repo).await,
        Commands::Correlation(range) => handle_correlation(range, repo).await,
        Commands::Margins(range) => handle_margins(range, repo).await,
        Commands::TopCustomers {
            window,
            limit,
            by_ticket,
        } => handle_top_customers(window, limit, by_ticket, repo).await,
        Commands::CustomerRevenue(window) => handle_customer_revenue(window, repo).await,
        Commands::CustomerStats(window) => handle_customer_stats(window, repo).await,
    }
}

async fn handle_products(command: ProductCommands, repo: &DbRepository) -> anyhow::Result<()> {
    match command {
        ProductCommands::List => {
            let products = repo.list_products().await?;
            let mut table = Table::new();
            table.set_header(vec!["Id", "Name", "Category", "Price", "Cost", "Stock"]);
            for p in products {
                table.add_row(vec![
                    p.id.to_string(),
                    p.name,
                    p.category.unwrap_or_default(),
                    p.price.to_string(),
                    p.cost.to_string(),
                    p.quantity.to_string(),
                ]);
            }
            println!("{table}");
        }
        ProductCommands::Add {
            name,
            category,
            price,
            cost,
            quantity,
        } => {
            let created = repo
                .add_product(&NewProduct {
                    name,
                    category,
                    price,
                    cost,
                    quantity,
                })
                .await?;
            println!("Added product {} ({})", created.id, created.name);
        }
        ProductCommands::Remove { id } => {
            repo.delete_product(id).await?;
            println!("Deleted product {id}");
        }
    }
    Ok(())
}

async fn handle_customers(command: CustomerCommands, repo: &DbRepository) -> anyhow::Result<()> {
    match command {
        CustomerCommands::List => {
            let customers = repo.list_customers().await?;
            let mut table = Table::new();
            table.set_header(vec!["Id", "Name", "Email", "Phone", "Registered"]);
            for c in customers {
                table.add_row(vec![
                    c.id.to_string(),
                    c.name,
                    c.email.unwrap_or_default(),
                    c.phone.unwrap_or_default(),
                    c.registered_at.format("%Y-%m-%d").to_string(),
                ]);
            }
            println!("{table}");
        }
        CustomerCommands::Add { name, email, phone } => {
            let created = repo
                .add_customer(&NewCustomer { name, email, phone })
                .await?;
            println!("Added customer {} ({})", created.id, created.name);
        }
        CustomerCommands::Remove { id } => {
            repo.delete_customer(id).await?;
            println!("Deleted customer {id}");
        }
    }
    Ok(())
}

async fn handle_sales(command: SaleCommands, repo: &DbRepository) -> anyhow::Result<()> {
    match command {
        SaleCommands::List => {
            let sales = repo.list_sales().await?;
            let mut table = Table::new();
            table.set_header(vec![
                "Id", "Product", "Customer", "Qty", "Unit price", "Total", "Date",
            ]);
            for s in sales {
                table.add_row(vec![
                    s.id.to_string(),
                    s.product_name,
                    s.customer_name.unwrap_or_else(|| "-".to_string()),
                    s.quantity.to_string(),
                    s.unit_price.to_string(),
                    s.total.to_string(),
                    s.sold_at.format("%Y-%m-%d %H:%M").to_string(),
                ]);
            }
            println!("{table}");
        }
        SaleCommands::Add {
            product_id,
            customer_id,
            quantity,
            price,
            date,
        } => {
            let unit_price = match price {
                Some(p) => p,
                None => {
                    let product = repo
                        .get_product(product_id)
                        .await?
                        .ok_or_else(|| anyhow::anyhow!("no product with id {product_id}"))?;
                    product.price
                }
            };
            let sold_at = match date {
                Some(d) => d.and_hms_opt(12, 0, 0).unwrap().and_utc(),
                None => Utc::now(),
            };
            let created = repo
                .add_sale(&NewSale {
                    product_id,
                    customer_id,
                    quantity,
                    unit_price,
                    sold_at,
                })
                .await?;
            println!("Recorded sale {} (total {})", created.id, created.total);
        }
        SaleCommands::Remove { id } => {
            repo.delete_sale(id).await?;
            println!("Deleted sale {id}");
        }
    }
    Ok(())
}

async fn handle_summary(range: RangeArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let (start, end) = range.window.bounds();
    let category = range.category.as_deref();

    let count = repo.sale_count(start, end, category).await?;
    let revenue = repo.total_revenue(start, end, category).await?;
    let ticket = repo.average_ticket(start, end, category).await?;

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Sales".to_string(), count.to_string()]);
    table.add_row(vec!["Revenue".to_string(), revenue.to_string()]);
    table.add_row(vec!["Average ticket".to_string(), ticket.round_dp(2).to_string()]);
    println!("{table}");
    Ok(())
}

async fn handle_revenue(
    range: RangeArgs,
    granularity: Granularity,
    repo: &DbRepository,
) -> anyhow::Result<()> {
    let (start, end) = range.window.bounds();
    let rows = repo
        .revenue_by_period(start, end, granularity, range.category.as_deref())
        .await?;

    let mut table = Table::new();
    table.set_header(vec!["Period", "Revenue"]);
    for row in &rows {
        table.add_row(vec![
            row.period.format("%Y-%m-%d").to_string(),
            row.revenue.to_string(),
        ]);
    }
    println!("{table}");

    // Overlay the least-squares trend the way the revenue chart would.
    let values: Vec<f64> = rows
        .iter()
        .map(|r| r.revenue.to_f64().unwrap_or(0.0))
        .collect();
    if let Ok(trend) = linear_trend(&values) {
        println!("Trend: {:+.2} per bucket", trend.slope);
    }
    Ok(())
}

async fn handle_weekdays(range: RangeArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let (start, end) = range.window.bounds();
    let rows = repo
        .sales_by_weekday(start, end, range.category.as_deref())
        .await?;

    let mut table = Table::new();
    table.set_header(vec!["Weekday", "Revenue"]);
    for row in rows {
        let name = WEEKDAY_NAMES
            .get(row.weekday as usize)
            .copied()
            .unwrap_or("?");
        table.add_row(vec![name.to_string(), row.revenue.to_string()]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_top_products(
    range: RangeArgs,
    limit: i64,
    by_revenue: bool,
    repo: &DbRepository,
) -> anyhow::Result<()> {
    let (start, end) = range.window.bounds();
    let metric = if by_revenue {
        RankMetric::Revenue
    } else {
        RankMetric::Quantity
    };
    let rows = repo
        .top_products(limit, metric, Some(start), Some(end), range.category.as_deref())
        .await?;

    let mut table = Table::new();
    table.set_header(vec![
        "Product",
        if by_revenue { "Revenue" } else { "Units" },
    ]);
    for row in rows {
        table.add_row(vec![row.name, row.value.to_string()]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_trends(range: RangeArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let (start, end) = range.window.bounds();
    let rows = repo
        .product_trends(start, end, range.category.as_deref())
        .await?;

    let mut table = Table::new();
    table.set_header(vec!["Product", "First half", "Second half", "Change %"]);
    for row in rows {
        table.add_row(vec![
            row.name,
            row.first_half.to_string(),
            row.second_half.to_string(),
            format!("{:+.1}", row.change_pct),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_turnover(range: RangeArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let (start, end) = range.window.bounds();
    let rows = repo
        .stock_turnover(start, end, range.category.as_deref())
        .await?;

    let mut table = Table::new();
    table.set_header(vec!["Product", "Stock", "Sold", "Turnover", "Days of stock"]);
    for row in rows {
        table.add_row(vec![
            row.name,
            row.stock.to_string(),
            row.sold.to_string(),
            format!("{:.2}", row.turnover),
            format!("{:.0}", row.days_of_stock),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_price_stats(category: Option<String>, repo: &DbRepository) -> anyhow::Result<()> {
    match repo.price_stats(category.as_deref()).await? {
        Some(stats) => {
            let mut table = Table::new();
            table.set_header(vec!["Statistic", "Value"]);
            table.add_row(vec!["Products".to_string(), stats.count.to_string()]);
            table.add_row(vec!["Mean".to_string(), format!("{:.2}", stats.mean)]);
            table.add_row(vec!["Median".to_string(), format!("{:.2}", stats.median)]);
            table.add_row(vec!["Min".to_string(), format!("{:.2}", stats.min)]);
            table.add_row(vec!["Max".to_string(), format!("{:.2}", stats.max)]);
            table.add_row(vec!["Std dev".to_string(), format!("{:.2}", stats.std_dev)]);
            println!("{table}");
        }
        None => println!("No products match that filter."),
    }
    Ok(())
}

async fn handle_anomalies(range: RangeArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let (start, end) = range.window.bounds();
    let rows = repo
        .sales_anomalies(start, end, range.category.as_deref())
        .await?;

    if rows.is_empty() {
        println!("No anomalous days in the window.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Day", "Revenue", "Mean", "Sigmas", "Kind"]);
    for row in rows {
        table.add_row(vec![
            row.day.to_string(),
            format!("{:.2}", row.revenue),
            format!("{:.2}", row.mean),
            format!("{:.2}", row.deviations),
            format!("{:?}", row.kind),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_correlation(range: RangeArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let (start, end) = range.window.bounds();
    let pairs = repo
        .price_quantity_pairs(start, end, range.category.as_deref())
        .await?;

    let (prices, quantities): (Vec<f64>, Vec<f64>) = pairs
        .iter()
        .filter_map(|p| p.price.to_f64().map(|price| (price, p.quantity as f64)))
        .unzip();

    match pearson_correlation(&prices, &quantities) {
        Some(r) => println!("Price vs. units sold: r = {r:.3} over {} products", prices.len()),
        None => println!("No correlation to report (need at least two products with spread)."),
    }
    Ok(())
}

async fn handle_margins(range: RangeArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let (start, end) = range.window.bounds();
    let rows = repo
        .margin_analysis(start, end, range.category.as_deref())
        .await?;

    let mut table = Table::new();
    table.set_header(vec![
        "Product", "Price", "Cost", "Margin %", "Sold", "Revenue", "Profit",
    ]);
    for row in rows {
        table.add_row(vec![
            row.name,
            row.price.to_string(),
            row.cost.to_string(),
            row.margin_pct
                .map(|m| format!("{:.1}", m))
                .unwrap_or_else(|| "-".to_string()),
            row.quantity_sold.to_string(),
            row.revenue.to_string(),
            row.profit.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_top_customers(
    window: WindowArgs,
    limit: i64,
    by_ticket: bool,
    repo: &DbRepository,
) -> anyhow::Result<()> {
    let (start, end) = window.bounds();

    let mut table = Table::new();
    if by_ticket {
        table.set_header(vec!["Customer", "Purchases", "Spent", "Average ticket"]);
        for row in repo
            .top_customers_by_ticket(limit, Some(start), Some(end))
            .await?
        {
            table.add_row(vec![
                row.name,
                row.purchases.to_string(),
                row.total_spent.to_string(),
                row.average_ticket.round_dp(2).to_string(),
            ]);
        }
    } else {
        table.set_header(vec!["Customer", "Purchases", "Spent"]);
        for row in repo
            .top_customers_by_frequency(limit, Some(start), Some(end))
            .await?
        {
            table.add_row(vec![
                row.name,
                row.purchases.to_string(),
                row.total_spent.to_string(),
            ]);
        }
    }
    println!("{table}");
    Ok(())
}

async fn handle_customer_revenue(window: WindowArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let (start, end) = window.bounds();
    let rows = repo.revenue_by_customer(start, end).await?;

    let mut table = Table::new();
    table.set_header(vec![
        "Customer", "Sales", "Revenue", "Average ticket", "First", "Last",
    ]);
    for row in rows {
        table.add_row(vec![
            row.name,
            row.sales.to_string(),
            row.revenue.to_string(),
            row.average_ticket.round_dp(2).to_string(),
            row.first_sale.format("%Y-%m-%d").to_string(),
            row.last_sale.format("%Y-%m-%d").to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_customer_stats(window: WindowArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let (start, end) = window.bounds();
    let stats = repo.customer_stats(Some(start), Some(end)).await?;

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        "Customers".to_string(),
        stats.total_customers.to_string(),
    ]);
    table.add_row(vec![
        "Customers with purchases".to_string(),
        stats.customers_with_sales.to_string(),
    ]);
    table.add_row(vec!["Sales".to_string(), stats.total_sales.to_string()]);
    table.add_row(vec![
        "Revenue".to_string(),
        stats.total_revenue.to_string(),
    ]);
    table.add_row(vec![
        "Average ticket".to_string(),
        stats.average_ticket.round_dp(2).to_string(),
    ]);
    println!("{table}");
    Ok(())
}
