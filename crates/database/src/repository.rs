use crate::DbError;
use core_types::{Customer, NewCustomer, NewProduct, NewSale, Product, Sale, SaleRecord};
use sqlx::postgres::PgPool;
use tracing::debug;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
///
/// It owns its pool: callers construct one per connection and pass it
/// around, and reconnecting with new parameters just means building a new
/// repository over a new pool.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

const PRODUCT_COLUMNS: &str = "id, name, category, price, cost, quantity, created_at";
const SALE_COLUMNS: &str =
    "id, product_id, customer_id, quantity, unit_price, total, sold_at, created_at";

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ==========================================================================
    // Products
    // ==========================================================================

    /// Fetches all products, ordered by id.
    pub async fn list_products(&self) -> Result<Vec<Product>, DbError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Fetches a single product by id.
    pub async fn get_product(&self, id: i32) -> Result<Option<Product>, DbError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    /// Inserts a product and returns the stored row, including the generated
    /// id.
    pub async fn add_product(&self, product: &NewProduct) -> Result<Product, DbError> {
        product.validate()?;

        let inserted = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, category, price, cost, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(product.category.as_deref())
        .bind(product.price)
        .bind(product.cost)
        .bind(product.quantity)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = inserted.id, name = %inserted.name, "product added");
        Ok(inserted)
    }

    /// Overwrites a product's mutable fields.
    pub async fn update_product(&self, id: i32, product: &NewProduct) -> Result<(), DbError> {
        product.validate()?;

        let result = sqlx::query(
            "UPDATE products SET name = $1, category = $2, price = $3, cost = $4, quantity = $5 WHERE id = $6",
        )
        .bind(&product.name)
        .bind(product.category.as_deref())
        .bind(product.price)
        .bind(product.cost)
        .bind(product.quantity)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    /// Deletes a product.
    ///
    /// Rejected with `ProductInUse` while any sale still references the
    /// product; callers must delete or reassign those sales first. This keeps
    /// historical sales intact instead of cascading or orphaning them.
    pub async fn delete_product(&self, id: i32) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let in_use = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sales WHERE product_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if in_use {
            return Err(DbError::ProductInUse(id));
        }

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        tx.commit().await?;
        debug!(id, "product deleted");
        Ok(())
    }

    /// Fetches the distinct non-null categories, sorted.
    pub async fn list_categories(&self) -> Result<Vec<String>, DbError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products WHERE category IS NOT NULL ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    // ==========================================================================
    // Customers
    // ==========================================================================

    /// Fetches all customers, ordered by name.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, DbError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, registered_at FROM customers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    /// Fetches a single customer by id.
    pub async fn get_customer(&self, id: i32) -> Result<Option<Customer>, DbError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, registered_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    /// Inserts a customer and returns the stored row.
    pub async fn add_customer(&self, customer: &NewCustomer) -> Result<Customer, DbError> {
        customer.validate()?;

        let inserted = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, phone, registered_at
            "#,
        )
        .bind(&customer.name)
        .bind(customer.email.as_deref())
        .bind(customer.phone.as_deref())
        .fetch_one(&self.pool)
        .await?;

        debug!(id = inserted.id, name = %inserted.name, "customer added");
        Ok(inserted)
    }

    /// Overwrites a customer's mutable fields.
    pub async fn update_customer(&self, id: i32, customer: &NewCustomer) -> Result<(), DbError> {
        customer.validate()?;

        let result =
            sqlx::query("UPDATE customers SET name = $1, email = $2, phone = $3 WHERE id = $4")
                .bind(&customer.name)
                .bind(customer.email.as_deref())
                .bind(customer.phone.as_deref())
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    /// Deletes a customer, detaching (not deleting) their sales.
    ///
    /// The null-out and the delete run in one transaction so a failure can
    /// never leave sales pointing at a missing customer.
    pub async fn delete_customer(&self, id: i32) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE sales SET customer_id = NULL WHERE customer_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        tx.commit().await?;
        debug!(id, "customer deleted");
        Ok(())
    }

    // ==========================================================================
    // Sales
    // ==========================================================================

    /// Fetches all sales joined with product and customer names, newest
    /// first.
    pub async fn list_sales(&self) -> Result<Vec<SaleRecord>, DbError> {
        let sales = sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT v.id, v.product_id, p.name AS product_name, p.category,
                   v.customer_id, c.name AS customer_name,
                   v.quantity, v.unit_price, v.total, v.sold_at
            FROM sales v
            JOIN products p ON v.product_id = p.id
            LEFT JOIN customers c ON v.customer_id = c.id
            ORDER BY v.sold_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    /// Fetches a single sale by id.
    pub async fn get_sale(&self, id: i32) -> Result<Option<Sale>, DbError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sale)
    }

    /// Records a sale and decrements the product's stock in one transaction.
    ///
    /// Stock is not floored: an oversell leaves the product with negative
    /// quantity rather than failing the sale.
    pub async fn add_sale(&self, sale: &NewSale) -> Result<Sale, DbError> {
        sale.validate()?;

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Sale>(&format!(
            r#"
            INSERT INTO sales (product_id, customer_id, quantity, unit_price, total, sold_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(sale.product_id)
        .bind(sale.customer_id)
        .bind(sale.quantity)
        .bind(sale.unit_price)
        .bind(sale.total())
        .bind(sale.sold_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET quantity = quantity - $1 WHERE id = $2")
            .bind(sale.quantity)
            .bind(sale.product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(
            id = inserted.id,
            product_id = sale.product_id,
            quantity = sale.quantity,
            "sale recorded"
        );
        Ok(inserted)
    }

    /// Rewrites a sale, restoring the old quantity to the old product before
    /// applying the new quantity to the new product. The restore, the row
    /// update and the decrement commit or roll back together.
    pub async fn update_sale(&self, id: i32, sale: &NewSale) -> Result<(), DbError> {
        sale.validate()?;

        let mut tx = self.pool.begin().await?;

        let old = sqlx::query_as::<_, (i32, i32)>(
            "SELECT product_id, quantity FROM sales WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((old_product_id, old_quantity)) = old else {
            return Err(DbError::NotFound);
        };

        sqlx::query("UPDATE products SET quantity = quantity + $1 WHERE id = $2")
            .bind(old_quantity)
            .bind(old_product_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE sales
            SET product_id = $1, customer_id = $2, quantity = $3,
                unit_price = $4, total = $5, sold_at = $6
            WHERE id = $7
            "#,
        )
        .bind(sale.product_id)
        .bind(sale.customer_id)
        .bind(sale.quantity)
        .bind(sale.unit_price)
        .bind(sale.total())
        .bind(sale.sold_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET quantity = quantity - $1 WHERE id = $2")
            .bind(sale.quantity)
            .bind(sale.product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(id, "sale updated");
        Ok(())
    }

    /// Deletes a sale and restores its quantity to the product, atomically.
    pub async fn delete_sale(&self, id: i32) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let old = sqlx::query_as::<_, (i32, i32)>(
            "SELECT product_id, quantity FROM sales WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((product_id, quantity)) = old else {
            return Err(DbError::NotFound);
        };

        sqlx::query("UPDATE products SET quantity = quantity + $1 WHERE id = $2")
            .bind(quantity)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(id, "sale deleted");
        Ok(())
    }
}
