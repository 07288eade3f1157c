use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] core_types::CoreError),

    #[error("The requested data was not found in the database.")]
    NotFound,

    #[error("Product {0} still has sales referencing it and cannot be deleted.")]
    ProductInUse(i32),
}
