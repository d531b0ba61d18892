//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Menu
pub mod menu_item;

// Orders / Sessions
pub mod order;
pub mod session;

// Location
pub mod table;

// Reservations
pub mod reservation;

// Payments
pub mod gateway_order;
pub mod payment;
pub mod payment_request;

// Deliveries
pub mod delivery;

// Admin / System
pub mod admin;
pub mod counter;

// Re-exports
pub use admin::AdminRepository;
pub use counter::CounterRepository;
pub use delivery::DeliveryRepository;
pub use gateway_order::GatewayOrderRepository;
pub use menu_item::MenuItemRepository;
pub use order::{OrderFilter, OrderRepository};
pub use payment::PaymentRepository;
pub use payment_request::PaymentRequestRepository;
pub use reservation::ReservationRepository;
pub use session::SessionRepository;
pub use table::TableRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for shared::error::AppError {
    fn from(err: RepoError) -> Self {
        use shared::error::{AppError, ErrorCode};
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
