//! # caja-db: Database Layer for Caja
//!
//! This crate provides storage for the Caja ledger and inventory.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Caja Data Flow                              │
//! │                                                                     │
//! │  UI event (register sale, delete movement, edit stock)              │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   caja-db (THIS CRATE)                      │   │
//! │  │                                                             │   │
//! │  │  ┌────────────┐  ┌──────────────┐  ┌─────────────────────┐  │   │
//! │  │  │  Database  │  │ Repositories │  │     SaleEngine      │  │   │
//! │  │  │ (pool.rs)  │  │ inventory /  │  │ atomic sale commit  │  │   │
//! │  │  │ SqlitePool │◄─│   ledger     │  │ + stock reversal    │  │   │
//! │  │  └────────────┘  └──────────────┘  └─────────────────────┘  │   │
//! │  │         │                                  │                │   │
//! │  │         │          ┌────────────┐          │                │   │
//! │  │         └─────────►│  events    │◄─────────┘                │   │
//! │  │                    │ broadcast  │  "store changed, re-read" │   │
//! │  │                    └────────────┘                           │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database (WAL mode, embedded migrations)                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (inventory, ledger)
//! - [`engine`] - Atomic sale submission and reversal-aware deletion
//! - [`events`] - Change notifications for UI refresh
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caja_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/caja.db")).await?;
//!
//! let products = db.inventory().list_all().await?;
//!
//! let mut cart = caja_core::Cart::today();
//! cart.add_item(&products[0], 2)?;
//! let sale = db.engine().submit_sale(&mut cart).await?;
//!
//! // later, an exact reversal:
//! db.engine().delete_transaction(&sale.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod events;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use engine::SaleEngine;
pub use error::{DbError, DbResult};
pub use events::{ChangeEvent, ChangeNotifier};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::inventory::InventoryRepository;
pub use repository::ledger::{LedgerRepository, ManualEntry};
