//! # Repository Module
//!
//! Database repository implementations for Caja.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  The Repository pattern abstracts database access behind a clean    │
//! │  API:                                                               │
//! │                                                                     │
//! │  Caller                                                             │
//! │     │  db.inventory().list_all()                                    │
//! │     ▼                                                               │
//! │  InventoryRepository ── SQL ──► SQLite                              │
//! │                                                                     │
//! │  Benefits:                                                          │
//! │  • SQL is isolated in one place                                     │
//! │  • Callers see domain types, not rows                               │
//! │  • Write paths announce themselves on the change channel            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`inventory::InventoryRepository`] - Product reads and stock writes
//! - [`ledger::LedgerRepository`] - Transaction reads and manual entries
//!
//! Sale submission and deletion span both stores at once; they live in
//! [`crate::engine`].

pub mod inventory;
pub mod ledger;
