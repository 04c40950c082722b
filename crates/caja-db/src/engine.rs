//! # Sale & Reversal Engine
//!
//! Orchestrates the two multi-record commits of the system: submitting a
//! sale and deleting a transaction. Each runs as ONE database transaction,
//! so no reader ever observes a ledger row without its stock effect or
//! vice versa.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  submit_sale(cart)                                                  │
//! │       │                                                             │
//! │       ├── cart empty?              → EmptyCart                      │
//! │       ▼                                                             │
//! │  price cart (wholesale discount)                                    │
//! │       ▼                                                             │
//! │  BEGIN ─┬─ INSERT transactions row                                  │
//! │         ├─ INSERT sale_lines rows (cart order)                      │
//! │         ├─ per line:                                                │
//! │         │    UPDATE products                                        │
//! │         │    SET stock = stock_at_selection - quantity              │
//! │         │    WHERE id = ? AND stock = stock_at_selection  ← CAS     │
//! │         │         │                                                 │
//! │         │         └── 0 rows? → ROLLBACK, Conflict                  │
//! │         ▼                                                           │
//! │  COMMIT → clear cart, notify Ledger + Inventory                     │
//! │                                                                     │
//! │  delete_transaction(id)                                             │
//! │       ▼                                                             │
//! │  BEGIN ─┬─ load row (+ lines)      → NotFound if absent             │
//! │         ├─ sale? per line:                                          │
//! │         │    UPDATE products SET stock = stock_at_selection         │
//! │         │         │   (absolute restore, no CAS - retryable)        │
//! │         │         └── 0 rows? → ROLLBACK before delete, Commit err  │
//! │         ├─ DELETE transactions row (lines cascade)                  │
//! │         ▼                                                           │
//! │  COMMIT → notify                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The compare-and-swap guard on the decrement turns the classic
//! lost-update race (two counters selling the same product from stale
//! snapshots) into a typed `Conflict`: the second commit fails whole, the
//! caller refreshes the inventory snapshot and rebuilds the cart.

use chrono::{Local, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::events::{ChangeEvent, ChangeNotifier};
use crate::repository::ledger::{SaleLineRow, TransactionRow};
use caja_core::validation::validate_uuid;
use caja_core::{
    Cart, CoreError, LedgerCategory, LedgerTransaction, SaleDetail, SaleLine, TransactionKind,
};

/// The sale transaction engine and its deletion-side twin.
#[derive(Debug, Clone)]
pub struct SaleEngine {
    pool: SqlitePool,
    notifier: ChangeNotifier,
}

impl SaleEngine {
    /// Creates a new SaleEngine.
    pub fn new(pool: SqlitePool, notifier: ChangeNotifier) -> Self {
        SaleEngine { pool, notifier }
    }

    /// Commits the cart as a sale: one ledger row, its sale lines, and
    /// every product's stock decrement, atomically.
    ///
    /// On success the cart is cleared and reset to defaults (today's
    /// date, cash). On any error NOTHING was persisted and the cart is
    /// left untouched for correction or retry.
    ///
    /// ## Errors
    /// - `Core(EmptyCart)` - the cart has no lines
    /// - `Conflict` - a product's stock changed since cart-build
    /// - `Commit` - the final commit failed
    pub async fn submit_sale(&self, cart: &mut Cart) -> DbResult<LedgerTransaction> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let pricing = cart.pricing();
        let lines: Vec<SaleLine> = cart.items.iter().map(SaleLine::from).collect();

        let transaction = LedgerTransaction {
            id: Uuid::new_v4().to_string(),
            date: cart.sale_date,
            kind: TransactionKind::Income,
            category: LedgerCategory::Ventas,
            description: cart.sale_description(),
            amount_cents: pricing.total.cents(),
            payment_method: Some(cart.payment_method),
            sale: Some(SaleDetail {
                items: lines.clone(),
                subtotal_cents: pricing.subtotal.cents(),
                discount_cents: pricing.discount.cents(),
            }),
            created_at: Utc::now(),
        };

        debug!(
            id = %transaction.id,
            lines = lines.len(),
            total = %pricing.total,
            wholesale = pricing.is_wholesale,
            "Submitting sale"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, date, kind, category, description, amount_cents,
                payment_method, subtotal_cents, discount_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&transaction.id)
        .bind(transaction.date)
        .bind(transaction.kind)
        .bind(transaction.category)
        .bind(&transaction.description)
        .bind(transaction.amount_cents)
        .bind(transaction.payment_method)
        .bind(pricing.subtotal.cents())
        .bind(pricing.discount.cents())
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, line) in lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    id, transaction_id, product_id, name, quantity,
                    unit_price_cents, line_subtotal_cents, stock_at_selection, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&transaction.id)
            .bind(&line.product_id)
            .bind(&line.name)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.line_subtotal_cents)
            .bind(line.stock_at_selection)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        let now = Utc::now();
        for line in &lines {
            let new_stock = line.stock_at_selection - line.quantity;

            // Conditional write: only lands if the stock is still exactly
            // what the cart snapshotted. A stale snapshot fails the whole
            // commit instead of silently clobbering a concurrent sale.
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = ?2, updated_at = ?3
                WHERE id = ?1 AND stock = ?4
                "#,
            )
            .bind(&line.product_id)
            .bind(new_stock)
            .bind(now)
            .bind(line.stock_at_selection)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::Conflict {
                    product_id: line.product_id.clone(),
                });
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::Commit(e.to_string()))?;

        info!(
            id = %transaction.id,
            total = %pricing.total,
            lines = lines.len(),
            "Sale committed"
        );

        cart.reset(Local::now().date_naive());
        self.notifier.notify(ChangeEvent::Ledger);
        self.notifier.notify(ChangeEvent::Inventory);

        Ok(transaction)
    }

    /// Deletes a ledger transaction. For sales, first restores every
    /// product's stock to its pre-sale snapshot, atomically with the
    /// delete.
    ///
    /// The restore is an absolute write of `stock_at_selection`: not a
    /// CAS and not an increment, so a failed deletion can always be
    /// retried. If the restore cannot be applied the ledger row is left
    /// intact.
    ///
    /// ## Errors
    /// - `Core(Validation)` - malformed ID
    /// - `NotFound` - no such transaction
    /// - `Commit` - stock restore or final commit failed; row intact
    pub async fn delete_transaction(&self, id: &str) -> DbResult<()> {
        validate_uuid(id)?;

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, date, kind, category, description, amount_cents,
                   payment_method, subtotal_cents, discount_cents, created_at
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Err(DbError::not_found("Transaction", id));
        };

        let line_rows = sqlx::query_as::<_, SaleLineRow>(
            r#"
            SELECT transaction_id, product_id, name, quantity,
                   unit_price_cents, line_subtotal_cents, stock_at_selection
            FROM sale_lines
            WHERE transaction_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let record = row.into_transaction(line_rows.into_iter().map(SaleLine::from).collect());
        let is_sale = record.is_sale();

        if is_sale {
            let items = record
                .sale
                .as_ref()
                .map(|detail| detail.items.as_slice())
                .unwrap_or(&[]);

            let now = Utc::now();
            for line in items {
                let result = sqlx::query(
                    r#"
                    UPDATE products
                    SET stock = ?2, updated_at = ?3
                    WHERE id = ?1
                    "#,
                )
                .bind(&line.product_id)
                .bind(line.stock_at_selection)
                .bind(now)
                .execute(&mut *tx)
                .await?;

                if result.rows_affected() == 0 {
                    // Abort before the delete: the ledger row stays intact
                    // and the caller may retry.
                    return Err(DbError::Commit(format!(
                        "stock restore failed: product {} is missing",
                        line.product_id
                    )));
                }
            }
        }

        sqlx::query("DELETE FROM transactions WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::Commit(e.to_string()))?;

        info!(id = %id, was_sale = is_sale, "Transaction deleted");

        self.notifier.notify(ChangeEvent::Ledger);
        if is_sale {
            self.notifier.notify(ChangeEvent::Inventory);
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
