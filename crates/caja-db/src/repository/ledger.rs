//! # Ledger Repository
//!
//! Database operations for ledger transactions (sales, expenses, manual
//! income) and their sale lines.
//!
//! ## Table Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  transactions                 sale_lines                            │
//! │  ────────────                 ──────────                            │
//! │  id ◄─────────────────────────transaction_id (CASCADE)             │
//! │  date, kind, category         product_id, name                      │
//! │  description, amount          quantity, unit_price                  │
//! │  subtotal*, discount*         line_subtotal                         │
//! │  payment_method               stock_at_selection, position          │
//! │                                                                     │
//! │  * NULL for manual entries; present exactly for sales               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sale rows are written only by the engine (inside its atomic commit);
//! this repository appends manual expense/income entries and reads.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::events::{ChangeEvent, ChangeNotifier};
use caja_core::validation::{validate_amount_cents, validate_description, validate_entry_category};
use caja_core::{
    LedgerCategory, LedgerTransaction, PaymentMethod, SaleDetail, SaleLine, TransactionKind,
    ValidationError,
};

// =============================================================================
// Row Types
// =============================================================================

/// Flat `transactions` row; assembled into `LedgerTransaction` together
/// with its sale lines.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TransactionRow {
    id: String,
    date: NaiveDate,
    kind: TransactionKind,
    category: LedgerCategory,
    description: String,
    amount_cents: i64,
    payment_method: Option<PaymentMethod>,
    subtotal_cents: Option<i64>,
    discount_cents: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    pub(crate) fn into_transaction(self, items: Vec<SaleLine>) -> LedgerTransaction {
        let sale = self.subtotal_cents.map(|subtotal_cents| SaleDetail {
            items,
            subtotal_cents,
            discount_cents: self.discount_cents.unwrap_or(0),
        });

        LedgerTransaction {
            id: self.id,
            date: self.date,
            kind: self.kind,
            category: self.category,
            description: self.description,
            amount_cents: self.amount_cents,
            payment_method: self.payment_method,
            sale,
            created_at: self.created_at,
        }
    }
}

/// Flat `sale_lines` row.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SaleLineRow {
    transaction_id: String,
    product_id: String,
    name: String,
    quantity: i64,
    unit_price_cents: i64,
    line_subtotal_cents: i64,
    stock_at_selection: i64,
}

impl From<SaleLineRow> for SaleLine {
    fn from(row: SaleLineRow) -> Self {
        SaleLine {
            product_id: row.product_id,
            name: row.name,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
            line_subtotal_cents: row.line_subtotal_cents,
            stock_at_selection: row.stock_at_selection,
        }
    }
}

// =============================================================================
// Manual Entry
// =============================================================================

/// Input for a manual expense / income entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualEntry {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: LedgerCategory,
    pub description: String,
    pub amount_cents: i64,
    pub payment_method: Option<PaymentMethod>,
}

// =============================================================================
// Ledger Repository
// =============================================================================

/// Repository for ledger database operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
    notifier: ChangeNotifier,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool, notifier: ChangeNotifier) -> Self {
        LedgerRepository { pool, notifier }
    }

    /// Lists every transaction with its sale lines, in append order.
    ///
    /// Display ordering and filtering live in `caja_core::period`; this
    /// is the raw snapshot they consume.
    pub async fn list_all(&self) -> DbResult<Vec<LedgerTransaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, date, kind, category, description, amount_cents,
                   payment_method, subtotal_cents, discount_cents, created_at
            FROM transactions
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let line_rows = sqlx::query_as::<_, SaleLineRow>(
            r#"
            SELECT transaction_id, product_id, name, quantity,
                   unit_price_cents, line_subtotal_cents, stock_at_selection
            FROM sale_lines
            ORDER BY transaction_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut lines_by_tx: HashMap<String, Vec<SaleLine>> = HashMap::new();
        for row in line_rows {
            lines_by_tx
                .entry(row.transaction_id.clone())
                .or_default()
                .push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = lines_by_tx.remove(&row.id).unwrap_or_default();
                row.into_transaction(items)
            })
            .collect())
    }

    /// Gets a transaction by ID, with its sale lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<LedgerTransaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, date, kind, category, description, amount_cents,
                   payment_method, subtotal_cents, discount_cents, created_at
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
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
        .fetch_all(&self.pool)
        .await?;

        let items = line_rows.into_iter().map(SaleLine::from).collect();
        Ok(Some(row.into_transaction(items)))
    }

    /// Appends a manual expense / income entry.
    ///
    /// ## Validation
    /// - description required, amount positive
    /// - category must belong to the entry's kind
    /// - `Ventas` is reserved for engine-created sale records
    pub async fn append_manual(&self, entry: ManualEntry) -> DbResult<LedgerTransaction> {
        validate_description(&entry.description)?;
        validate_amount_cents(entry.amount_cents)?;
        validate_entry_category(entry.kind, entry.category)?;
        if entry.category == LedgerCategory::Ventas {
            return Err(ValidationError::ReservedCategory {
                category: entry.category.as_str().to_string(),
            }
            .into());
        }

        let transaction = LedgerTransaction {
            id: Uuid::new_v4().to_string(),
            date: entry.date,
            kind: entry.kind,
            category: entry.category,
            description: entry.description.trim().to_string(),
            amount_cents: entry.amount_cents,
            payment_method: entry.payment_method,
            sale: None,
            created_at: Utc::now(),
        };

        debug!(
            id = %transaction.id,
            kind = %transaction.kind,
            amount = %transaction.amount_cents,
            "Appending manual entry"
        );

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, date, kind, category, description, amount_cents,
                payment_method, subtotal_cents, discount_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, NULL, ?8)
            "#,
        )
        .bind(&transaction.id)
        .bind(transaction.date)
        .bind(transaction.kind)
        .bind(transaction.category)
        .bind(&transaction.description)
        .bind(transaction.amount_cents)
        .bind(transaction.payment_method)
        .bind(transaction.created_at)
        .execute(&self.pool)
        .await?;

        self.notifier.notify(ChangeEvent::Ledger);
        Ok(transaction)
    }

    /// Counts transactions (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use caja_core::{Cart, CoreError, NewProduct, ProductCategory};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn arriendo() -> ManualEntry {
        ManualEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            kind: TransactionKind::Expense,
            category: LedgerCategory::Arriendo,
            description: "Arriendo local enero".to_string(),
            amount_cents: 800_000,
            payment_method: None,
        }
    }

    #[tokio::test]
    async fn test_append_manual_and_read_back() {
        let db = test_db().await;
        let repo = db.ledger();

        let recorded = repo.append_manual(arriendo()).await.unwrap();
        assert!(recorded.sale.is_none());

        let fetched = repo.get_by_id(&recorded.id).await.unwrap().unwrap();
        assert_eq!(fetched.kind, TransactionKind::Expense);
        assert_eq!(fetched.category, LedgerCategory::Arriendo);
        assert_eq!(fetched.amount_cents, 800_000);
        assert_eq!(fetched.date.to_string(), "2024-01-05");
        assert!(fetched.sale.is_none());
        assert!(!fetched.is_sale());
    }

    #[tokio::test]
    async fn test_append_manual_requires_all_fields() {
        let db = test_db().await;
        let repo = db.ledger();

        let mut entry = arriendo();
        entry.description = "   ".to_string();
        assert!(repo.append_manual(entry).await.is_err());

        let mut entry = arriendo();
        entry.amount_cents = 0;
        assert!(repo.append_manual(entry).await.is_err());

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_append_manual_checks_category_kind() {
        let db = test_db().await;
        let repo = db.ledger();

        // expense category on an income entry
        let mut entry = arriendo();
        entry.kind = TransactionKind::Income;
        let err = repo.append_manual(entry).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::Validation(
                ValidationError::CategoryKindMismatch { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_append_manual_rejects_ventas() {
        let db = test_db().await;
        let repo = db.ledger();

        let mut entry = arriendo();
        entry.kind = TransactionKind::Income;
        entry.category = LedgerCategory::Ventas;
        let err = repo.append_manual(entry).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::Validation(
                ValidationError::ReservedCategory { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_list_all_assembles_sale_lines_in_order() {
        let db = test_db().await;

        let cera = db
            .inventory()
            .insert(NewProduct {
                category: ProductCategory::Capilar,
                name: "Cera".to_string(),
                price_cents: 20_000,
                stock: 10,
            })
            .await
            .unwrap();
        let aceite = db
            .inventory()
            .insert(NewProduct {
                category: ProductCategory::Barba,
                name: "Aceite".to_string(),
                price_cents: 35_000,
                stock: 8,
            })
            .await
            .unwrap();

        let mut cart = Cart::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        cart.add_item(&cera, 2).unwrap();
        cart.add_item(&aceite, 1).unwrap();
        db.engine().submit_sale(&mut cart).await.unwrap();

        db.ledger().append_manual(arriendo()).await.unwrap();

        let all = db.ledger().list_all().await.unwrap();
        assert_eq!(all.len(), 2);

        let sale = all.iter().find(|t| t.is_sale()).unwrap();
        let detail = sale.sale.as_ref().unwrap();
        // cart order is preserved
        assert_eq!(detail.items[0].name, "Cera");
        assert_eq!(detail.items[1].name, "Aceite");
        assert_eq!(detail.subtotal_cents, 2 * 20_000 + 35_000);
    }
}
