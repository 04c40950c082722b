//! # Inventory Repository
//!
//! Database operations for products.
//!
//! ## Stock Mutation Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 Who May Touch `products.stock`                      │
//! │                                                                     │
//! │  SaleEngine::submit_sale      stock := snapshot - quantity (CAS)    │
//! │  SaleEngine::delete (sale)    stock := snapshot  (restore)          │
//! │  InventoryRepository::set_stock   manual edit from the UI           │
//! │  InventoryRepository::commit_stock_changes   atomic batch           │
//! │                                                                     │
//! │  All paths keep stock >= 0; the schema CHECK backs them up.         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::events::{ChangeEvent, ChangeNotifier};
use caja_core::validation::{validate_new_product, validate_stock};
use caja_core::{NewProduct, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.inventory();
///
/// let products = repo.list_all().await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
    notifier: ChangeNotifier,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool, notifier: ChangeNotifier) -> Self {
        InventoryRepository { pool, notifier }
    }

    /// Lists every product, ordered by category then name (the order the
    /// inventory view displays them in).
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, category, name, price_cents, stock, created_at, updated_at
            FROM products
            ORDER BY category, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, category, name, price_cents, stock, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Validation
    /// Name required, price and stock non-negative. Category arrives
    /// already parsed against the closed enum, so free-form strings can't
    /// reach this point.
    pub async fn insert(&self, new_product: NewProduct) -> DbResult<Product> {
        validate_new_product(&new_product)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            category: new_product.category,
            name: new_product.name.trim().to_string(),
            price_cents: new_product.price_cents,
            stock: new_product.stock,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, category, name, price_cents, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(product.category)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        self.notifier.notify(ChangeEvent::Inventory);
        Ok(product)
    }

    /// Manually sets a product's stock (the inventory-modal edit).
    ///
    /// ## Errors
    /// * `Validation` - new stock is negative
    /// * `NotFound` - no such product
    pub async fn set_stock(&self, id: &str, new_stock: i64) -> DbResult<()> {
        validate_stock(new_stock)?;

        debug!(id = %id, new_stock = %new_stock, "Setting stock");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(new_stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.notifier.notify(ChangeEvent::Inventory);
        Ok(())
    }

    /// Atomically applies a batch of absolute stock values.
    ///
    /// All products are updated or none are: a missing product rolls the
    /// whole batch back with `NotFound`, a negative value rejects the
    /// batch up front.
    pub async fn commit_stock_changes(&self, changes: &[(String, i64)]) -> DbResult<()> {
        for (_, new_stock) in changes {
            validate_stock(*new_stock)?;
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for (product_id, new_stock) in changes {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = ?2, updated_at = ?3
                WHERE id = ?1
                "#,
            )
            .bind(product_id)
            .bind(new_stock)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Product", product_id));
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::Commit(e.to_string()))?;

        debug!(count = changes.len(), "Committed stock batch");
        self.notifier.notify(ChangeEvent::Inventory);
        Ok(())
    }

    /// Counts products (for diagnostics and the seed guard).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
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
    use crate::pool::{Database, DbConfig};
    use caja_core::ProductCategory;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn cera() -> NewProduct {
        NewProduct {
            category: ProductCategory::Capilar,
            name: "Cera Inmortal".to_string(),
            price_cents: 42_000,
            stock: 12,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.inventory();

        let product = repo.insert(cera()).await.unwrap();
        assert_eq!(product.name, "Cera Inmortal");
        assert_eq!(product.stock, 12);

        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, product.id);
        assert_eq!(fetched.category, ProductCategory::Capilar);
        assert_eq!(fetched.price_cents, 42_000);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_input() {
        let db = test_db().await;
        let repo = db.inventory();

        let mut bad = cera();
        bad.name = "  ".to_string();
        assert!(repo.insert(bad).await.is_err());

        let mut bad = cera();
        bad.price_cents = -1;
        assert!(repo.insert(bad).await.is_err());

        let mut bad = cera();
        bad.stock = -5;
        assert!(repo.insert(bad).await.is_err());

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_all_orders_by_category_then_name() {
        let db = test_db().await;
        let repo = db.inventory();

        let mut talco = cera();
        talco.category = ProductCategory::Insumos;
        talco.name = "Talco Barbero".to_string();
        repo.insert(talco).await.unwrap();

        let mut aceite = cera();
        aceite.category = ProductCategory::Barba;
        aceite.name = "Aceite de Barba".to_string();
        repo.insert(aceite).await.unwrap();

        repo.insert(cera()).await.unwrap();

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Aceite de Barba", "Cera Inmortal", "Talco Barbero"]);
    }

    #[tokio::test]
    async fn test_set_stock() {
        let db = test_db().await;
        let repo = db.inventory();
        let product = repo.insert(cera()).await.unwrap();

        repo.set_stock(&product.id, 30).await.unwrap();
        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock, 30);

        assert!(repo.set_stock(&product.id, -1).await.is_err());
        let err = repo.set_stock("missing-id", 5).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_commit_stock_changes_is_atomic() {
        let db = test_db().await;
        let repo = db.inventory();
        let a = repo.insert(cera()).await.unwrap();

        let mut other = cera();
        other.name = "Pomada Mate".to_string();
        let b = repo.insert(other).await.unwrap();

        repo.commit_stock_changes(&[(a.id.clone(), 5), (b.id.clone(), 6)])
            .await
            .unwrap();
        assert_eq!(repo.get_by_id(&a.id).await.unwrap().unwrap().stock, 5);
        assert_eq!(repo.get_by_id(&b.id).await.unwrap().unwrap().stock, 6);

        // one bad id rolls the whole batch back
        let err = repo
            .commit_stock_changes(&[(a.id.clone(), 9), ("missing".to_string(), 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(repo.get_by_id(&a.id).await.unwrap().unwrap().stock, 5);
    }
}
