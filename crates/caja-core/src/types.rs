//! # Domain Types
//!
//! Core domain types used throughout Caja.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌───────────────────┐   ┌────────────────┐  │
//! │  │    Product      │   │ LedgerTransaction │   │   SaleDetail   │  │
//! │  │  ─────────────  │   │  ───────────────  │   │  ────────────  │  │
//! │  │  id (UUID)      │   │  id (UUID)        │   │  items         │  │
//! │  │  category       │   │  date, kind       │   │  subtotal      │  │
//! │  │  price_cents    │   │  category         │   │  discount      │  │
//! │  │  stock          │   │  amount_cents     │   └────────────────┘  │
//! │  └─────────────────┘   └───────────────────┘                       │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │ ProductCategory │   │ TransactionKind │   │  PaymentMethod  │   │
//! │  │  Capilar        │   │  Income         │   │  Efectivo       │   │
//! │  │  Barba ...      │   │  Expense        │   │  Nequi ...      │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Closed Enumerations
//! Category, kind and payment-method values are closed enums parsed at the
//! boundary. Free-form strings never reach storage; anything outside the
//! known set is rejected as `ValidationError::UnknownCategory`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product Category
// =============================================================================

/// Product categories carried by the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Capilar,
    Barba,
    Facial,
    Maquinas,
    Insumos,
}

impl ProductCategory {
    /// All categories, in display order.
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Capilar,
        ProductCategory::Barba,
        ProductCategory::Facial,
        ProductCategory::Maquinas,
        ProductCategory::Insumos,
    ];

    /// Stable identifier used for storage and the UI boundary.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Capilar => "capilar",
            ProductCategory::Barba => "barba",
            ProductCategory::Facial => "facial",
            ProductCategory::Maquinas => "maquinas",
            ProductCategory::Insumos => "insumos",
        }
    }
}

impl FromStr for ProductCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "capilar" => Ok(ProductCategory::Capilar),
            "barba" => Ok(ProductCategory::Barba),
            "facial" => Ok(ProductCategory::Facial),
            "maquinas" => Ok(ProductCategory::Maquinas),
            "insumos" => Ok(ProductCategory::Insumos),
            other => Err(ValidationError::UnknownCategory {
                field: "product category".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Stock Level
// =============================================================================

/// Coarse stock level used by inventory displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// 5 units or fewer.
    Critico,
    /// 10 units or fewer.
    Bajo,
    Normal,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Owned by the inventory store; stock is mutated only through the sale /
/// reversal engines or an explicit manual stock edit. Products are never
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub category: ProductCategory,

    /// Display name shown in the cart and on ledger lines.
    pub name: String,

    /// Sale price in minor units.
    pub price_cents: i64,

    /// Current stock level. Never negative at any observable time.
    pub stock: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Coarse stock level for display.
    pub fn stock_level(&self) -> StockLevel {
        if self.stock <= 5 {
            StockLevel::Critico
        } else if self.stock <= 10 {
            StockLevel::Bajo
        } else {
            StockLevel::Normal
        }
    }
}

/// Input for creating a product.
///
/// Category arrives pre-parsed; string input is parsed (and rejected) at
/// the boundary via `ProductCategory::from_str`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub category: ProductCategory,
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
}

// =============================================================================
// Transaction Kind
// =============================================================================

/// Direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(ValidationError::UnknownCategory {
                field: "transaction kind".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Efectivo,
    /// Debit/credit card on external terminal.
    Tarjeta,
    /// PSE bank transfer.
    Pse,
    Nequi,
    Daviplata,
    Otro,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Efectivo => "efectivo",
            PaymentMethod::Tarjeta => "tarjeta",
            PaymentMethod::Pse => "pse",
            PaymentMethod::Nequi => "nequi",
            PaymentMethod::Daviplata => "daviplata",
            PaymentMethod::Otro => "otro",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Efectivo
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "efectivo" => Ok(PaymentMethod::Efectivo),
            "tarjeta" => Ok(PaymentMethod::Tarjeta),
            "pse" => Ok(PaymentMethod::Pse),
            "nequi" => Ok(PaymentMethod::Nequi),
            "daviplata" => Ok(PaymentMethod::Daviplata),
            "otro" => Ok(PaymentMethod::Otro),
            other => Err(ValidationError::UnknownCategory {
                field: "payment method".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Ledger Category
// =============================================================================

/// Closed set of ledger categories. Each category belongs to exactly one
/// transaction kind; `Ventas` rows are created by the sale engine only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum LedgerCategory {
    // income
    Ventas,
    ServiciosBarberia,
    OtrosIngresos,
    // expense
    Arriendo,
    Servicios,
    Nomina,
    Proveedores,
    Marketing,
    Impuestos,
    OtrosGastos,
}

impl LedgerCategory {
    /// Stable identifier used for storage and the UI boundary.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LedgerCategory::Ventas => "ventas",
            LedgerCategory::ServiciosBarberia => "servicios_barberia",
            LedgerCategory::OtrosIngresos => "otros_ingresos",
            LedgerCategory::Arriendo => "arriendo",
            LedgerCategory::Servicios => "servicios",
            LedgerCategory::Nomina => "nomina",
            LedgerCategory::Proveedores => "proveedores",
            LedgerCategory::Marketing => "marketing",
            LedgerCategory::Impuestos => "impuestos",
            LedgerCategory::OtrosGastos => "otros_gastos",
        }
    }

    /// Human-readable label for receipts and history tables.
    pub const fn label(&self) -> &'static str {
        match self {
            LedgerCategory::Ventas => "Ventas",
            LedgerCategory::ServiciosBarberia => "Servicios Barbería",
            LedgerCategory::OtrosIngresos => "Otros Ingresos",
            LedgerCategory::Arriendo => "Arriendo",
            LedgerCategory::Servicios => "Servicios",
            LedgerCategory::Nomina => "Nómina",
            LedgerCategory::Proveedores => "Proveedores",
            LedgerCategory::Marketing => "Marketing",
            LedgerCategory::Impuestos => "Impuestos",
            LedgerCategory::OtrosGastos => "Otros Gastos",
        }
    }

    /// The transaction kind this category belongs to.
    pub const fn kind(&self) -> TransactionKind {
        match self {
            LedgerCategory::Ventas
            | LedgerCategory::ServiciosBarberia
            | LedgerCategory::OtrosIngresos => TransactionKind::Income,
            LedgerCategory::Arriendo
            | LedgerCategory::Servicios
            | LedgerCategory::Nomina
            | LedgerCategory::Proveedores
            | LedgerCategory::Marketing
            | LedgerCategory::Impuestos
            | LedgerCategory::OtrosGastos => TransactionKind::Expense,
        }
    }
}

impl FromStr for LedgerCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ventas" => Ok(LedgerCategory::Ventas),
            "servicios_barberia" => Ok(LedgerCategory::ServiciosBarberia),
            "otros_ingresos" => Ok(LedgerCategory::OtrosIngresos),
            "arriendo" => Ok(LedgerCategory::Arriendo),
            "servicios" => Ok(LedgerCategory::Servicios),
            "nomina" => Ok(LedgerCategory::Nomina),
            "proveedores" => Ok(LedgerCategory::Proveedores),
            "marketing" => Ok(LedgerCategory::Marketing),
            "impuestos" => Ok(LedgerCategory::Impuestos),
            "otros_gastos" => Ok(LedgerCategory::OtrosGastos),
            other => Err(ValidationError::UnknownCategory {
                field: "category".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for LedgerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A persisted line of a sale transaction.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    /// Product this line refers to.
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in minor units at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Line subtotal (unit_price × quantity), computed when the line
    /// entered the cart.
    pub line_subtotal_cents: i64,
    /// The product's stock when the line entered the cart. Authoritative
    /// pre-sale value: reversal writes it back verbatim.
    pub stock_at_selection: i64,
}

impl SaleLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_subtotal(&self) -> Money {
        Money::from_cents(self.line_subtotal_cents)
    }
}

// =============================================================================
// Sale Detail
// =============================================================================

/// Sale-specific payload carried by a `Ventas` ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDetail {
    /// Ordered sale lines, in the order they entered the cart.
    pub items: Vec<SaleLine>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
}

// =============================================================================
// Ledger Transaction
// =============================================================================

/// A ledger record: a sale, an expense, or a manual income entry.
///
/// Immutable once created; destroyed only by explicit deletion (which
/// triggers stock reversal for sales).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Calendar day the movement belongs to. Serialized as `YYYY-MM-DD`;
    /// comparisons are literal year/month/day decomposition, never
    /// timezone arithmetic.
    pub date: NaiveDate,

    pub kind: TransactionKind,
    pub category: LedgerCategory,
    pub description: String,

    /// Movement amount in minor units. For sales this is
    /// `subtotal - discount`.
    pub amount_cents: i64,

    /// How the customer paid. Present on sales, optional elsewhere.
    pub payment_method: Option<PaymentMethod>,

    /// Sale payload; `Some` exactly for engine-created sales.
    pub sale: Option<SaleDetail>,

    pub created_at: DateTime<Utc>,
}

impl LedgerTransaction {
    /// Returns the amount as a Money type.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Whether this record is a sale whose deletion must restore stock.
    pub fn is_sale(&self) -> bool {
        self.category == LedgerCategory::Ventas
            && self.sale.as_ref().is_some_and(|s| !s.items.is_empty())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_category_round_trip() {
        for cat in ProductCategory::ALL {
            assert_eq!(cat.as_str().parse::<ProductCategory>().unwrap(), cat);
        }
    }

    #[test]
    fn test_unknown_product_category_rejected() {
        let err = "juguetes".parse::<ProductCategory>().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCategory { .. }));
    }

    #[test]
    fn test_ledger_category_kinds() {
        assert_eq!(LedgerCategory::Ventas.kind(), TransactionKind::Income);
        assert_eq!(LedgerCategory::OtrosIngresos.kind(), TransactionKind::Income);
        assert_eq!(LedgerCategory::Arriendo.kind(), TransactionKind::Expense);
        assert_eq!(LedgerCategory::Nomina.kind(), TransactionKind::Expense);
    }

    #[test]
    fn test_payment_method_default() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Efectivo);
    }

    #[test]
    fn test_stock_level_thresholds() {
        let mut product = Product {
            id: "p1".to_string(),
            category: ProductCategory::Capilar,
            name: "Cera".to_string(),
            price_cents: 20_000,
            stock: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(product.stock_level(), StockLevel::Critico);
        product.stock = 8;
        assert_eq!(product.stock_level(), StockLevel::Bajo);
        product.stock = 11;
        assert_eq!(product.stock_level(), StockLevel::Normal);
    }

    #[test]
    fn test_boundary_json_shape() {
        // Amounts cross the boundary as plain numbers, dates as
        // YYYY-MM-DD strings, enum values as their stable identifiers.
        let tx = LedgerTransaction {
            id: "t1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            kind: TransactionKind::Expense,
            category: LedgerCategory::OtrosGastos,
            description: "Papelería".to_string(),
            amount_cents: 20_000,
            payment_method: Some(PaymentMethod::Tarjeta),
            sale: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["date"], "2024-02-01");
        assert_eq!(json["kind"], "expense");
        assert_eq!(json["category"], "otros_gastos");
        assert_eq!(json["payment_method"], "tarjeta");
        assert_eq!(json["amount_cents"], 20_000);
    }

    #[test]
    fn test_is_sale_requires_items() {
        let tx = LedgerTransaction {
            id: "t1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            kind: TransactionKind::Income,
            category: LedgerCategory::Ventas,
            description: "Venta".to_string(),
            amount_cents: 1000,
            payment_method: Some(PaymentMethod::Efectivo),
            sale: Some(SaleDetail {
                items: vec![],
                subtotal_cents: 1000,
                discount_cents: 0,
            }),
            created_at: Utc::now(),
        };
        assert!(!tx.is_sale());
    }
}
