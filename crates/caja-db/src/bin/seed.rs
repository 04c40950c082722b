//! # Seed Data Generator
//!
//! Populates the database with a starter inventory for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p caja-db --bin seed
//!
//! # Specify database path
//! cargo run -p caja-db --bin seed -- --db ./data/caja.db
//! ```
//!
//! The catalog is a fixed list of shop products across all five
//! categories, with a spread of prices (a few above the wholesale
//! threshold) and stock levels (a few in the critical band).

use std::env;

use caja_core::{NewProduct, ProductCategory};
use caja_db::{Database, DbConfig};
use tracing::info;

/// (category, name, price in minor units, initial stock)
const CATALOG: &[(ProductCategory, &str, i64, i64)] = &[
    (ProductCategory::Capilar, "Cera Inmortal", 42_000, 12),
    (ProductCategory::Capilar, "Pomada Mate", 38_000, 9),
    (ProductCategory::Capilar, "Shampoo Anticaspa", 28_000, 15),
    (ProductCategory::Capilar, "Gel Fijación Extrema", 18_000, 24),
    (ProductCategory::Capilar, "Tratamiento Keratina", 55_000, 6),
    (ProductCategory::Barba, "Aceite de Barba Clásico", 35_000, 14),
    (ProductCategory::Barba, "Bálsamo de Barba", 32_000, 11),
    (ProductCategory::Barba, "Shampoo para Barba", 26_000, 8),
    (ProductCategory::Barba, "Kit Barbero Premium", 250_000, 3),
    (ProductCategory::Facial, "Crema Facial Hidratante", 30_000, 10),
    (ProductCategory::Facial, "Exfoliante Facial", 27_000, 7),
    (ProductCategory::Facial, "After Shave", 24_000, 16),
    (ProductCategory::Maquinas, "Máquina Patillera Pro", 280_000, 4),
    (ProductCategory::Maquinas, "Máquina Corte Inalámbrica", 320_000, 2),
    (ProductCategory::Maquinas, "Repuesto Cuchillas", 45_000, 20),
    (ProductCategory::Insumos, "Capas Desechables x50", 22_000, 30),
    (ProductCategory::Insumos, "Cuellos de Papel x100", 15_000, 25),
    (ProductCategory::Insumos, "Talco Barbero", 12_000, 18),
    (ProductCategory::Insumos, "Alcohol Antiséptico", 9_000, 22),
    (ProductCategory::Insumos, "Toallas Faciales x12", 19_000, 13),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./caja_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Caja Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./caja_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Caja Seed Data Generator");
    println!("========================");
    println!("Database: {}", db_path);
    println!("Products: {}", CATALOG.len());
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Don't double-seed
    let existing = db.inventory().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Inserting catalog...");

    let inventory = db.inventory();
    for (category, name, price_cents, stock) in CATALOG {
        let product = inventory
            .insert(NewProduct {
                category: *category,
                name: (*name).to_string(),
                price_cents: *price_cents,
                stock: *stock,
            })
            .await?;
        info!(id = %product.id, name = %product.name, "Seeded product");
    }

    let total = inventory.count().await?;
    println!();
    println!("✓ Seed complete: {} products", total);

    Ok(())
}
