//! # Seed Data Generator
//!
//! Populates the database with products, and optionally sales spread over
//! the last two months so the summaries and chart have something to show.
//!
//! ## Usage
//! ```bash
//! # 200 products (default), no sales
//! cargo run -p till-db --bin seed
//!
//! # Custom amounts
//! cargo run -p till-db --bin seed -- --count 500 --sales 120
//!
//! # Specify database path
//! cargo run -p till-db --bin seed -- --db ./data/till.db
//! ```
//!
//! Each product has:
//! - Unique SKU: `{CATEGORY}-{NAME}-{INDEX}`
//! - Price: $1.99 - $9.99 plus a size add-on
//! - Stock: 20 - 120

use chrono::{Duration, Utc};
use std::env;
use till_core::{NewSale, NewSaleLine, Product};
use till_db::repository::product::new_product;
use till_db::{Database, DbConfig};

/// Product categories for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "BEV",
        &[
            "Coca-Cola",
            "Sprite",
            "Orange Juice",
            "Iced Tea",
            "Sparkling Water",
            "Coffee",
        ],
    ),
    (
        "SNK",
        &[
            "Potato Chips",
            "Pretzels",
            "Chocolate Bar",
            "Gummy Bears",
            "Oat Cookies",
            "Trail Mix",
        ],
    ),
    (
        "DRY",
        &[
            "Whole Milk",
            "Cheddar Cheese",
            "Greek Yogurt",
            "Butter",
            "Eggs Dozen",
            "Cream Cheese",
        ],
    ),
    (
        "GRO",
        &[
            "White Bread",
            "Pasta Penne",
            "Rice Brown",
            "Canned Beans",
            "Peanut Butter",
            "Honey",
        ],
    ),
];

/// Size variants for products, with their price add-on in cents
const SIZES: &[(&str, i64)] = &[
    ("Small", 0),
    ("Medium", 100),
    ("Large", 200),
    ("6-Pack", 300),
    ("12-Pack", 500),
];

/// Tax rates in basis points, applied to seeded sales
const TAX_RATES: &[i64] = &[0, 500, 825, 1000];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut sales: usize = 0;
    let mut db_path = String::from("./data/till.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Till POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -s, --sales <N>    Number of sales to record (default: 0)");
                println!("  -d, --db <PATH>    Database file path (default: ./data/till.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Till POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!("Sales:    {}", sales);
    println!();

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut products: Vec<Product> = Vec::with_capacity(count);

    'outer: for (category_idx, (category_code, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (size_idx, (size_name, price_addon)) in SIZES.iter().enumerate() {
                if products.len() >= count {
                    break 'outer;
                }

                let seed = category_idx * 1000 + name_idx * 20 + size_idx;
                let product = generate_product(category_code, name, size_name, *price_addon, seed);

                match db.products().insert(&product).await {
                    Ok(product) => products.push(product),
                    Err(e) => eprintln!("Failed to insert {}: {}", product.sku, e),
                }
            }
        }
    }

    println!(
        "✓ Generated {} products in {:?}",
        products.len(),
        start.elapsed()
    );

    if sales > 0 && !products.is_empty() {
        println!();
        println!("Recording sales...");

        let mut recorded = 0;
        for n in 0..sales {
            let sale = generate_sale(&products, n);
            match db.sales().create_sale(&sale).await {
                Ok(_) => recorded += 1,
                Err(e) => eprintln!("Failed to record {}: {}", sale.invoice_number, e),
            }
        }

        println!("✓ Recorded {} sales", recorded);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic data.
fn generate_product(category: &str, name: &str, size: &str, price_addon: i64, seed: usize) -> Product {
    let code: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    let sku = format!("{}-{}-{:04}", category, code, seed);

    // Base $1.99 - $9.99 + size addon
    let price_cents = 199 + ((seed * 17) % 800) as i64 + price_addon;
    let stock = 20 + (seed % 101) as i64;

    new_product(&sku, &format!("{} {}", name, size), price_cents, stock)
}

/// Generates a one-to-three line sale dated within the last 60 days.
fn generate_sale(products: &[Product], n: usize) -> NewSale {
    let lines: Vec<NewSaleLine> = (0..1 + n % 3)
        .map(|k| {
            let product = &products[(n * 7 + k * 13) % products.len()];
            NewSaleLine {
                product: product.id.clone(),
                quantity: 1 + ((n + k) % 2) as i64,
                price_cents: product.price_cents,
            }
        })
        .collect();

    let subtotal_cents: i64 = lines.iter().map(|l| l.line_total().cents()).sum();
    let discount_amount_cents = if n % 5 == 0 { subtotal_cents / 10 } else { 0 };
    let tax_amount_cents =
        (subtotal_cents - discount_amount_cents) * TAX_RATES[n % TAX_RATES.len()] / 10_000;

    NewSale {
        customer_name: format!("Customer {}", n + 1),
        customer_email: None,
        customer_phone: None,
        invoice_number: format!("INV-{:05}", n + 1),
        date: Utc::now() - Duration::hours(((n * 37) % (60 * 24)) as i64),
        notes: None,
        products: lines,
        subtotal_cents,
        discount_amount_cents,
        tax_amount_cents,
        total_cents: subtotal_cents - discount_amount_cents + tax_amount_cents,
    }
}
