//! # Seed Data Generator
//!
//! Populates a database with customers and products for development.
//!
//! ## Usage
//! ```bash
//! # 10 customers, 200 products (defaults) into STOREFRONT_DB_PATH
//! cargo run -p storefront-db --bin seed
//!
//! # Custom amounts and path
//! cargo run -p storefront-db --bin seed -- --customers 50 --products 1000 --db ./dev.db
//! ```
//!
//! Ids are deterministic (`cust-0001`, `prod-0001`, ...) so requests can be
//! written by hand against a seeded database.

use std::env;

use chrono::Utc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use storefront_core::{Customer, Product};
use storefront_db::{Database, DbConfig};

const PRODUCT_NAMES: &[&str] = &[
    "Espresso Beans",
    "Pour-Over Kettle",
    "Ceramic Mug",
    "Paper Filters",
    "Hand Grinder",
    "Milk Frother",
    "Travel Tumbler",
    "Cold Brew Jar",
    "Tasting Spoon",
    "Digital Scale",
];

const SIZES: &[(&str, i64)] = &[("Small", 0), ("Medium", 350), ("Large", 700)];

const FIRST_NAMES: &[&str] = &["Ada", "Grace", "Alan", "Barbara", "Edsger", "Frances", "Ken", "Radia"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut customers: usize = 10;
    let mut products: usize = 200;
    let mut config = DbConfig::from_env()?;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--customers" | "-c" => {
                if let Some(value) = args.get(i + 1) {
                    customers = value.parse()?;
                    i += 1;
                }
            }
            "--products" | "-p" => {
                if let Some(value) = args.get(i + 1) {
                    products = value.parse()?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if let Some(value) = args.get(i + 1) {
                    config.database_path = value.into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --customers <N>  Customers to create (default: 10)");
                println!("  -p, --products <N>   Products to create (default: 200)");
                println!("  -d, --db <PATH>      Database file (default: $STOREFRONT_DB_PATH or ./storefront.db)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let db = Database::new(config.run_migrations(true)).await?;

    let existing = db.products().count().await? + db.customers().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has data, skipping seed");
        return Ok(());
    }

    let start = std::time::Instant::now();

    let mut inserted_customers = 0;
    for index in 0..customers {
        let customer = generate_customer(index);
        match db.customers().insert(&customer).await {
            Ok(()) => inserted_customers += 1,
            Err(e) => error!(id = %customer.id, error = %e, "Failed to insert customer"),
        }
    }

    let mut inserted_products = 0;
    for index in 0..products {
        let product = generate_product(index);
        match db.products().insert(&product).await {
            Ok(()) => inserted_products += 1,
            Err(e) => error!(id = %product.id, error = %e, "Failed to insert product"),
        }
    }

    info!(
        customers = inserted_customers,
        products = inserted_products,
        elapsed = ?start.elapsed(),
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// `RUST_LOG` wins; otherwise info everywhere, debug for our crates.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn generate_customer(index: usize) -> Customer {
    let name = FIRST_NAMES[index % FIRST_NAMES.len()];
    Customer {
        id: format!("cust-{:04}", index + 1),
        name: name.to_string(),
        email: format!("{}.{}@example.com", name.to_lowercase(), index + 1),
        created_at: Utc::now(),
    }
}

/// Price: $2.99 - $12.98 plus a size addon. Stock: 0 - 50, so some
/// products are sold out from the start.
fn generate_product(index: usize) -> Product {
    let now = Utc::now();
    let base = PRODUCT_NAMES[index % PRODUCT_NAMES.len()];
    let (size, addon) = SIZES[(index / PRODUCT_NAMES.len()) % SIZES.len()];

    Product {
        id: format!("prod-{:04}", index + 1),
        name: format!("{} {}", base, size),
        price_cents: 299 + ((index * 37) % 1000) as i64 + addon,
        quantity: (index % 51) as i64,
        created_at: now,
        updated_at: now,
    }
}
