//! # Seed Data Generator
//!
//! Populates the item catalog (and optionally a few demo sales) so the
//! dashboard has something to show during development.
//!
//! ## Usage
//! ```bash
//! # Catalog only
//! cargo run -p tally-db --bin seed
//!
//! # Catalog plus demo sales
//! cargo run -p tally-db --bin seed -- --sales 20
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db
//! ```

use chrono::{Duration, NaiveDate, Utc};
use std::env;
use tally_core::{Quantity, SaleLine};
use tally_db::{Database, DbConfig, DbResult};

/// Demo catalog.
const ITEMS: &[&str] = &[
    "Widget",
    "Gadget",
    "Sprocket",
    "Gizmo",
    "Doohickey",
    "Thingamajig",
    "Whatsit",
    "Contraption",
];

const BUYERS: &[&str] = &["Ada", "Grace", "Linus", "Barbara", "Ken", "Margaret"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut sales: usize = 0;
    let mut db_path = String::from("./tally_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
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
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --sales <N>    Number of demo sales to record (default: 0)");
                println!("  -d, --db <PATH>    Database file path (default: ./tally_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Tally Seed Data Generator");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let before = db.stats().await?;
    if before.items > 0 {
        println!(
            "⚠ Database already has {} items and {} sales",
            before.items, before.sales
        );
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut item_ids = Vec::with_capacity(ITEMS.len());
    for name in ITEMS {
        match db.items().insert(name).await {
            Ok(item) => item_ids.push(item.id),
            Err(e) => eprintln!("Failed to insert {}: {}", name, e),
        }
    }
    println!("✓ Inserted {} items", item_ids.len());

    if sales > 0 && !item_ids.is_empty() {
        let today = Utc::now().date_naive();

        for n in 0..sales {
            let buyer = BUYERS[n % BUYERS.len()];
            let date = today - Duration::days((n % 30) as i64);
            let lines = demo_lines(&item_ids, n)?;

            record_sale(&db, buyer, date, &lines).await?;
        }
        println!("✓ Recorded {} demo sales", sales);
    }

    let after = db.stats().await?;
    println!();
    println!(
        "✓ Seed complete! {} items, {} sales, {} lines",
        after.items, after.sales, after.lines
    );
    db.close().await;

    Ok(())
}

/// Writes one sale. If its lines fail the header is removed again.
async fn record_sale(
    db: &Database,
    buyer: &str,
    date: NaiveDate,
    lines: &[SaleLine],
) -> DbResult<String> {
    let sale_id = db.sales().create_sale(buyer, date).await?;
    if let Err(e) = db.sales().insert_lines(&sale_id, lines).await {
        if let Err(cleanup) = db.sales().delete_sale(&sale_id).await {
            eprintln!("Failed to remove sale {}: {}", sale_id, cleanup);
        }
        return Err(e);
    }
    Ok(sale_id)
}

/// One to three lines with quantities 1-9, varied by `seed`.
fn demo_lines(item_ids: &[String], seed: usize) -> Result<Vec<SaleLine>, Box<dyn std::error::Error>> {
    let count = 1 + seed % 3;
    (0..count)
        .map(|k| {
            let item_id = &item_ids[(seed * 7 + k * 3) % item_ids.len()];
            let quantity = Quantity::new(1 + ((seed + k * 5) % 9) as u32)?;
            Ok(SaleLine::new(item_id, quantity))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_lines_leave_no_header() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let widget = db.items().insert("Widget").await.unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();

        let lines = [
            SaleLine::new(&widget.id, Quantity::ONE),
            SaleLine::new("ghost", Quantity::ONE),
        ];
        assert!(record_sale(&db, "Ada", date, &lines).await.is_err());
        assert_eq!(db.stats().await.unwrap().sales, 0);

        record_sale(&db, "Ada", date, &lines[..1]).await.unwrap();
        let stats = db.stats().await.unwrap();
        assert_eq!((stats.sales, stats.lines), (1, 1));
    }
}
