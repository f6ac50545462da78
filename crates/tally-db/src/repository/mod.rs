//! # Repository Module
//!
//! Database repository implementations for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Dashboard store adapter                                               │
//! │       │                                                                 │
//! │       │  db.sales().list_with_lines()                                  │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── create_sale(&self, buyer, date)                                   │
//! │  ├── insert_lines(&self, sale_id, lines)                               │
//! │  ├── delete_sale(&self, sale_id)                                       │
//! │  └── list_with_lines(&self)                                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`] - Item catalog (read mostly, seeded)
//! - [`SaleRepository`] - Sale headers and their lines

pub mod item;
pub mod sale;

pub use item::ItemRepository;
pub use sale::SaleRepository;
