//! # Repository Module
//!
//! Database repository implementations for Till POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().create_sale(&new_sale)                             │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── create_sale(&self, new_sale)    ← one atomic unit of work        │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── totals_between(&self, window)   ← COUNT + SUMs                    │
//! │  └── chart_series(&self, window)                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product lookups and inserts
//! - [`SaleRepository`](sale::SaleRepository) - Sale creation and aggregate reads

pub mod product;
pub mod sale;
