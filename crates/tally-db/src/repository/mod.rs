//! # Repository Module
//!
//! SQL lives here and nowhere else.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │   db.products().list_all()                                     │
//! │       │   db.sales().commit(&checkout)                                 │
//! │       ▼                                                                 │
//! │  ProductRepository            SaleRepository                           │
//! │  ├── list_all                 ├── commit (one transaction)             │
//! │  ├── get_by_id                ├── list_summaries                       │
//! │  ├── insert (seed)            ├── get_by_id / get_items                │
//! │  └── count                    └── get_detail                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog reads
//! - [`SaleRepository`](sale::SaleRepository) - Sale commit and history

pub mod product;
pub mod sale;
