//! # HTTP Routes
//!
//! ```text
//! GET  /api/products            products::list_products
//! POST /api/sales               sales::create_sale
//! GET  /api/sales               sales::list_sales
//! GET  /api/sales/{id}          sales::get_sale
//! POST /api/sales/{id}/print    sales::reprint_sale
//! POST /api/print               printer::print_receipt
//! POST /api/drawer              printer::open_drawer
//! GET  /health                  health::health
//! *                             static UI
//! ```

pub mod health;
pub mod printer;
pub mod products;
pub mod sales;

use serde::Serialize;

/// `{"success": true}`
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Ack { success: true }
    }
}
