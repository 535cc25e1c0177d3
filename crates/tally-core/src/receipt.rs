//! # Receipt Layout
//!
//! Turns a sale into the ordered list of directives a thermal printer runs.
//!
//! The formatter is pure: it never touches a socket. `tally-printer` takes
//! the directives and encodes them for the device, so every layout rule here
//! is unit-testable without hardware.
//!
//! ## Receipt Anatomy (48 columns)
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                  MINI MARKET                   │ ◄ centered, bold, 2x
//! │                 RUC 0991234567                 │
//! │               Av. Principal 123                │
//! │------------------------------------------------│
//! │Ticket #000042                                  │
//! │Date: 19/10/2026 14:03:11                       │
//! │------------------------------------------------│
//! │QTY   PRODUCT                              TOTAL│
//! │3     Agua 500ml                           $7.50│ ◄ name cut to 15 chars
//! │------------------------------------------------│
//! │                                    TOTAL: $7.50│ ◄ right, bold
//! │             Thank you for your visit           │
//! │                                                │ ◄ feed, then cut
//! └────────────────────────────────────────────────┘
//! ```
//!
//! Quantities and amounts are never cut. A number wider than its column
//! widens that column for its own row and the name column gives way; if the
//! name no longer fits it is printed on the line above the row.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{SaleDetail, SaleLineDetail};
use crate::validation::{validate_computed_amount, ValidationResult};
use crate::{RECEIPT_NAME_WIDTH, TICKET_NUMBER_WIDTH};

/// Default paper width in characters for 80mm paper with font A.
pub const DEFAULT_PAPER_WIDTH: usize = 48;

/// Lines fed before the cut so the last text clears the blade.
pub const FEED_BEFORE_CUT: u8 = 3;

// =============================================================================
// Directives
// =============================================================================

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// One cell of a table row, already sized in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub align: Alignment,
    pub width: usize,
}

impl TableCell {
    pub fn new(text: impl Into<String>, align: Alignment, width: usize) -> Self {
        TableCell {
            text: text.into(),
            align,
            width,
        }
    }

    /// Pads the cell to `width` characters. Text wider than the cell is
    /// kept whole and the cell grows.
    pub fn render(&self) -> String {
        let text = &self.text;
        let pad = self.width.saturating_sub(text.chars().count());

        match self.align {
            Alignment::Left => format!("{}{}", text, " ".repeat(pad)),
            Alignment::Right => format!("{}{}", " ".repeat(pad), text),
            Alignment::Center => {
                let left = pad / 2;
                format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
            }
        }
    }
}

/// Renders a table row to one fixed-width line.
pub fn render_row(cells: &[TableCell]) -> String {
    cells.iter().map(TableCell::render).collect()
}

/// A single printer instruction.
///
/// Style directives (`Align`, `Bold`, `TextSize`) stay in effect until
/// changed, like the printer's own mode registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintDirective {
    Align(Alignment),
    Bold(bool),
    /// Character magnification, 1..=8 in each direction.
    TextSize { width: u8, height: u8 },
    /// A line of text followed by a line feed.
    Line(String),
    /// A full-width line of dashes.
    Rule,
    TableRow(Vec<TableCell>),
    /// Feed n blank lines.
    Feed(u8),
    Cut,
    /// Pulse the cash drawer kick-out pin.
    PulseDrawer,
}

// =============================================================================
// Receipt Input
// =============================================================================

/// The data a receipt is printed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub sale_id: i64,
    pub total: Money,
    pub items: Vec<SaleLineDetail>,
}

impl From<SaleDetail> for ReceiptRequest {
    fn from(detail: SaleDetail) -> Self {
        ReceiptRequest {
            sale_id: detail.id,
            total: detail.total,
            items: detail.items,
        }
    }
}

/// Merchant header printed at the top of every receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantInfo {
    pub name: String,
    pub tax_id: String,
    pub address: Vec<String>,
    pub closing_message: String,
}

impl Default for MerchantInfo {
    fn default() -> Self {
        MerchantInfo {
            name: "MINI MARKET".to_string(),
            tax_id: "RUC 0991234567001".to_string(),
            address: vec!["Av. Principal 123".to_string()],
            closing_message: "Thank you for your visit".to_string(),
        }
    }
}

// =============================================================================
// Formatter
// =============================================================================

/// Lays out receipts for a given merchant and paper width.
#[derive(Debug, Clone)]
pub struct ReceiptFormatter {
    merchant: MerchantInfo,
    paper_width: usize,
}

impl ReceiptFormatter {
    pub fn new(merchant: MerchantInfo, paper_width: usize) -> Self {
        ReceiptFormatter {
            merchant,
            paper_width,
        }
    }

    pub fn paper_width(&self) -> usize {
        self.paper_width
    }

    /// Column widths for quantity, name and line total.
    fn columns(&self) -> (usize, usize, usize) {
        let qty = (self.paper_width / 8).max(4);
        let total = (self.paper_width / 4).max(8);
        let name = self.paper_width.saturating_sub(qty + total);
        (qty, name, total)
    }

    /// Builds the full directive sequence for one receipt.
    ///
    /// `printed_at` is the human-readable timestamp to print; passing it in
    /// keeps the layout deterministic. Fails only when a line total does not
    /// fit in cents.
    pub fn receipt(
        &self,
        receipt: &ReceiptRequest,
        printed_at: &str,
    ) -> ValidationResult<Vec<PrintDirective>> {
        let mut out = Vec::with_capacity(24 + receipt.items.len());

        // Header
        out.push(PrintDirective::Align(Alignment::Center));
        out.push(PrintDirective::Bold(true));
        out.push(PrintDirective::TextSize {
            width: 2,
            height: 2,
        });
        out.push(PrintDirective::Line(self.merchant.name.clone()));
        out.push(PrintDirective::TextSize {
            width: 1,
            height: 2,
        });
        out.push(PrintDirective::Line(self.merchant.tax_id.clone()));
        for line in &self.merchant.address {
            out.push(PrintDirective::Line(line.clone()));
        }
        out.push(PrintDirective::TextSize {
            width: 1,
            height: 1,
        });
        out.push(PrintDirective::Bold(false));
        out.push(PrintDirective::Rule);

        // Ticket info
        out.push(PrintDirective::Align(Alignment::Left));
        out.push(PrintDirective::Line(ticket_label(receipt.sale_id)));
        out.push(PrintDirective::Line(format!("Date: {}", printed_at)));
        out.push(PrintDirective::Rule);

        // Items
        let (qty_w, name_w, total_w) = self.columns();
        out.push(PrintDirective::Bold(true));
        out.push(PrintDirective::TableRow(vec![
            TableCell::new("QTY", Alignment::Left, qty_w),
            TableCell::new("PRODUCT", Alignment::Left, name_w),
            TableCell::new("TOTAL", Alignment::Right, total_w),
        ]));
        out.push(PrintDirective::Bold(false));
        for item in &receipt.items {
            let line_total = validate_computed_amount("quantity", item.line_total())?;
            out.extend(self.item_row(item, line_total, (qty_w, total_w)));
        }
        out.push(PrintDirective::Rule);

        // Total
        out.push(PrintDirective::Align(Alignment::Right));
        out.push(PrintDirective::Bold(true));
        out.push(PrintDirective::Line(format!("TOTAL: {}", receipt.total)));
        out.push(PrintDirective::Bold(false));

        // Footer
        out.push(PrintDirective::Align(Alignment::Center));
        out.push(PrintDirective::Line(self.merchant.closing_message.clone()));
        out.push(PrintDirective::Feed(FEED_BEFORE_CUT));
        out.push(PrintDirective::Cut);

        Ok(out)
    }

    /// One item row, preceded by a name line when the numbers crowd it out.
    fn item_row(
        &self,
        item: &SaleLineDetail,
        line_total: Money,
        (qty_w, total_w): (usize, usize),
    ) -> Vec<PrintDirective> {
        let qty = item.quantity.to_string();
        let total = line_total.to_string();
        let name = truncate(&item.name, RECEIPT_NAME_WIDTH);

        // a widened number keeps one space towards the name
        let qty_w = qty_w.max(qty.chars().count() + 1);
        let total_w = total_w.max(total.chars().count() + 1);
        let name_w = self.paper_width.saturating_sub(qty_w + total_w);

        let mut out = Vec::with_capacity(2);
        let inline_name = if name.chars().count() <= name_w {
            name
        } else {
            out.push(PrintDirective::Line(name));
            String::new()
        };

        out.push(PrintDirective::TableRow(vec![
            TableCell::new(qty, Alignment::Left, qty_w),
            TableCell::new(inline_name, Alignment::Left, name_w),
            TableCell::new(total, Alignment::Right, total_w),
        ]));
        out
    }

    /// The drawer-open sequence, independent of any receipt.
    pub fn drawer_pulse(&self) -> Vec<PrintDirective> {
        vec![PrintDirective::PulseDrawer]
    }
}

impl Default for ReceiptFormatter {
    fn default() -> Self {
        ReceiptFormatter::new(MerchantInfo::default(), DEFAULT_PAPER_WIDTH)
    }
}

/// `Ticket #000042`
pub fn ticket_label(sale_id: i64) -> String {
    format!("Ticket #{:0width$}", sale_id, width = TICKET_NUMBER_WIDTH)
}

/// Keeps the first `max` characters (not bytes) of `text`.
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
