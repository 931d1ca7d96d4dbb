//! Printed bill for a recorded sale.
//!
//! Every figure on the bill comes from the [`Sale`] the backend returned,
//! never from local cart arithmetic, so the paper matches the books.

use std::io;

use console::measure_text_width;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{models::sale::Sale, money};

const STORE_NAME: &str = "KIRANA STORE";

/// Errors that can occur when printing a bill.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Render the bill for a sale to a string.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] when the bill cannot be written.
pub fn render(sale: &Sale) -> Result<String, ReceiptError> {
    let mut out = Vec::new();

    write_receipt(&mut out, sale)?;

    String::from_utf8(out).map_err(|_err| ReceiptError::IO)
}

/// Write the bill for a sale: header, line items, and totals.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] when the bill cannot be written.
pub fn write_receipt(out: &mut impl io::Write, sale: &Sale) -> Result<(), ReceiptError> {
    write_bill_header(out, sale)?;

    let mut builder = Builder::default();

    push_item_header(&mut builder);
    append_item_rows(&mut builder, sale);

    write_bill_table(out, builder)?;

    write_bill_summary(out, sale)?;

    write_bill_footer(out)
}

fn write_bill_header(out: &mut impl io::Write, sale: &Sale) -> Result<(), ReceiptError> {
    writeln!(out, "\x1b[1m{STORE_NAME}\x1b[0m\n").map_err(|_err| ReceiptError::IO)?;
    writeln!(out, "Bill No:  {}", sale.bill_number).map_err(|_err| ReceiptError::IO)?;
    writeln!(out, "Date:     {}", sale.created_at).map_err(|_err| ReceiptError::IO)?;
    writeln!(out, "Customer: {}", sale.customer_display()).map_err(|_err| ReceiptError::IO)
}

fn push_item_header(builder: &mut Builder) {
    builder.push_record(["", "Item", "Qty", "Price", "Discount", "Total"]);
}

fn append_item_rows(builder: &mut Builder, sale: &Sale) {
    for (item_idx, item) in sale.items.iter().enumerate() {
        let discount = if item.discount.is_zero() {
            String::new()
        } else {
            format!("-{}", money::inr(item.discount))
        };

        builder.push_record([
            format!("#{:<3}", item_idx + 1),
            item.product_name.clone(),
            item.quantity.to_string(),
            money::inr(item.unit_price),
            discount,
            money::inr(item.line_total),
        ]);
    }
}

fn write_bill_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..6), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

fn write_bill_summary(out: &mut impl io::Write, sale: &Sale) -> Result<(), ReceiptError> {
    let subtotal_label = " Subtotal:";
    let discount_label = " Discount:";
    let tax_label = " Tax:";
    let total_label = " \x1b[1mTotal:\x1b[0m";
    let paid_label = format!(" Paid ({}):", sale.payment_method);
    let credit_label = " Credit Due:";

    let subtotal_val = format!("{}  ", money::inr(sale.subtotal));
    let discount_val = format!("-{}  ", money::inr(sale.discount_amount));
    let tax_val = format!("{}  ", money::inr(sale.tax_amount));
    let total_val = format!("{}  ", money::inr(sale.total_amount));
    let paid_val = format!("{}  ", money::inr(sale.amount_paid));
    let credit_val = format!("{}  ", money::inr(sale.credit_amount));

    let label_width = measure_text_width(subtotal_label)
        .max(measure_text_width(discount_label))
        .max(measure_text_width(tax_label))
        .max(measure_text_width(total_label))
        .max(measure_text_width(&paid_label))
        .max(measure_text_width(credit_label));

    let value_width = subtotal_val
        .len()
        .max(discount_val.len())
        .max(tax_val.len())
        .max(total_val.len())
        .max(paid_val.len())
        .max(credit_val.len());

    write_summary_line(out, subtotal_label, &subtotal_val, label_width, value_width)?;
    write_summary_line(out, discount_label, &discount_val, label_width, value_width)?;
    write_summary_line(out, tax_label, &tax_val, label_width, value_width)?;

    write_summary_line(
        out,
        total_label,
        &format!("\x1b[1m{total_val}\x1b[0m"),
        label_width,
        value_width,
    )?;

    write_summary_line(out, &paid_label, &paid_val, label_width, value_width)?;

    if !sale.credit_amount.is_zero() {
        write_summary_line(out, credit_label, &credit_val, label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

fn write_bill_footer(out: &mut impl io::Write) -> Result<(), ReceiptError> {
    writeln!(out, "Thank you for shopping with us!").map_err(|_err| ReceiptError::IO)?;
    writeln!(out, "* Goods once sold cannot be returned *").map_err(|_err| ReceiptError::IO)
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_vis = measure_text_width(label);
    let value_vis = measure_text_width(value);

    // 2 chars of spacing between label and value column.
    let label_pad = label_col_width.saturating_sub(label_vis);
    let value_pad = value_col_width.saturating_sub(value_vis);

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}
