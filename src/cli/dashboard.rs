//! Store overview command.

use anyhow::Result;
use kirana::{
    api::DashboardService,
    cache::{CacheKey, Tag},
    models::dashboard::DashboardData,
    money,
};

use crate::cli::context::Context;

/// Fetch and render the store dashboard.
pub async fn run(ctx: &Context) -> Result<()> {
    ctx.require_login()?;

    let spinner = ctx.output.spinner("Loading the dashboard");

    let result = ctx
        .cache
        .get_or_fetch(CacheKey::new("/dashboard"), &[Tag::Dashboard], || {
            ctx.dashboard.dashboard()
        })
        .await;

    spinner.finish_and_clear();

    let data = result?;

    render(ctx, &data);

    Ok(())
}

fn render(ctx: &Context, data: &DashboardData) {
    let today = &data.today_sales;
    let credit = &data.credit_outstanding;
    let inventory = &data.inventory;
    let customers = &data.customers;

    ctx.output.header("Today");
    ctx.output.kv("Sales", &money::inr(today.total_amount));
    ctx.output.kv("Bills", &today.bills_count.to_string());
    ctx.output.kv("Cash", &money::inr(today.cash_sales));
    ctx.output.kv("UPI", &money::inr(today.upi_sales));
    ctx.output.kv("Card", &money::inr(today.card_sales));
    ctx.output.kv("Credit", &money::inr(today.credit_sales));

    ctx.output.header("Credit outstanding");
    ctx.output.kv("Total", &money::inr(credit.total_amount));
    ctx.output.kv("Customers", &credit.customers_count.to_string());
    ctx.output
        .kv("Largest", &money::inr(credit.largest_outstanding));

    ctx.output.header("Inventory");
    ctx.output
        .kv("Active products", &inventory.active_products.to_string());
    ctx.output
        .kv("Low stock", &inventory.low_stock_count.to_string());
    ctx.output
        .kv("Out of stock", &inventory.out_of_stock_count.to_string());
    ctx.output.kv("Stock value", &money::inr(inventory.total_value));

    ctx.output.header("Customers");
    ctx.output.kv("Total", &customers.total.to_string());
    ctx.output
        .kv("Active", &customers.active_customers.to_string());
    ctx.output
        .kv("New this week", &customers.new_this_week.to_string());

    render_alerts(ctx, data);
}

fn render_alerts(ctx: &Context, data: &DashboardData) {
    if !data.alerts.low_stock_products.is_empty() {
        ctx.output.header("Low stock");
        ctx.output.table(
            &["Product", "Stock", "Min"],
            1..3,
            data.alerts
                .low_stock_products
                .iter()
                .map(|product| {
                    vec![
                        product.name.clone(),
                        product.stock_quantity.to_string(),
                        product.min_stock_level.to_string(),
                    ]
                })
                .collect(),
        );
    }

    if !data.alerts.expiring_products.is_empty() {
        ctx.output.header("Expiring soon");
        ctx.output.table(
            &["Product", "Expiry"],
            0..0,
            data.alerts
                .expiring_products
                .iter()
                .map(|product| {
                    vec![
                        product.name.clone(),
                        product
                            .expiry_date
                            .map_or_else(String::new, |date| date.to_string()),
                    ]
                })
                .collect(),
        );
    }
}
