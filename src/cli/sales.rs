//! Recorded-sale commands.

use std::fs;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use jiff::civil::Date;
use kirana::{
    api::SalesService,
    cache::{CacheKey, Tag},
    models::{
        page::Page,
        sale::{Sale, SaleId, SaleListQuery},
    },
    money, receipt,
};
use rust_decimal::Decimal;

use crate::cli::{context::Context, date_part, page_line};

/// Browse recorded sales and reprint bills.
#[derive(Debug, Args)]
pub struct SalesCommand {
    #[command(subcommand)]
    command: SalesSubcommand,
}

#[derive(Debug, Subcommand)]
enum SalesSubcommand {
    /// List recorded sales
    List(ListArgs),

    /// Print the bill for one sale
    Show {
        /// Sale identifier
        id: String,

        /// Also write the bill to Bill-<number>.txt
        #[arg(long)]
        save: bool,
    },

    /// Print the bill with the given bill number
    Bill {
        /// Bill number, e.g. BILL-2026-000784
        number: String,

        /// Also write the bill to Bill-<number>.txt
        #[arg(long)]
        save: bool,
    },

    /// Sales recorded today
    Today,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Earliest sale date to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<Date>,

    /// Latest sale date to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<Date>,

    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: u32,

    /// Page size
    #[arg(long, default_value_t = 20)]
    size: u32,
}

/// Run a sales subcommand.
pub async fn run(command: SalesCommand, ctx: &Context) -> Result<()> {
    ctx.require_login()?;

    match command.command {
        SalesSubcommand::List(args) => list(args, ctx).await,
        SalesSubcommand::Show { id, save } => show(&SaleId::new(id), save, ctx).await,
        SalesSubcommand::Bill { number, save } => by_bill(&number, save, ctx).await,
        SalesSubcommand::Today => today(ctx).await,
    }
}

async fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let query = SaleListQuery {
        start_date: args.from,
        end_date: args.to,
        page: args.page,
        size: args.size,
        sort_by: None,
        sort_order: None,
    };
    let key = sale_list_cache_key(&query);

    let spinner = ctx.output.spinner("Loading sales");

    let result = ctx
        .cache
        .get_or_fetch(key, &[Tag::Sales], || ctx.sales.list(query.clone()))
        .await;

    spinner.finish_and_clear();

    let page: Page<Sale> = result?;

    if page.is_empty() {
        ctx.output.warn("No sales in that range");
        return Ok(());
    }

    render_sales_table(ctx, &page.content);
    ctx.output.info(&page_line(&page));

    Ok(())
}

async fn show(id: &SaleId, save: bool, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading the sale");

    let result = ctx
        .cache
        .get_or_fetch(CacheKey::new(format!("/sales/{id}")), &[Tag::Sales], || {
            ctx.sales.get(id)
        })
        .await;

    spinner.finish_and_clear();

    print_bill(ctx, &result?, save)
}

async fn by_bill(number: &str, save: bool, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading the bill");

    let result = ctx
        .cache
        .get_or_fetch(
            CacheKey::new(format!("/sales/bill/{number}")),
            &[Tag::Sales],
            || ctx.sales.by_bill(number),
        )
        .await;

    spinner.finish_and_clear();

    print_bill(ctx, &result?, save)
}

async fn today(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading today's sales");

    let result = ctx
        .cache
        .get_or_fetch(CacheKey::new("/sales/today"), &[Tag::Sales], || {
            ctx.sales.today()
        })
        .await;

    spinner.finish_and_clear();

    let sales = result?;

    if sales.is_empty() {
        ctx.output.info("No sales recorded today");
        return Ok(());
    }

    render_sales_table(ctx, &sales);

    let revenue: Decimal = sales.iter().map(|sale| sale.total_amount).sum();

    ctx.output
        .info(&format!("{} bills, {}", sales.len(), money::inr(revenue)));

    Ok(())
}

fn render_sales_table(ctx: &Context, sales: &[Sale]) {
    let rows = sales
        .iter()
        .map(|sale| {
            vec![
                sale.bill_number.clone(),
                date_part(&sale.created_at).to_string(),
                sale.customer_display().to_string(),
                money::inr(sale.total_amount),
                sale.payment_method.as_str().to_string(),
                sale.payment_status.clone(),
            ]
        })
        .collect();

    ctx.output.table(
        &["Bill", "Date", "Customer", "Total", "Method", "Status"],
        3..4,
        rows,
    );
}

fn print_bill(ctx: &Context, sale: &Sale, save: bool) -> Result<()> {
    let bill = receipt::render(sale)?;

    ctx.output.write(&bill);

    if save {
        let path = format!("Bill-{}.txt", sale.bill_number);

        fs::write(&path, console::strip_ansi_codes(&bill).as_bytes())
            .with_context(|| format!("could not write {path}"))?;

        ctx.output.success(&format!("Saved {path}"));
    }

    Ok(())
}

fn sale_list_cache_key(query: &SaleListQuery) -> CacheKey {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("size", query.size.to_string()),
    ];

    if let Some(start) = query.start_date {
        params.push(("startDate", start.to_string()));
    }

    if let Some(end) = query.end_date {
        params.push(("endDate", end.to_string()));
    }

    CacheKey::with_params("/sales", &params)
}
