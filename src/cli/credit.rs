//! Credit (udhaar) ledger commands.

use anyhow::{Result, bail};
use clap::{Args, Subcommand, ValueEnum};
use kirana::{
    api::CreditService,
    cache::{CacheKey, Mutation, Tag},
    models::{
        credit::{CreditPayment, CreditPaymentMethod, CreditTransaction, CreditTransactionType},
        customer::CustomerId,
        page::Page,
    },
    money,
};
use rust_decimal::Decimal;

use crate::cli::{context::Context, date_part, page_line};

/// Record credit payments and browse the ledger.
#[derive(Debug, Args)]
pub struct CreditCommand {
    #[command(subcommand)]
    command: CreditSubcommand,
}

#[derive(Debug, Subcommand)]
enum CreditSubcommand {
    /// Record a payment against a customer's outstanding credit
    Pay(PayArgs),

    /// One customer's ledger entries
    History {
        /// Customer identifier
        customer: String,
    },

    /// All ledger entries, newest first
    Ledger {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Page size
        #[arg(long, default_value_t = 20)]
        size: u32,
    },

    /// Customers carrying a balance
    Outstanding,

    /// Total credit outstanding across the store
    Total,
}

#[derive(Debug, Args)]
struct PayArgs {
    /// Customer identifier
    #[arg(long)]
    customer: String,

    /// Amount being paid back
    #[arg(long)]
    amount: Decimal,

    /// Settlement method
    #[arg(long, value_enum, default_value_t = PayMethod::Cash)]
    method: PayMethod,

    /// Free-text note for the ledger
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PayMethod {
    Cash,
    Upi,
    Card,
    BankTransfer,
}

impl From<PayMethod> for CreditPaymentMethod {
    fn from(method: PayMethod) -> Self {
        match method {
            PayMethod::Cash => Self::Cash,
            PayMethod::Upi => Self::Upi,
            PayMethod::Card => Self::Card,
            PayMethod::BankTransfer => Self::BankTransfer,
        }
    }
}

/// Run a credit subcommand.
pub async fn run(command: CreditCommand, ctx: &Context) -> Result<()> {
    ctx.require_login()?;

    match command.command {
        CreditSubcommand::Pay(args) => pay(args, ctx).await,
        CreditSubcommand::History { customer } => history(&CustomerId::new(customer), ctx).await,
        CreditSubcommand::Ledger { page, size } => ledger(page, size, ctx).await,
        CreditSubcommand::Outstanding => outstanding(ctx).await,
        CreditSubcommand::Total => total(ctx).await,
    }
}

async fn pay(args: PayArgs, ctx: &Context) -> Result<()> {
    if args.amount <= Decimal::ZERO {
        bail!("the payment amount must be positive");
    }

    let payment = CreditPayment {
        customer_id: CustomerId::new(args.customer),
        amount: args.amount,
        payment_method: args.method.into(),
        notes: args.notes,
    };

    let spinner = ctx.output.spinner("Recording the payment");

    let result = ctx.credit.record_payment(payment).await;

    spinner.finish_and_clear();

    let receipt = result?;

    ctx.cache.invalidate(Mutation::CreditPaymentRecorded);
    ctx.output.success(&format!(
        "Received {} from {}",
        money::inr(receipt.transaction.amount),
        receipt.customer.name
    ));
    ctx.output
        .kv("Balance now", &money::inr(receipt.customer.credit_balance));

    Ok(())
}

async fn history(customer: &CustomerId, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading the ledger");

    let result = ctx
        .cache
        .get_or_fetch(
            CacheKey::new(format!("/credit/customer/{customer}")),
            &[Tag::Credit],
            || ctx.credit.customer_history(customer),
        )
        .await;

    spinner.finish_and_clear();

    let entries = result?;

    if entries.is_empty() {
        ctx.output.info("No ledger entries for this customer");
        return Ok(());
    }

    render_entries(ctx, &entries, false);

    Ok(())
}

async fn ledger(page: u32, size: u32, ctx: &Context) -> Result<()> {
    let key = CacheKey::with_params(
        "/credit/transactions",
        &[("page", page.to_string()), ("size", size.to_string())],
    );

    let spinner = ctx.output.spinner("Loading the ledger");

    let result = ctx
        .cache
        .get_or_fetch(key, &[Tag::Credit], || ctx.credit.transactions(page, size))
        .await;

    spinner.finish_and_clear();

    let entries: Page<CreditTransaction> = result?;

    if entries.is_empty() {
        ctx.output.info("The ledger is empty");
        return Ok(());
    }

    render_entries(ctx, &entries.content, true);
    ctx.output.info(&page_line(&entries));

    Ok(())
}

async fn outstanding(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading outstanding accounts");

    let result = ctx
        .cache
        .get_or_fetch(CacheKey::new("/credit/outstanding"), &[Tag::Credit], || {
            ctx.credit.outstanding_accounts()
        })
        .await;

    spinner.finish_and_clear();

    let customers = result?;

    if customers.is_empty() {
        ctx.output.success("Nothing outstanding");
        return Ok(());
    }

    ctx.output.table(
        &["ID", "Name", "Phone", "Credit due", "Limit"],
        3..5,
        customers
            .iter()
            .map(|customer| {
                vec![
                    customer.id.to_string(),
                    customer.name.clone(),
                    customer.phone.clone().unwrap_or_default(),
                    money::inr(customer.credit_balance),
                    money::inr(customer.credit_limit),
                ]
            })
            .collect(),
    );

    Ok(())
}

async fn total(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Adding it up");

    let result = ctx
        .cache
        .get_or_fetch(CacheKey::new("/credit/total"), &[Tag::Credit], || {
            ctx.credit.total_outstanding()
        })
        .await;

    spinner.finish_and_clear();

    ctx.output.write(&money::inr(result?));

    Ok(())
}

fn render_entries(ctx: &Context, entries: &[CreditTransaction], with_customer: bool) {
    let mut columns = vec!["Date", "Entry", "Amount", "Balance after", "Note"];
    let mut rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                date_part(&entry.created_at).to_string(),
                entry_label(entry).to_string(),
                money::inr(entry.amount),
                money::inr(entry.balance_after),
                entry.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();

    if with_customer {
        columns.insert(0, "Customer");

        for (entry, row) in entries.iter().zip(rows.iter_mut()) {
            row.insert(0, entry.customer_name.clone());
        }
    }

    let numeric = if with_customer { 3..5 } else { 2..4 };

    ctx.output.table(&columns, numeric, rows);
}

fn entry_label(entry: &CreditTransaction) -> &'static str {
    match entry.transaction_type {
        CreditTransactionType::CreditTaken => "Credit taken",
        CreditTransactionType::PaymentMade => "Payment",
    }
}
