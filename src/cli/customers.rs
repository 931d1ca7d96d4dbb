//! Customer commands.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use dialoguer::Confirm;
use kirana::{
    api::CustomersService,
    cache::{CacheKey, Mutation, Tag},
    models::{
        customer::{Customer, CustomerId, CustomerPatch, NewCustomer},
        page::{ListQuery, Page, SortOrder},
    },
    money,
};
use rust_decimal::Decimal;

use crate::cli::{context::Context, list_cache_key, output, page_line};

/// Manage customers and their credit standing.
#[derive(Debug, Args)]
pub struct CustomersCommand {
    #[command(subcommand)]
    command: CustomersSubcommand,
}

#[derive(Debug, Subcommand)]
enum CustomersSubcommand {
    /// List customers
    List(ListArgs),

    /// Show one customer
    Show {
        /// Customer identifier
        id: String,
    },

    /// Add a customer
    Add(AddArgs),

    /// Update a customer
    Update(UpdateArgs),

    /// Delete a customer
    Rm {
        /// Customer identifier
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Customers carrying a credit balance
    WithCredit,

    /// Best customers by purchase history
    Top {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Page size
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Filter by name or phone
    #[arg(long)]
    search: Option<String>,

    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: u32,

    /// Page size
    #[arg(long, default_value_t = 20)]
    size: u32,

    /// Field to sort by
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long)]
    desc: bool,
}

impl ListArgs {
    fn query(&self) -> ListQuery {
        ListQuery {
            search: self.search.clone(),
            page: self.page,
            size: self.size,
            sort_by: self.sort.clone(),
            sort_order: self.desc.then_some(SortOrder::Desc),
        }
    }
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Phone number
    #[arg(long)]
    phone: Option<String>,

    /// Email address
    #[arg(long)]
    email: Option<String>,

    /// Postal address
    #[arg(long)]
    address: Option<String>,

    /// Credit limit
    #[arg(long)]
    credit_limit: Option<Decimal>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Customer identifier
    id: String,

    /// New display name
    #[arg(long)]
    name: Option<String>,

    /// New phone number
    #[arg(long)]
    phone: Option<String>,

    /// New email address
    #[arg(long)]
    email: Option<String>,

    /// New postal address
    #[arg(long)]
    address: Option<String>,

    /// New credit limit
    #[arg(long)]
    credit_limit: Option<Decimal>,
}

/// Run a customer subcommand.
pub async fn run(command: CustomersCommand, ctx: &Context) -> Result<()> {
    ctx.require_login()?;

    match command.command {
        CustomersSubcommand::List(args) => list(args, ctx).await,
        CustomersSubcommand::Show { id } => show(&CustomerId::new(id), ctx).await,
        CustomersSubcommand::Add(args) => add(args, ctx).await,
        CustomersSubcommand::Update(args) => update(args, ctx).await,
        CustomersSubcommand::Rm { id, yes } => remove(&CustomerId::new(id), yes, ctx).await,
        CustomersSubcommand::WithCredit => with_credit(ctx).await,
        CustomersSubcommand::Top { page, size } => top(page, size, ctx).await,
    }
}

async fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let query = args.query();
    let key = list_cache_key("/customers", &query);

    let spinner = ctx.output.spinner("Loading customers");

    let result = ctx
        .cache
        .get_or_fetch(key, &[Tag::Customers], || ctx.customers.list(query.clone()))
        .await;

    spinner.finish_and_clear();

    let page: Page<Customer> = result?;

    if page.is_empty() {
        ctx.output.warn("No customers found");
        return Ok(());
    }

    let rows = page
        .content
        .iter()
        .map(|customer| {
            vec![
                customer.id.to_string(),
                customer.name.clone(),
                customer.phone.clone().unwrap_or_default(),
                money::inr(customer.credit_balance),
                money::inr(customer.credit_limit),
                customer.total_purchases.to_string(),
            ]
        })
        .collect();

    ctx.output.table(
        &["ID", "Name", "Phone", "Credit due", "Limit", "Purchases"],
        3..6,
        rows,
    );
    ctx.output.info(&page_line(&page));

    Ok(())
}

async fn show(id: &CustomerId, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading the customer");

    let result = ctx
        .cache
        .get_or_fetch(
            CacheKey::new(format!("/customers/{id}")),
            &[Tag::Customers],
            || ctx.customers.get(id),
        )
        .await;

    spinner.finish_and_clear();

    render_customer(ctx, &result?);

    Ok(())
}

async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let request = NewCustomer {
        name: args.name,
        phone: args.phone,
        email: args.email,
        address: args.address,
        credit_limit: args.credit_limit,
    };

    let spinner = ctx.output.spinner("Saving the customer");

    let result = ctx.customers.create(request).await;

    spinner.finish_and_clear();

    let customer = result?;

    ctx.cache.invalidate(Mutation::CustomerChanged);
    ctx.output
        .success(&format!("Added {} ({})", customer.name, customer.id));

    Ok(())
}

async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let id = CustomerId::new(args.id);
    let patch = CustomerPatch {
        name: args.name,
        phone: args.phone,
        email: args.email,
        address: args.address,
        credit_limit: args.credit_limit,
    };

    if patch == CustomerPatch::default() {
        bail!("nothing to update, pass at least one field");
    }

    let spinner = ctx.output.spinner("Saving the customer");

    let result = ctx.customers.update(&id, patch).await;

    spinner.finish_and_clear();

    let customer = result?;

    ctx.cache.invalidate(Mutation::CustomerChanged);
    ctx.output.success(&format!("Updated {}", customer.name));

    Ok(())
}

async fn remove(id: &CustomerId, yes: bool, ctx: &Context) -> Result<()> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete customer {id}?"))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.info("Nothing deleted");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Deleting the customer");

    let result = ctx.customers.delete(id).await;

    spinner.finish_and_clear();

    result?;

    ctx.cache.invalidate(Mutation::CustomerChanged);
    ctx.output.success(&format!("Deleted {id}"));

    Ok(())
}

async fn with_credit(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading credit customers");

    let result = ctx
        .cache
        .get_or_fetch(
            CacheKey::new("/customers/with-credit"),
            &[Tag::Customers],
            || ctx.customers.with_credit(),
        )
        .await;

    spinner.finish_and_clear();

    let customers = result?;

    if customers.is_empty() {
        ctx.output.success("No customer owes anything");
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

async fn top(page: u32, size: u32, ctx: &Context) -> Result<()> {
    let key = CacheKey::with_params(
        "/customers/top",
        &[("page", page.to_string()), ("size", size.to_string())],
    );

    let spinner = ctx.output.spinner("Loading top customers");

    let result = ctx
        .cache
        .get_or_fetch(key, &[Tag::Customers], || ctx.customers.top(page, size))
        .await;

    spinner.finish_and_clear();

    let top: Page<Customer> = result?;

    if top.is_empty() {
        ctx.output.warn("No purchase history yet");
        return Ok(());
    }

    ctx.output.table(
        &["Name", "Purchases", "Spent", "Loyalty", "Credit due"],
        1..5,
        top.content
            .iter()
            .map(|customer| {
                vec![
                    customer.name.clone(),
                    customer.total_purchases.to_string(),
                    money::inr(customer.total_spent),
                    customer.loyalty_points.to_string(),
                    money::inr(customer.credit_balance),
                ]
            })
            .collect(),
    );
    ctx.output.info(&page_line(&top));

    Ok(())
}

fn render_customer(ctx: &Context, customer: &Customer) {
    ctx.output.header(&customer.name);
    ctx.output.kv("ID", customer.id.as_str());
    ctx.output
        .kv("Status", &output::status_badge(&customer.status));

    if let Some(phone) = &customer.phone {
        ctx.output.kv("Phone", phone);
    }

    if let Some(email) = &customer.email {
        ctx.output.kv("Email", email);
    }

    if let Some(address) = &customer.address {
        ctx.output.kv("Address", address);
    }

    ctx.output
        .kv("Credit due", &money::inr(customer.credit_balance));
    ctx.output
        .kv("Credit limit", &money::inr(customer.credit_limit));
    ctx.output
        .kv("Purchases", &customer.total_purchases.to_string());
    ctx.output.kv("Spent", &money::inr(customer.total_spent));
    ctx.output
        .kv("Loyalty points", &customer.loyalty_points.to_string());

    if customer.credit_balance >= customer.credit_limit
        && !customer.credit_limit.is_zero()
    {
        ctx.output.warn("The credit limit has been reached");
    }
}
