//! Product catalogue commands.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use dialoguer::Confirm;
use jiff::civil::Date;
use kirana::{
    api::ProductsService,
    cache::{CacheKey, Mutation, Tag},
    models::{
        page::{ListQuery, Page, SortOrder},
        product::{NewProduct, Product, ProductId, ProductPatch},
    },
    money,
};
use rust_decimal::Decimal;

use crate::cli::{context::Context, list_cache_key, output, page_line};

/// Manage the product catalogue.
#[derive(Debug, Args)]
pub struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List the catalogue
    List(ListArgs),

    /// Show one product
    Show {
        /// Product identifier
        id: String,
    },

    /// Look a product up by barcode
    Barcode {
        /// Barcode digits
        barcode: String,
    },

    /// Add a product
    Add(AddArgs),

    /// Update a product
    Update(UpdateArgs),

    /// Delete a product
    Rm {
        /// Product identifier
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Products at or below their low-stock threshold
    LowStock,

    /// Products close to their expiry date
    Expiring,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Filter by name, category, or barcode
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

    /// Selling price per unit
    #[arg(long)]
    price: Decimal,

    /// Opening stock
    #[arg(long)]
    stock: i64,

    /// Purchase cost per unit
    #[arg(long)]
    cost_price: Option<Decimal>,

    /// Category label
    #[arg(long)]
    category: Option<String>,

    /// Free-text description
    #[arg(long)]
    description: Option<String>,

    /// Low-stock threshold
    #[arg(long)]
    min_stock: Option<i64>,

    /// Unit of sale, e.g. pcs or kg
    #[arg(long)]
    unit: Option<String>,

    /// Barcode
    #[arg(long)]
    barcode: Option<String>,

    /// Expiry date (YYYY-MM-DD)
    #[arg(long)]
    expiry: Option<Date>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Product identifier
    id: String,

    /// New display name
    #[arg(long)]
    name: Option<String>,

    /// New selling price per unit
    #[arg(long)]
    price: Option<Decimal>,

    /// New stock on hand
    #[arg(long)]
    stock: Option<i64>,

    /// New purchase cost per unit
    #[arg(long)]
    cost_price: Option<Decimal>,

    /// New category label
    #[arg(long)]
    category: Option<String>,

    /// New free-text description
    #[arg(long)]
    description: Option<String>,

    /// New low-stock threshold
    #[arg(long)]
    min_stock: Option<i64>,

    /// New unit of sale
    #[arg(long)]
    unit: Option<String>,

    /// New barcode
    #[arg(long)]
    barcode: Option<String>,

    /// New expiry date (YYYY-MM-DD)
    #[arg(long)]
    expiry: Option<Date>,
}

/// Run a product subcommand.
pub async fn run(command: ProductsCommand, ctx: &Context) -> Result<()> {
    ctx.require_login()?;

    match command.command {
        ProductsSubcommand::List(args) => list(args, ctx).await,
        ProductsSubcommand::Show { id } => show(&ProductId::new(id), ctx).await,
        ProductsSubcommand::Barcode { barcode } => by_barcode(&barcode, ctx).await,
        ProductsSubcommand::Add(args) => add(args, ctx).await,
        ProductsSubcommand::Update(args) => update(args, ctx).await,
        ProductsSubcommand::Rm { id, yes } => remove(&ProductId::new(id), yes, ctx).await,
        ProductsSubcommand::LowStock => low_stock(ctx).await,
        ProductsSubcommand::Expiring => expiring(ctx).await,
    }
}

async fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let query = args.query();
    let key = list_cache_key("/products", &query);

    let spinner = ctx.output.spinner("Loading products");

    let result = ctx
        .cache
        .get_or_fetch(key, &[Tag::Products], || ctx.products.list(query.clone()))
        .await;

    spinner.finish_and_clear();

    let page: Page<Product> = result?;

    if page.is_empty() {
        ctx.output.warn("No products found");
        return Ok(());
    }

    let rows = page
        .content
        .iter()
        .map(|product| {
            vec![
                product.id.to_string(),
                product.name.clone(),
                product.category.clone().unwrap_or_default(),
                money::inr(product.price),
                format!("{} {}", product.stock_quantity, product.unit),
                stock_flag(product).to_string(),
            ]
        })
        .collect();

    ctx.output.table(
        &["ID", "Name", "Category", "Price", "Stock", ""],
        3..5,
        rows,
    );
    ctx.output.info(&page_line(&page));

    Ok(())
}

async fn show(id: &ProductId, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading the product");

    let result = ctx
        .cache
        .get_or_fetch(
            CacheKey::new(format!("/products/{id}")),
            &[Tag::Products],
            || ctx.products.get(id),
        )
        .await;

    spinner.finish_and_clear();

    render_product(ctx, &result?);

    Ok(())
}

async fn by_barcode(barcode: &str, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Looking up the barcode");

    let result = ctx
        .cache
        .get_or_fetch(
            CacheKey::new(format!("/products/barcode/{barcode}")),
            &[Tag::Products],
            || ctx.products.by_barcode(barcode),
        )
        .await;

    spinner.finish_and_clear();

    render_product(ctx, &result?);

    Ok(())
}

async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let request = NewProduct {
        name: args.name,
        description: args.description,
        category: args.category,
        price: args.price,
        cost_price: args.cost_price,
        stock_quantity: args.stock,
        min_stock_level: args.min_stock,
        unit: args.unit,
        barcode: args.barcode,
        expiry_date: args.expiry,
    };

    let spinner = ctx.output.spinner("Saving the product");

    let result = ctx.products.create(request).await;

    spinner.finish_and_clear();

    let product = result?;

    ctx.cache.invalidate(Mutation::ProductChanged);
    ctx.output
        .success(&format!("Added {} ({})", product.name, product.id));

    Ok(())
}

async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let id = ProductId::new(args.id);
    let patch = ProductPatch {
        name: args.name,
        description: args.description,
        category: args.category,
        price: args.price,
        cost_price: args.cost_price,
        stock_quantity: args.stock,
        min_stock_level: args.min_stock,
        unit: args.unit,
        barcode: args.barcode,
        expiry_date: args.expiry,
    };

    if patch == ProductPatch::default() {
        bail!("nothing to update, pass at least one field");
    }

    let spinner = ctx.output.spinner("Saving the product");

    let result = ctx.products.update(&id, patch).await;

    spinner.finish_and_clear();

    let product = result?;

    ctx.cache.invalidate(Mutation::ProductChanged);
    ctx.output.success(&format!("Updated {}", product.name));

    Ok(())
}

async fn remove(id: &ProductId, yes: bool, ctx: &Context) -> Result<()> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete product {id}?"))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.info("Nothing deleted");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Deleting the product");

    let result = ctx.products.delete(id).await;

    spinner.finish_and_clear();

    result?;

    ctx.cache.invalidate(Mutation::ProductChanged);
    ctx.output.success(&format!("Deleted {id}"));

    Ok(())
}

async fn low_stock(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading low-stock products");

    let result = ctx
        .cache
        .get_or_fetch(
            CacheKey::new("/products/low-stock"),
            &[Tag::Products],
            || ctx.products.low_stock(),
        )
        .await;

    spinner.finish_and_clear();

    let products = result?;

    if products.is_empty() {
        ctx.output.success("No products are low on stock");
        return Ok(());
    }

    ctx.output.table(
        &["ID", "Name", "Stock", "Min"],
        2..4,
        products
            .iter()
            .map(|product| {
                vec![
                    product.id.to_string(),
                    product.name.clone(),
                    format!("{} {}", product.stock_quantity, product.unit),
                    product.min_stock_level.to_string(),
                ]
            })
            .collect(),
    );

    Ok(())
}

async fn expiring(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading expiring products");

    let result = ctx
        .cache
        .get_or_fetch(CacheKey::new("/products/expiring"), &[Tag::Products], || {
            ctx.products.expiring()
        })
        .await;

    spinner.finish_and_clear();

    let products = result?;

    if products.is_empty() {
        ctx.output.success("Nothing is close to expiry");
        return Ok(());
    }

    ctx.output.table(
        &["ID", "Name", "Expiry", "Stock"],
        3..4,
        products
            .iter()
            .map(|product| {
                vec![
                    product.id.to_string(),
                    product.name.clone(),
                    product
                        .expiry_date
                        .map_or_else(String::new, |date| date.to_string()),
                    format!("{} {}", product.stock_quantity, product.unit),
                ]
            })
            .collect(),
    );

    Ok(())
}

fn render_product(ctx: &Context, product: &Product) {
    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("Status", &output::status_badge(&product.status));

    if let Some(category) = &product.category {
        ctx.output.kv("Category", category);
    }

    if let Some(description) = &product.description {
        ctx.output.kv("Description", description);
    }

    ctx.output.kv("Price", &money::inr(product.price));

    if let Some(cost) = product.cost_price {
        ctx.output.kv("Cost price", &money::inr(cost));
    }

    ctx.output.kv(
        "Stock",
        &format!("{} {}", product.stock_quantity, product.unit),
    );
    ctx.output
        .kv("Min stock", &product.min_stock_level.to_string());

    if let Some(barcode) = &product.barcode {
        ctx.output.kv("Barcode", barcode);
    }

    if let Some(expiry) = product.expiry_date {
        ctx.output.kv("Expiry", &expiry.to_string());
    }

    if product.is_low_stock {
        ctx.output.warn("Stock is at or below the minimum level");
    }

    if product.is_expiring_soon {
        ctx.output.warn("Expiry date is near");
    }
}

fn stock_flag(product: &Product) -> &'static str {
    match (product.is_low_stock, product.is_expiring_soon) {
        (true, true) => "low, expiring",
        (true, false) => "low",
        (false, true) => "expiring",
        (false, false) => "",
    }
}
