//! Interactive point-of-sale till.
//!
//! One long-running loop per operator: ring up items, pick the customer and
//! payment method, check out, print the bill, and start over with the next
//! customer. Backend failures never clear the cart.

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use kirana::{
    api::{ApiError, CustomersService, ProductsService},
    cache::{CacheKey, Mutation, Tag},
    checkout::{Checkout, CheckoutError},
    models::{
        customer::Customer,
        page::{ListQuery, Page},
        product::{Product, ProductId},
        sale::PaymentMethod,
    },
    money, receipt,
};
use rust_decimal::Decimal;

use crate::cli::{context::Context, list_cache_key};

#[derive(Debug, Clone, Copy)]
enum Action {
    AddItem,
    ChangeQuantity,
    SetDiscount,
    RemoveItem,
    Customer,
    Payment,
    AmountPaid,
    Notes,
    Checkout,
    ClearCart,
    Quit,
}

const MENU: [(&str, Action); 11] = [
    ("Add item", Action::AddItem),
    ("Change quantity", Action::ChangeQuantity),
    ("Set discount", Action::SetDiscount),
    ("Remove item", Action::RemoveItem),
    ("Customer", Action::Customer),
    ("Payment method", Action::Payment),
    ("Amount paid", Action::AmountPaid),
    ("Notes", Action::Notes),
    ("Checkout", Action::Checkout),
    ("Clear cart", Action::ClearCart),
    ("Quit", Action::Quit),
];

/// Run the interactive till until the operator quits.
pub async fn run(ctx: &Context) -> Result<()> {
    ctx.require_login()?;

    let mut checkout = Checkout::new();

    ctx.output
        .info("Point of sale. Scan or search for products, then check out.");

    loop {
        render_till(ctx, &checkout);

        let labels: Vec<&str> = MENU.iter().map(|(label, _)| *label).collect();
        let picked = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()?;

        let Some(&(_, action)) = MENU.get(picked) else {
            continue;
        };

        match action {
            Action::AddItem => add_item(ctx, &mut checkout).await?,
            Action::ChangeQuantity => change_quantity(ctx, &mut checkout)?,
            Action::SetDiscount => set_discount(ctx, &mut checkout)?,
            Action::RemoveItem => remove_item(ctx, &mut checkout)?,
            Action::Customer => pick_customer(ctx, &mut checkout).await?,
            Action::Payment => pick_payment_method(ctx, &mut checkout)?,
            Action::AmountPaid => set_amount_paid(ctx, &mut checkout)?,
            Action::Notes => set_notes(&mut checkout)?,
            Action::Checkout => submit(ctx, &mut checkout).await,
            Action::ClearCart => clear_cart(ctx, &mut checkout)?,
            Action::Quit => {
                if confirm_quit(&checkout)? {
                    return Ok(());
                }
            }
        }
    }
}

fn render_till(ctx: &Context, checkout: &Checkout) {
    let cart = checkout.cart();

    if cart.is_empty() {
        ctx.output.header("Cart (empty)");
    } else {
        ctx.output.header("Cart");

        let rows = cart
            .iter()
            .map(|line| {
                vec![
                    line.name().to_string(),
                    line.quantity().to_string(),
                    money::inr(line.unit_price()),
                    if line.discount().is_zero() {
                        String::new()
                    } else {
                        format!("-{}", money::inr(line.discount()))
                    },
                    money::inr(line.line_total()),
                ]
            })
            .collect();

        ctx.output
            .table(&["Item", "Qty", "Price", "Discount", "Total"], 1..5, rows);

        let totals = cart.totals();

        ctx.output.kv("Subtotal", &money::inr(totals.subtotal));
        ctx.output
            .kv("Discount", &format!("-{}", money::inr(totals.discount_total)));
        ctx.output.kv("Tax", &money::inr(Decimal::ZERO));
        ctx.output.kv("Total", &money::inr(totals.total));
    }

    ctx.output.kv("Customer", &customer_label(checkout));
    ctx.output.kv("Payment", checkout.payment_method().as_str());

    if let Some(amount) = checkout.amount_paid() {
        ctx.output.kv("Amount paid", &money::inr(amount));
    }

    if let Some(notes) = checkout.notes() {
        ctx.output.kv("Notes", notes);
    }
}

fn customer_label(checkout: &Checkout) -> String {
    checkout
        .customer()
        .map_or_else(|| "Walk-in Customer".to_string(), ToString::to_string)
}

async fn add_item(ctx: &Context, checkout: &mut Checkout) -> Result<()> {
    let term: String = Input::new()
        .with_prompt("Product name or barcode")
        .allow_empty(true)
        .interact_text()?;
    let term = term.trim();

    if term.is_empty() {
        return Ok(());
    }

    let Some(product) = find_product(ctx, term).await? else {
        return Ok(());
    };

    checkout.cart_mut().add_line(&product);
    ctx.output.success(&format!("Added {}", product.name));

    Ok(())
}

async fn find_product(ctx: &Context, term: &str) -> Result<Option<Product>> {
    if looks_like_barcode(term) {
        return scan_barcode(ctx, term).await;
    }

    search_products(ctx, term).await
}

fn looks_like_barcode(term: &str) -> bool {
    term.len() >= 8 && term.chars().all(|ch| ch.is_ascii_digit())
}

async fn scan_barcode(ctx: &Context, barcode: &str) -> Result<Option<Product>> {
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

    match result {
        Ok(product) => Ok(Some(product)),
        Err(ApiError::Rejected(message) | ApiError::Status { status: 404, message }) => {
            ctx.output.warn(&message);
            Ok(None)
        }
        Err(error) => Err(error.into()),
    }
}

async fn search_products(ctx: &Context, term: &str) -> Result<Option<Product>> {
    let query = ListQuery::search(term);
    let key = list_cache_key("/products", &query);

    let spinner = ctx.output.spinner("Searching");

    let result = ctx
        .cache
        .get_or_fetch(key, &[Tag::Products], || ctx.products.list(query.clone()))
        .await;

    spinner.finish_and_clear();

    let page: Page<Product> = result?;

    if page.content.is_empty() {
        ctx.output.warn("No products matched");
        return Ok(None);
    }

    pick_product(page.content)
}

fn pick_product(mut matches: Vec<Product>) -> Result<Option<Product>> {
    let labels: Vec<String> = matches
        .iter()
        .map(|product| {
            format!(
                "{} ({}, {} {} left)",
                product.name,
                money::inr(product.price),
                product.stock_quantity,
                product.unit
            )
        })
        .collect();

    let picked = Select::new()
        .with_prompt("Product")
        .items(&labels)
        .default(0)
        .interact_opt()?;

    Ok(picked.and_then(|index| {
        (index < matches.len()).then(|| matches.swap_remove(index))
    }))
}

fn change_quantity(ctx: &Context, checkout: &mut Checkout) -> Result<()> {
    let Some(product_id) = pick_line(ctx, checkout, "Which line?")? else {
        return Ok(());
    };

    let Some(line) = checkout.cart().line(&product_id) else {
        return Ok(());
    };

    let current = line.quantity();

    let quantity: u32 = Input::new()
        .with_prompt("New quantity (0 removes the line)")
        .default(current)
        .interact_text()?;

    let delta = i64::from(quantity) - i64::from(current);

    checkout.cart_mut().adjust_quantity(&product_id, delta);

    Ok(())
}

fn set_discount(ctx: &Context, checkout: &mut Checkout) -> Result<()> {
    let Some(product_id) = pick_line(ctx, checkout, "Discount which line?")? else {
        return Ok(());
    };

    let raw: String = Input::new()
        .with_prompt("Discount per unit")
        .allow_empty(true)
        .interact_text()?;

    let Some(discount) = money::parse_amount(&raw) else {
        ctx.output.warn("Not a valid amount");
        return Ok(());
    };

    if let Err(error) = checkout.cart_mut().set_discount(&product_id, discount) {
        ctx.output.warn(&error.to_string());
    }

    Ok(())
}

fn remove_item(ctx: &Context, checkout: &mut Checkout) -> Result<()> {
    let Some(product_id) = pick_line(ctx, checkout, "Remove which line?")? else {
        return Ok(());
    };

    checkout.cart_mut().remove_line(&product_id);

    Ok(())
}

fn pick_line(ctx: &Context, checkout: &Checkout, prompt: &str) -> Result<Option<ProductId>> {
    if checkout.cart().is_empty() {
        ctx.output.warn("The cart is empty");
        return Ok(None);
    }

    let labels: Vec<String> = checkout
        .cart()
        .iter()
        .map(|line| format!("{} x{}", line.name(), line.quantity()))
        .collect();

    let picked = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;

    Ok(picked.and_then(|index| {
        checkout
            .cart()
            .iter()
            .nth(index)
            .map(|line| line.product_id().clone())
    }))
}

async fn pick_customer(ctx: &Context, checkout: &mut Checkout) -> Result<()> {
    let term: String = Input::new()
        .with_prompt("Customer name or phone (empty for walk-in)")
        .allow_empty(true)
        .interact_text()?;
    let term = term.trim();

    if term.is_empty() {
        checkout.set_customer(None);
        ctx.output.info("Walk-in sale");
        return Ok(());
    }

    let query = ListQuery::search(term);
    let key = list_cache_key("/customers", &query);

    let spinner = ctx.output.spinner("Searching customers");

    let result = ctx
        .cache
        .get_or_fetch(key, &[Tag::Customers], || ctx.customers.list(query.clone()))
        .await;

    spinner.finish_and_clear();

    let page: Page<Customer> = result?;

    if page.content.is_empty() {
        ctx.output.warn("No customers matched");
        return Ok(());
    }

    let labels: Vec<String> = page
        .content
        .iter()
        .map(|customer| {
            format!(
                "{} ({} due)",
                customer.name,
                money::inr(customer.credit_balance)
            )
        })
        .collect();

    let picked = Select::new()
        .with_prompt("Customer")
        .items(&labels)
        .default(0)
        .interact_opt()?;

    if let Some(customer) = picked.and_then(|index| page.content.get(index)) {
        checkout.set_customer(Some(customer.id.clone()));
        ctx.output.success(&format!("Customer: {}", customer.name));
    }

    Ok(())
}

fn pick_payment_method(ctx: &Context, checkout: &mut Checkout) -> Result<()> {
    let labels: Vec<&str> = PaymentMethod::ALL
        .iter()
        .map(|method| method.as_str())
        .collect();

    let picked = Select::new()
        .with_prompt("Payment method")
        .items(&labels)
        .default(0)
        .interact()?;

    if let Some(&method) = PaymentMethod::ALL.get(picked) {
        checkout.set_payment_method(method);

        if matches!(method, PaymentMethod::Credit | PaymentMethod::Partial)
            && checkout.customer().is_none()
        {
            ctx.output.warn("Credit needs a customer on the bill");
        }
    }

    Ok(())
}

fn set_amount_paid(ctx: &Context, checkout: &mut Checkout) -> Result<()> {
    let raw: String = Input::new()
        .with_prompt("Amount paid (empty pays in full)")
        .allow_empty(true)
        .interact_text()?;

    match money::parse_amount(&raw) {
        Some(amount) => {
            checkout.set_amount_paid(Some(amount));
            ctx.output
                .info(&format!("Amount paid set to {}", money::inr(amount)));
        }
        None if raw.trim().is_empty() => {
            checkout.set_amount_paid(None);
            ctx.output.info("Paying the full total");
        }
        None => ctx.output.warn("Not a valid amount"),
    }

    Ok(())
}

fn set_notes(checkout: &mut Checkout) -> Result<()> {
    let raw: String = Input::new()
        .with_prompt("Notes")
        .allow_empty(true)
        .interact_text()?;
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        checkout.set_notes(None);
    } else {
        checkout.set_notes(Some(trimmed.to_string()));
    }

    Ok(())
}

async fn submit(ctx: &Context, checkout: &mut Checkout) {
    let spinner = ctx.output.spinner("Recording the sale");

    let result = checkout.submit(&ctx.sales).await;

    spinner.finish_and_clear();

    match result {
        Ok(sale) => {
            ctx.cache.invalidate(Mutation::SaleCompleted);
            ctx.output
                .success(&format!("Sale recorded: {}", sale.bill_number));

            match receipt::render(&sale) {
                Ok(bill) => ctx.output.write(&bill),
                Err(error) => ctx
                    .output
                    .error(&format!("could not print the bill: {error}")),
            }
        }
        Err(error @ (CheckoutError::EmptyCart | CheckoutError::InFlight)) => {
            ctx.output.warn(&error.to_string());
        }
        Err(error @ CheckoutError::Api(_)) => {
            ctx.output.error(&error.to_string());
            ctx.output.info("The cart is unchanged; adjust and try again");
        }
    }
}

fn clear_cart(ctx: &Context, checkout: &mut Checkout) -> Result<()> {
    if checkout.cart().is_empty() {
        return Ok(());
    }

    let confirmed = Confirm::new()
        .with_prompt("Clear the cart and start over?")
        .default(false)
        .interact()?;

    if confirmed {
        *checkout = Checkout::new();
        ctx.output.info("Till cleared");
    }

    Ok(())
}

fn confirm_quit(checkout: &Checkout) -> Result<bool> {
    if checkout.cart().is_empty() {
        return Ok(true);
    }

    Ok(Confirm::new()
        .with_prompt("The cart still has items. Quit anyway?")
        .default(false)
        .interact()?)
}
