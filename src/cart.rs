//! Checkout cart.
//!
//! An ordered, in-memory collection of pending line items, owned by a single
//! point-of-sale session and never persisted. Prices and names are snapshots
//! of the product's display data at add time; the server re-prices every
//! line at transaction time.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::product::{Product, ProductId};

/// Errors related to cart mutation.
#[derive(Debug, Error)]
pub enum CartError {
    /// A negative per-unit discount was requested.
    #[error("discount must not be negative, got {0}")]
    NegativeDiscount(Decimal),
}

/// One product's pending purchase entry.
///
/// Invariants: at most one line per product, and `quantity` is always
/// positive; a line reaching zero quantity is removed from the cart rather
/// than kept.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product_id: ProductId,
    name: String,
    unit_price: Decimal,
    quantity: u32,
    discount: Decimal,
}

impl CartLine {
    /// The product this line sells.
    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Product name snapshotted at add time.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price snapshotted at add time.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Units requested.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Per-unit discount.
    #[must_use]
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Line total after discount.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        (self.unit_price - self.discount) * Decimal::from(self.quantity)
    }
}

/// Derived totals over a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of `unit_price x quantity` over all lines.
    pub subtotal: Decimal,

    /// Sum of `discount x quantity` over all lines.
    pub discount_total: Decimal,

    /// `subtotal - discount_total`. No tax term is applied.
    pub total: Decimal,
}

/// Checkout cart.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of the given product.
    ///
    /// An existing line for the product has its quantity incremented;
    /// otherwise a new line is appended with quantity 1, discount 0, and
    /// the product's name and price snapshotted. Always succeeds.
    pub fn add_line(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }

        self.lines.push(CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            discount: Decimal::ZERO,
        });
    }

    /// Add `delta` (possibly negative) to the matching line's quantity,
    /// clamped to a minimum of zero; a resulting zero removes the line.
    /// A no-op when no line matches `product_id`.
    pub fn adjust_quantity(&mut self, product_id: &ProductId, delta: i64) {
        let Some(line) = self.line_mut(product_id) else {
            return;
        };

        let adjusted = i64::from(line.quantity).saturating_add(delta).max(0);

        if adjusted == 0 {
            self.remove_line(product_id);
        } else {
            line.quantity = u32::try_from(adjusted).unwrap_or(u32::MAX);
        }
    }

    /// Delete the matching line unconditionally; a no-op when absent.
    pub fn remove_line(&mut self, product_id: &ProductId) {
        self.lines.retain(|line| line.product_id != *product_id);
    }

    /// Set the per-unit discount on the matching line; a no-op when absent.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NegativeDiscount` if `discount` is negative.
    pub fn set_discount(
        &mut self,
        product_id: &ProductId,
        discount: Decimal,
    ) -> Result<(), CartError> {
        if discount.is_sign_negative() && !discount.is_zero() {
            return Err(CartError::NegativeDiscount(discount));
        }

        if let Some(line) = self.line_mut(product_id) {
            line.discount = discount;
        }

        Ok(())
    }

    /// Derive subtotal, discount total, and total over all lines.
    ///
    /// Accumulation is exact decimal arithmetic; rounding to the minor unit
    /// happens only at display time.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let mut subtotal = Decimal::ZERO;
        let mut discount_total = Decimal::ZERO;

        for line in &self.lines {
            let quantity = Decimal::from(line.quantity);

            subtotal += line.unit_price * quantity;
            discount_total += line.discount * quantity;
        }

        CartTotals {
            subtotal,
            discount_total,
            total: subtotal - discount_total,
        }
    }

    /// Drop all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Get the line for a product, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == *product_id)
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == *product_id)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, name: &str, price: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.to_string(),
            description: None,
            category: None,
            price: Decimal::from(price),
            cost_price: None,
            stock_quantity: 100,
            min_stock_level: 10,
            unit: "pcs".to_string(),
            barcode: None,
            expiry_date: None,
            status: "ACTIVE".to_string(),
            is_low_stock: false,
            is_expiring_soon: false,
            created_at: "2026-01-01T00:00:00".to_string(),
            updated_at: "2026-01-01T00:00:00".to_string(),
        }
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new();

        assert!(cart.is_empty());
        assert_eq!(cart.len(), 0);
    }

    #[test]
    fn add_line_snapshots_product_data() {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));

        let line = cart.line(&ProductId::from("prd-a")).expect("line added");

        assert_eq!(line.name(), "Dal");
        assert_eq!(line.unit_price(), Decimal::from(10));
        assert_eq!(line.quantity(), 1);
        assert_eq!(line.discount(), Decimal::ZERO);
    }

    #[test]
    fn adding_same_product_twice_accumulates_quantity() {
        let mut cart = Cart::new();
        let dal = product("prd-a", "Dal", 10);

        cart.add_line(&dal);
        cart.add_line(&dal);

        assert_eq!(cart.len(), 1, "no duplicate line for the same product");
        assert_eq!(
            cart.line(&ProductId::from("prd-a")).map(CartLine::quantity),
            Some(2)
        );
    }

    #[test]
    fn add_twice_equals_add_then_adjust_up() {
        let dal = product("prd-a", "Dal", 10);

        let mut added_twice = Cart::new();
        added_twice.add_line(&dal);
        added_twice.add_line(&dal);

        let mut adjusted = Cart::new();
        adjusted.add_line(&dal);
        adjusted.adjust_quantity(&ProductId::from("prd-a"), 1);

        assert_eq!(
            added_twice.line(&ProductId::from("prd-a")),
            adjusted.line(&ProductId::from("prd-a"))
        );
    }

    #[test]
    fn adjust_to_zero_removes_line() {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));
        cart.adjust_quantity(&ProductId::from("prd-a"), -1);

        assert!(cart.is_empty());
    }

    #[test]
    fn adjust_below_zero_behaves_like_zero() {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));
        cart.adjust_quantity(&ProductId::from("prd-a"), -5);

        assert!(cart.is_empty());
    }

    #[test]
    fn adjust_missing_line_is_a_no_op() {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));
        cart.adjust_quantity(&ProductId::from("prd-b"), 3);

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.line(&ProductId::from("prd-a")).map(CartLine::quantity),
            Some(1)
        );
        assert!(cart.line(&ProductId::from("prd-b")).is_none());
    }

    #[test]
    fn remove_line_deletes_only_the_match() {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));
        cart.add_line(&product("prd-b", "Rice", 5));
        cart.remove_line(&ProductId::from("prd-a"));

        assert_eq!(cart.len(), 1);
        assert!(cart.line(&ProductId::from("prd-b")).is_some());
    }

    #[test]
    fn remove_missing_line_is_a_no_op() {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));
        cart.remove_line(&ProductId::from("prd-b"));

        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn set_discount_rejects_negative() {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));

        let result = cart.set_discount(&ProductId::from("prd-a"), Decimal::from(-1));

        assert!(
            matches!(result, Err(CartError::NegativeDiscount(_))),
            "expected NegativeDiscount, got {result:?}"
        );
    }

    #[test]
    fn set_discount_on_missing_line_is_a_no_op() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));
        cart.set_discount(&ProductId::from("prd-b"), Decimal::ONE)?;

        assert_eq!(
            cart.line(&ProductId::from("prd-a")).map(CartLine::discount),
            Some(Decimal::ZERO)
        );

        Ok(())
    }

    #[test]
    fn totals_match_worked_example() -> TestResult {
        let mut cart = Cart::new();
        let a = product("prd-a", "A", 10);

        cart.add_line(&a);
        cart.add_line(&a);
        cart.set_discount(&ProductId::from("prd-a"), Decimal::ONE)?;
        cart.add_line(&product("prd-b", "B", 5));

        let totals = cart.totals();

        assert_eq!(totals.subtotal, Decimal::from(25));
        assert_eq!(totals.discount_total, Decimal::from(2));
        assert_eq!(totals.total, Decimal::from(23));

        Ok(())
    }

    #[test]
    fn totals_are_idempotent() {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));
        cart.add_line(&product("prd-b", "Rice", 5));

        assert_eq!(cart.totals(), cart.totals());
    }

    #[test]
    fn totals_identity_holds() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));
        cart.adjust_quantity(&ProductId::from("prd-a"), 4);
        cart.set_discount(&ProductId::from("prd-a"), "0.5".parse()?)?;

        let totals = cart.totals();

        assert_eq!(totals.total, totals.subtotal - totals.discount_total);

        Ok(())
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let totals = Cart::new().totals();

        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.discount_total, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn line_total_subtracts_discount_per_unit() -> TestResult {
        let mut cart = Cart::new();
        let a = product("prd-a", "A", 10);

        cart.add_line(&a);
        cart.add_line(&a);
        cart.set_discount(&ProductId::from("prd-a"), Decimal::ONE)?;

        let line = cart.line(&ProductId::from("prd-a")).expect("line present");

        assert_eq!(line.line_total(), Decimal::from(18));

        Ok(())
    }

    #[test]
    fn clear_drops_all_lines() {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));
        cart.add_line(&product("prd-b", "Rice", 5));
        cart.clear();

        assert!(cart.is_empty());
    }

    #[test]
    fn iter_preserves_insertion_order() {
        let mut cart = Cart::new();

        cart.add_line(&product("prd-a", "Dal", 10));
        cart.add_line(&product("prd-b", "Rice", 5));
        cart.add_line(&product("prd-c", "Oil", 120));

        let ids: Vec<&str> = cart.iter().map(|line| line.product_id().as_str()).collect();

        assert_eq!(ids, vec!["prd-a", "prd-b", "prd-c"]);
    }
}
