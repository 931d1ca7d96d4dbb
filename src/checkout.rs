//! Point-of-sale checkout.
//!
//! [`Checkout`] wraps the in-progress [`Cart`] together with the sale
//! selections made at the till: the optional customer, the payment method,
//! the amount tendered, and free-form notes. Submitting records the sale
//! through the sales service; local state is cleared only once the backend
//! confirms the sale, so a failed checkout loses nothing.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    api::{error::ApiError, sales::SalesService},
    cart::Cart,
    models::{
        customer::CustomerId,
        sale::{PaymentMethod, Sale, SaleLineRequest, SaleRequest},
    },
};

/// Errors that can occur when submitting a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to check out.
    #[error("the cart is empty")]
    EmptyCart,

    /// A previous checkout is still being processed.
    #[error("a checkout is already in progress")]
    InFlight,

    /// The sale was not recorded by the backend.
    #[error("sale could not be recorded: {0}")]
    Api(#[from] ApiError),
}

/// An in-progress sale at the till.
#[derive(Debug, Default)]
pub struct Checkout {
    cart: Cart,
    customer: Option<CustomerId>,
    payment_method: PaymentMethod,
    amount_paid: Option<Decimal>,
    notes: Option<String>,
    in_flight: bool,
}

impl Checkout {
    /// Start a fresh sale: empty cart, walk-in customer, cash payment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cart being rung up.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutable access to the cart being rung up.
    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// The customer the sale is for, if not a walk-in.
    #[must_use]
    pub fn customer(&self) -> Option<&CustomerId> {
        self.customer.as_ref()
    }

    /// Attach the sale to a customer, or `None` for a walk-in.
    pub fn set_customer(&mut self, customer: Option<CustomerId>) {
        self.customer = customer;
    }

    /// How the customer is paying.
    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Change how the customer is paying.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// The amount tendered, when entered explicitly.
    #[must_use]
    pub fn amount_paid(&self) -> Option<Decimal> {
        self.amount_paid
    }

    /// Record the amount tendered. `None` means the cart total is paid in
    /// full.
    pub fn set_amount_paid(&mut self, amount: Option<Decimal>) {
        self.amount_paid = amount;
    }

    /// Free-form notes to attach to the sale.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Attach free-form notes to the sale.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    /// Whether a submitted checkout is still waiting on the backend.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Record the sale through the sales service.
    ///
    /// On success the till is reset for the next customer: the cart is
    /// emptied and the customer, payment method, amount, and notes return
    /// to their defaults. On any error the till is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] without calling the backend
    /// when there is nothing to sell, [`CheckoutError::InFlight`] when a
    /// previous submission has not settled, and the underlying API error
    /// when the backend fails or rejects the sale.
    pub async fn submit<S>(&mut self, sales: &S) -> Result<Sale, CheckoutError>
    where
        S: SalesService + ?Sized,
    {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if self.in_flight {
            return Err(CheckoutError::InFlight);
        }

        let request = self.request();

        self.in_flight = true;

        let result = {
            let _guard = InFlightGuard {
                flag: &mut self.in_flight,
            };

            sales.create(request).await
        };

        let sale = result?;

        self.reset();

        Ok(sale)
    }

    fn request(&self) -> SaleRequest {
        let items = self
            .cart
            .iter()
            .map(|line| SaleLineRequest {
                product_id: line.product_id().clone(),
                quantity: line.quantity(),
                discount: line.discount(),
            })
            .collect();

        SaleRequest {
            customer_id: self.customer.clone(),
            items,
            payment_method: self.payment_method,
            amount_paid: self
                .amount_paid
                .unwrap_or_else(|| self.cart.totals().total),
            notes: self.notes.clone(),
        }
    }

    fn reset(&mut self) {
        self.cart.clear();
        self.customer = None;
        self.payment_method = PaymentMethod::default();
        self.amount_paid = None;
        self.notes = None;
    }
}

/// Clears the in-flight flag even when the submission future is dropped
/// mid-await.
struct InFlightGuard<'a> {
    flag: &'a mut bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use testresult::TestResult;

    use crate::{
        api::sales::MockSalesService,
        models::{
            page::Page,
            product::Product,
            sale::{SaleId, SaleListQuery},
        },
    };

    use super::*;

    fn product(id: &str, name: &str, price: u32) -> Product {
        serde_json::from_str(&format!(
            r#"{{
                "id": "{id}",
                "name": "{name}",
                "price": {price},
                "stockQuantity": 100,
                "minStockLevel": 10,
                "unit": "pcs",
                "status": "ACTIVE",
                "isLowStock": false,
                "isExpiringSoon": false,
                "createdAt": "2026-01-05T09:00:00Z",
                "updatedAt": "2026-01-05T09:00:00Z"
            }}"#
        ))
        .expect("product fixture should decode")
    }

    fn recorded_sale() -> Sale {
        serde_json::from_str(
            r#"{
                "id": "s-1",
                "billNumber": "BILL-0042",
                "items": [],
                "subtotal": 23,
                "discountAmount": 2,
                "taxAmount": 0,
                "totalAmount": 23,
                "amountPaid": 23,
                "creditAmount": 0,
                "paymentMethod": "CASH",
                "paymentStatus": "PAID",
                "createdAt": "2026-08-21T10:15:00Z",
                "updatedAt": "2026-08-21T10:15:00Z"
            }"#,
        )
        .expect("sale fixture should decode")
    }

    /// Worked example: A at 10 with a discount of 1, twice, plus B at 5.
    fn ring_up(checkout: &mut Checkout) -> TestResult {
        let a = product("p-a", "Product A", 10);
        let b = product("p-b", "Product B", 5);

        checkout.cart_mut().add_line(&a);
        checkout.cart_mut().add_line(&a);
        checkout.cart_mut().add_line(&b);
        checkout.cart_mut().set_discount(&a.id, Decimal::ONE)?;

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_without_a_request() {
        let mut sales = MockSalesService::new();
        sales.expect_create().never();

        let mut checkout = Checkout::new();

        let result = checkout.submit(&sales).await;

        assert!(
            matches!(result, Err(CheckoutError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
    }

    #[tokio::test]
    async fn request_carries_the_cart_and_defaults_the_amount() -> TestResult {
        let mut sales = MockSalesService::new();
        sales
            .expect_create()
            .once()
            .withf(|request| {
                let quantities: Vec<u32> =
                    request.items.iter().map(|item| item.quantity).collect();

                request.customer_id.is_none()
                    && request.payment_method == PaymentMethod::Cash
                    && request.amount_paid == Decimal::from(23)
                    && quantities == vec![2, 1]
                    && request.notes.is_none()
            })
            .return_once(|_| Ok(recorded_sale()));

        let mut checkout = Checkout::new();
        ring_up(&mut checkout)?;

        checkout.submit(&sales).await?;

        Ok(())
    }

    #[tokio::test]
    async fn explicit_amount_is_sent_as_entered() -> TestResult {
        let mut sales = MockSalesService::new();
        sales
            .expect_create()
            .once()
            .withf(|request| request.amount_paid == Decimal::from(20))
            .return_once(|_| Ok(recorded_sale()));

        let mut checkout = Checkout::new();
        ring_up(&mut checkout)?;
        checkout.set_payment_method(PaymentMethod::Partial);
        checkout.set_amount_paid(Some(Decimal::from(20)));

        checkout.submit(&sales).await?;

        Ok(())
    }

    #[tokio::test]
    async fn successful_checkout_resets_the_till() -> TestResult {
        let mut sales = MockSalesService::new();
        sales
            .expect_create()
            .once()
            .return_once(|_| Ok(recorded_sale()));

        let mut checkout = Checkout::new();
        ring_up(&mut checkout)?;
        checkout.set_customer(Some(CustomerId::from("c-7")));
        checkout.set_payment_method(PaymentMethod::Upi);
        checkout.set_amount_paid(Some(Decimal::from(25)));
        checkout.set_notes(Some("regular".to_string()));

        let sale = checkout.submit(&sales).await?;

        assert_eq!(sale.bill_number, "BILL-0042");
        assert!(checkout.cart().is_empty());
        assert!(checkout.customer().is_none());
        assert_eq!(checkout.payment_method(), PaymentMethod::Cash);
        assert!(checkout.amount_paid().is_none());
        assert!(checkout.notes().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn failed_checkout_preserves_the_till() -> TestResult {
        let mut sales = MockSalesService::new();
        sales.expect_create().once().return_once(|_| {
            Err(ApiError::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        });

        let mut checkout = Checkout::new();
        ring_up(&mut checkout)?;
        checkout.set_customer(Some(CustomerId::from("c-7")));
        checkout.set_payment_method(PaymentMethod::Credit);

        let result = checkout.submit(&sales).await;

        assert!(
            matches!(result, Err(CheckoutError::Api(_))),
            "expected Api error, got {result:?}"
        );
        assert_eq!(checkout.cart().len(), 2);
        assert_eq!(checkout.customer(), Some(&CustomerId::from("c-7")));
        assert_eq!(checkout.payment_method(), PaymentMethod::Credit);
        assert!(!checkout.is_in_flight());

        Ok(())
    }

    /// Sales service whose create call never settles.
    struct NeverSettles;

    #[async_trait]
    impl SalesService for NeverSettles {
        async fn create(&self, _sale: SaleRequest) -> Result<Sale, ApiError> {
            std::future::pending().await
        }

        async fn list(&self, _query: SaleListQuery) -> Result<Page<Sale>, ApiError> {
            std::future::pending().await
        }

        async fn get(&self, _id: &SaleId) -> Result<Sale, ApiError> {
            std::future::pending().await
        }

        async fn by_bill(&self, _bill_number: &str) -> Result<Sale, ApiError> {
            std::future::pending().await
        }

        async fn today(&self) -> Result<Vec<Sale>, ApiError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn dropped_submission_releases_the_in_flight_latch() -> TestResult {
        let sales = NeverSettles;
        let mut checkout = Checkout::new();
        ring_up(&mut checkout)?;

        {
            let submit = checkout.submit(&sales);
            tokio::pin!(submit);

            let poll = tokio::time::timeout(Duration::from_millis(10), &mut submit).await;

            assert!(poll.is_err(), "submission should still be pending");
        }

        assert!(!checkout.is_in_flight());
        assert_eq!(checkout.cart().len(), 2, "cart should be preserved");

        Ok(())
    }
}
