//! Kirana
//!
//! Terminal point-of-sale and back-office client for the Kirana Store REST API.
//! The remote API owns all business logic, persistence, and authorization; this
//! crate keeps the local checkout cart, wraps the remote endpoints in a typed
//! client, and renders receipts and tables for the terminal.

pub mod api;
pub mod cache;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod models;
pub mod money;
pub mod receipt;
pub mod session;
