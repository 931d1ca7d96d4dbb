//! Wire models for the Kirana Store REST API.
//!
//! Field names follow the server's camelCase JSON. Monetary values are
//! decimals, exact on the wire; server-reported timestamps stay opaque
//! strings because the server owns their format and the client only
//! displays them.

pub mod credit;
pub mod customer;
pub mod dashboard;
pub mod page;
pub mod product;
pub mod sale;
pub mod user;
