//! Rental Wheels
//!
//! The local core of the Rental Wheels vehicle-rental storefront: rate-table
//! pricing, a `SQLite`-backed order store with pending, temporary and placed
//! views, booking validation, the cart, and checkout through a pluggable
//! payment gateway.

pub mod booking;
pub mod cart;
pub mod checkout;
pub mod identity;
pub mod logging;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod settings;
pub mod validation;
pub mod vehicles;
