//! Cart
//!
//! The pending view of the order store, with its checkout total.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    orders::{OrderId, OrderLine, OrderStore, OrderStoreError},
    pricing::{TotalPriceError, to_money, total_price},
};

/// Errors loading or rendering a cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// Reading the pending lines failed.
    #[error(transparent)]
    Store(#[from] OrderStoreError),

    /// The total could not be expressed as money.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Writing the rendered cart failed.
    #[error("failed to write cart")]
    Io(#[from] io::Error),
}

/// Pending cart lines.
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<OrderLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Read the pending lines from the store.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] when the store cannot be read.
    pub fn load(store: &impl OrderStore, currency: &'static Currency) -> Result<Self, CartError> {
        Ok(Self {
            lines: store.list_pending()?,
            currency,
        })
    }

    /// Remove a line from the cart, dropping both its pending and temporary views.
    ///
    /// Returns `false` when neither view held the line.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError`] when the store write fails.
    pub fn remove(store: &mut impl OrderStore, id: OrderId) -> Result<bool, OrderStoreError> {
        let pending = store.delete(id)?;
        let temporary = store.delete_temporary(id)?;

        Ok(pending || temporary)
    }

    /// Lines in the cart, in the order they were added.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of the line totals.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError`] if the sum overflows.
    pub fn total(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        total_price(&self.lines, self.currency)
    }

    /// Render the cart as a table followed by its total.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the total overflows or writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), CartError> {
        if self.is_empty() {
            writeln!(out, "Your cart is empty")?;

            return Ok(());
        }

        let table = render_lines(&self.lines, self.currency)?;

        writeln!(out, "{table}")?;
        writeln!(out, "Total: {}", self.total()?)?;

        Ok(())
    }
}

/// Render order lines as a table with one row per line.
///
/// # Errors
///
/// Returns [`TotalPriceError`] if a line price cannot be expressed as money.
pub fn render_lines(
    lines: &[OrderLine],
    currency: &'static Currency,
) -> Result<String, TotalPriceError> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Vehicle", "Hours", "Days", "Date", "Time", "Price"]);

    for line in lines {
        let vehicle = line
            .vehicle
            .map_or_else(|| "-".to_string(), |vehicle| vehicle.to_string());

        builder.push_record([
            line.id.to_string(),
            vehicle,
            line.hours.to_string(),
            line.days.to_string(),
            line.date.to_string(),
            line.time.to_string(),
            to_money(line.total_price, currency)?.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Alignment::center());
    table.modify(Columns::new(2..4), Alignment::right());
    table.modify(Columns::new(6..7), Alignment::right());

    Ok(table.to_string())
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::{
        orders::{NewOrderLine, SqliteOrderStore},
        pricing::RentalConfig,
        vehicles::VehicleClass,
    };

    use super::*;

    fn new_line(config: RentalConfig) -> NewOrderLine {
        NewOrderLine::from_config(&config, date(2026, 10, 16), time(8, 15, 0, 0))
    }

    #[test]
    fn total_sums_pending_lines() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;
        store.stage(&new_line(RentalConfig::new(Some(VehicleClass::B), 3, 2)))?;
        store.stage(&new_line(RentalConfig::new(Some(VehicleClass::A), 1, 0)))?;

        let cart = Cart::load(&store, iso::KES)?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total()?, Money::from_major(5550, iso::KES));

        Ok(())
    }

    #[test]
    fn empty_cart_totals_zero() -> TestResult {
        let store = SqliteOrderStore::open_in_memory()?;

        let cart = Cart::load(&store, iso::KES)?;

        assert!(cart.is_empty());
        assert_eq!(cart.total()?, Money::from_major(0, iso::KES));

        Ok(())
    }

    #[test]
    fn remove_drops_both_views() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;
        let id = store.stage(&new_line(RentalConfig::new(Some(VehicleClass::C), 2, 0)))?;

        assert!(Cart::remove(&mut store, id)?);
        assert!(store.list_pending()?.is_empty());
        assert!(store.list_temporary()?.is_empty());
        assert!(!Cart::remove(&mut store, id)?);

        Ok(())
    }

    #[test]
    fn write_to_renders_lines_and_total() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;
        store.stage(&new_line(RentalConfig::new(Some(VehicleClass::B), 3, 2)))?;

        let cart = Cart::load(&store, iso::KES)?;
        let mut out = Vec::new();

        cart.write_to(&mut out)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("B (BMW)"));
        assert!(rendered.contains("2026-10-16"));
        assert!(rendered.contains(&format!("Total: {}", cart.total()?)));

        Ok(())
    }

    #[test]
    fn write_to_empty_cart() -> TestResult {
        let store = SqliteOrderStore::open_in_memory()?;
        let mut out = Vec::new();

        Cart::load(&store, iso::KES)?.write_to(&mut out)?;

        assert_eq!(String::from_utf8(out)?, "Your cart is empty\n");

        Ok(())
    }
}
