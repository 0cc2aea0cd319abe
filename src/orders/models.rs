//! Order Models

use std::{fmt, str::FromStr};

use jiff::civil::{Date, Time};
use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use crate::{pricing::RentalConfig, vehicles::VehicleClass};

/// Store-generated order line identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(i64);

impl OrderId {
    /// Wrap a raw row identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw row identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl ToSql for OrderId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for OrderId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Self)
    }
}

/// The views an order line can be visible in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Cart lines not yet checked out.
    Pending,

    /// Checkout-time copy of the cart used to summarise the payment.
    Temporary,

    /// Payment-confirmed order history.
    Placed,
}

impl Visibility {
    /// Persisted tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Visibility::Pending => "pending",
            Visibility::Temporary => "temporary",
            Visibility::Placed => "placed",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Visibility {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// A persisted order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// Store-generated identifier
    pub id: OrderId,

    /// Rented hours, `0..=11`
    pub hours: u32,

    /// Rented days, `0..=10`
    pub days: u32,

    /// Selected vehicle class
    pub vehicle: Option<VehicleClass>,

    /// Price computed from hours, days and vehicle when the line was built
    pub total_price: u64,

    /// Pickup date
    pub date: Date,

    /// Pickup time
    pub time: Time,

    /// Verified owner of a placed order
    pub owner_email: Option<String>,
}

impl OrderLine {
    /// The line's contents without its identity, for reinsertion.
    pub fn to_new(&self) -> NewOrderLine {
        NewOrderLine {
            hours: self.hours,
            days: self.days,
            vehicle: self.vehicle,
            total_price: self.total_price,
            date: self.date,
            time: self.time,
        }
    }
}

/// Order line data ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    /// Rented hours
    pub hours: u32,

    /// Rented days
    pub days: u32,

    /// Selected vehicle class
    pub vehicle: Option<VehicleClass>,

    /// Line total
    pub total_price: u64,

    /// Pickup date
    pub date: Date,

    /// Pickup time
    pub time: Time,
}

impl NewOrderLine {
    /// Build a line from a configuration, pricing it through the rate table.
    pub fn from_config(config: &RentalConfig, date: Date, time: Time) -> Self {
        Self {
            hours: config.hours(),
            days: config.days(),
            vehicle: config.vehicle(),
            total_price: config.total(),
            date,
            time,
        }
    }
}
