//! Order Records

use jiff::civil::{Date, Time};
use rusqlite::Row;

use crate::{
    orders::{OrderId, OrderLine, OrderStoreError},
    vehicles::VehicleClass,
};

/// Raw `order_lines` row, before date, time and class decoding.
#[derive(Debug, Clone)]
pub(crate) struct LineRecord {
    pub(crate) id: OrderId,
    pub(crate) hours: u32,
    pub(crate) days: u32,
    pub(crate) class_a: bool,
    pub(crate) class_b: bool,
    pub(crate) class_c: bool,
    pub(crate) total_price: u64,
    pub(crate) date: String,
    pub(crate) time: String,
    pub(crate) owner_email: Option<String>,
}

impl LineRecord {
    /// Read a record from a row selected with the `order_lines` column order.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            hours: row.get("hours")?,
            days: row.get("days")?,
            class_a: row.get("class_a")?,
            class_b: row.get("class_b")?,
            class_c: row.get("class_c")?,
            total_price: row.get("total_price")?,
            date: row.get("date")?,
            time: row.get("time")?,
            owner_email: row.get("owner_email")?,
        })
    }

    fn invalid(&self, reason: impl Into<String>) -> OrderStoreError {
        OrderStoreError::InvalidRow {
            id: self.id.get(),
            reason: reason.into(),
        }
    }
}

impl TryFrom<LineRecord> for OrderLine {
    type Error = OrderStoreError;

    fn try_from(record: LineRecord) -> Result<Self, Self::Error> {
        let vehicle = VehicleClass::from_flags(record.class_a, record.class_b, record.class_c)
            .map_err(|err| record.invalid(err.to_string()))?;

        let date = record
            .date
            .parse::<Date>()
            .map_err(|err| record.invalid(format!("date {:?}: {err}", record.date)))?;

        let time = record
            .time
            .parse::<Time>()
            .map_err(|err| record.invalid(format!("time {:?}: {err}", record.time)))?;

        Ok(OrderLine {
            id: record.id,
            hours: record.hours,
            days: record.days,
            vehicle,
            total_price: record.total_price,
            date,
            time,
            owner_email: record.owner_email,
        })
    }
}
