//! Order Store

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::{
    orders::{
        errors::OrderStoreError,
        models::{NewOrderLine, OrderId, OrderLine, Visibility},
        records::LineRecord,
    },
    vehicles::VehicleClass,
};

const SCHEMA_SQL: &str = include_str!("sql/schema.sql");
const CREATE_LINE_SQL: &str = include_str!("sql/create_line.sql");
const ADD_VIEW_SQL: &str = include_str!("sql/add_view.sql");
const REMOVE_VIEW_SQL: &str = include_str!("sql/remove_view.sql");
const PURGE_LINE_SQL: &str = include_str!("sql/purge_line.sql");
const GET_CART_LINE_SQL: &str = include_str!("sql/get_cart_line.sql");
const LIST_VIEW_SQL: &str = include_str!("sql/list_view.sql");

/// Local persistence for order lines.
///
/// Operations run synchronously on the calling thread. Writes either fully
/// apply or fail with [`OrderStoreError::Storage`]; nothing is retried.
#[cfg_attr(test, mockall::automock)]
pub trait OrderStore {
    /// Append a line to the pending cart.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::Storage`] when the write fails.
    fn insert(&mut self, line: &NewOrderLine) -> Result<OrderId, OrderStoreError>;

    /// Append a line to the temporary checkout view.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::Storage`] when the write fails.
    fn insert_temporary(&mut self, line: &NewOrderLine) -> Result<OrderId, OrderStoreError>;

    /// Append a placed order owned by `owner_email` to the order history.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::Storage`] when the write fails.
    fn insert_placed_order(
        &mut self,
        owner_email: &str,
        line: &NewOrderLine,
    ) -> Result<OrderId, OrderStoreError>;

    /// Write a confirmed configuration once, visible as both pending and temporary.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::Storage`] when the write fails.
    fn stage(&mut self, line: &NewOrderLine) -> Result<OrderId, OrderStoreError>;

    /// All pending cart lines, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error when the read fails or a row cannot be decoded.
    fn list_pending(&self) -> Result<Vec<OrderLine>, OrderStoreError>;

    /// All temporary checkout lines, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error when the read fails or a row cannot be decoded.
    fn list_temporary(&self) -> Result<Vec<OrderLine>, OrderStoreError>;

    /// All placed orders, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error when the read fails or a row cannot be decoded.
    fn list_placed(&self) -> Result<Vec<OrderLine>, OrderStoreError>;

    /// Remove a line from the pending cart. Returns `false` when it was not there.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::Storage`] when the write fails.
    fn delete(&mut self, id: OrderId) -> Result<bool, OrderStoreError>;

    /// Remove a line from the temporary view. Returns `false` when it was not there.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::Storage`] when the write fails.
    fn delete_temporary(&mut self, id: OrderId) -> Result<bool, OrderStoreError>;

    /// Record a pending or temporary line as a placed order owned by `owner_email`,
    /// removing it from the cart views.
    ///
    /// Returns the placed order's id, or `None` when no cart line has `id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the read or write fails.
    fn promote(
        &mut self,
        id: OrderId,
        owner_email: &str,
    ) -> Result<Option<OrderId>, OrderStoreError>;

    /// Promote several cart lines as one unit: either every line is placed or
    /// none is.
    ///
    /// Returns the placed order ids in the order of `ids`, skipping ids that
    /// are not cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error when any read or write fails; no line is placed then.
    fn promote_all(
        &mut self,
        ids: &[OrderId],
        owner_email: &str,
    ) -> Result<Vec<OrderId>, OrderStoreError>;
}

/// [`OrderStore`] backed by a local `SQLite` database.
#[derive(Debug)]
pub struct SqliteOrderStore {
    conn: Connection,
}

impl SqliteOrderStore {
    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::Storage`] if the database cannot be opened or
    /// its schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, OrderStoreError> {
        let path = path.as_ref();

        info!(path = %path.display(), "opening order store");

        Self::with_connection(Connection::open(path)?)
    }

    /// Open a store that lives only as long as the returned value.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::Storage`] if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, OrderStoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, OrderStoreError> {
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self { conn })
    }

    fn create(
        &mut self,
        line: &NewOrderLine,
        owner_email: Option<&str>,
        views: &[Visibility],
    ) -> Result<OrderId, OrderStoreError> {
        let tx = self.conn.transaction()?;

        let id = create_line(&tx, line, owner_email, views)?;

        tx.commit()?;

        Ok(id)
    }

    fn remove_view(&mut self, id: OrderId, visibility: Visibility) -> Result<bool, OrderStoreError> {
        let tx = self.conn.transaction()?;

        let removed = tx.execute(REMOVE_VIEW_SQL, params![id, visibility])? > 0;
        tx.execute(PURGE_LINE_SQL, [id])?;

        tx.commit()?;

        if removed {
            debug!(%id, %visibility, "order line removed from view");
        } else {
            debug!(%id, %visibility, "order line not in view; nothing removed");
        }

        Ok(removed)
    }

    fn list_view(&self, visibility: Visibility) -> Result<Vec<OrderLine>, OrderStoreError> {
        let mut statement = self.conn.prepare_cached(LIST_VIEW_SQL)?;

        let records = statement
            .query_map([visibility], LineRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        records.into_iter().map(OrderLine::try_from).collect()
    }
}

fn create_line(
    conn: &Connection,
    line: &NewOrderLine,
    owner_email: Option<&str>,
    views: &[Visibility],
) -> Result<OrderId, OrderStoreError> {
    let (class_a, class_b, class_c) = VehicleClass::flags(line.vehicle);

    conn.execute(
        CREATE_LINE_SQL,
        params![
            line.hours,
            line.days,
            class_a,
            class_b,
            class_c,
            line.total_price,
            line.date.to_string(),
            line.time.to_string(),
            owner_email,
        ],
    )?;

    let id = OrderId::new(conn.last_insert_rowid());

    for visibility in views {
        conn.execute(ADD_VIEW_SQL, params![id, visibility])?;
    }

    debug!(%id, ?views, total_price = line.total_price, "order line written");

    Ok(id)
}

impl OrderStore for SqliteOrderStore {
    fn insert(&mut self, line: &NewOrderLine) -> Result<OrderId, OrderStoreError> {
        self.create(line, None, &[Visibility::Pending])
    }

    fn insert_temporary(&mut self, line: &NewOrderLine) -> Result<OrderId, OrderStoreError> {
        self.create(line, None, &[Visibility::Temporary])
    }

    fn insert_placed_order(
        &mut self,
        owner_email: &str,
        line: &NewOrderLine,
    ) -> Result<OrderId, OrderStoreError> {
        self.create(line, Some(owner_email), &[Visibility::Placed])
    }

    fn stage(&mut self, line: &NewOrderLine) -> Result<OrderId, OrderStoreError> {
        self.create(line, None, &[Visibility::Pending, Visibility::Temporary])
    }

    fn list_pending(&self) -> Result<Vec<OrderLine>, OrderStoreError> {
        self.list_view(Visibility::Pending)
    }

    fn list_temporary(&self) -> Result<Vec<OrderLine>, OrderStoreError> {
        self.list_view(Visibility::Temporary)
    }

    fn list_placed(&self) -> Result<Vec<OrderLine>, OrderStoreError> {
        self.list_view(Visibility::Placed)
    }

    fn delete(&mut self, id: OrderId) -> Result<bool, OrderStoreError> {
        self.remove_view(id, Visibility::Pending)
    }

    fn delete_temporary(&mut self, id: OrderId) -> Result<bool, OrderStoreError> {
        self.remove_view(id, Visibility::Temporary)
    }

    fn promote(
        &mut self,
        id: OrderId,
        owner_email: &str,
    ) -> Result<Option<OrderId>, OrderStoreError> {
        let tx = self.conn.transaction()?;
        let placed = place_line(&tx, id, owner_email)?;

        tx.commit()?;

        Ok(placed)
    }

    fn promote_all(
        &mut self,
        ids: &[OrderId],
        owner_email: &str,
    ) -> Result<Vec<OrderId>, OrderStoreError> {
        let tx = self.conn.transaction()?;
        let mut placed = Vec::with_capacity(ids.len());

        for id in ids {
            if let Some(order) = place_line(&tx, *id, owner_email)? {
                placed.push(order);
            }
        }

        tx.commit()?;

        info!(orders = placed.len(), "cart lines placed");

        Ok(placed)
    }
}

/// Copy a cart line into the placed view and drop its cart views.
fn place_line(
    conn: &Connection,
    id: OrderId,
    owner_email: &str,
) -> Result<Option<OrderId>, OrderStoreError> {
    let Some(record) = conn
        .query_row(GET_CART_LINE_SQL, [id], LineRecord::from_row)
        .optional()?
    else {
        return Ok(None);
    };

    let line = OrderLine::try_from(record)?;
    let placed = create_line(conn, &line.to_new(), Some(owner_email), &[Visibility::Placed])?;

    conn.execute(REMOVE_VIEW_SQL, params![id, Visibility::Pending])?;
    conn.execute(REMOVE_VIEW_SQL, params![id, Visibility::Temporary])?;
    conn.execute(PURGE_LINE_SQL, [id])?;

    info!(%id, %placed, "order line placed");

    Ok(Some(placed))
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};
    use testresult::TestResult;

    use super::*;

    fn line(hours: u32, days: u32, vehicle: VehicleClass) -> NewOrderLine {
        NewOrderLine {
            hours,
            days,
            vehicle: Some(vehicle),
            total_price: crate::pricing::price(vehicle, hours, days),
            date: date(2026, 10, 16),
            time: time(10, 0, 0, 0),
        }
    }

    fn ids(lines: &[OrderLine]) -> Vec<OrderId> {
        lines.iter().map(|line| line.id).collect()
    }

    #[test]
    fn insert_is_pending_only() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;

        let id = store.insert(&line(1, 0, VehicleClass::A))?;

        assert_eq!(ids(&store.list_pending()?), vec![id]);
        assert!(store.list_temporary()?.is_empty());
        assert!(store.list_placed()?.is_empty());

        Ok(())
    }

    #[test]
    fn insert_then_delete_leaves_temporary_alone() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;

        let pending = store.insert(&line(2, 1, VehicleClass::B))?;
        let temporary = store.insert_temporary(&line(2, 1, VehicleClass::B))?;

        assert!(store.delete(pending)?);

        assert!(store.list_pending()?.is_empty());
        assert_eq!(ids(&store.list_temporary()?), vec![temporary]);

        Ok(())
    }

    #[test]
    fn identical_inserts_get_distinct_ids() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;

        let first = store.insert(&line(3, 2, VehicleClass::B))?;
        let second = store.insert(&line(3, 2, VehicleClass::B))?;

        assert_ne!(first, second);
        assert_eq!(ids(&store.list_pending()?), vec![first, second]);

        Ok(())
    }

    #[test]
    fn delete_missing_id_is_noop() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;
        let id = store.insert(&line(1, 1, VehicleClass::C))?;

        assert!(!store.delete(OrderId::new(999))?);
        assert!(!store.delete_temporary(id)?);
        assert_eq!(ids(&store.list_pending()?), vec![id]);

        Ok(())
    }

    #[test]
    fn staged_line_is_pending_and_temporary() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;

        let id = store.stage(&line(4, 0, VehicleClass::A))?;

        assert_eq!(ids(&store.list_pending()?), vec![id]);
        assert_eq!(ids(&store.list_temporary()?), vec![id]);

        assert!(store.delete(id)?);

        assert!(store.list_pending()?.is_empty());
        assert_eq!(ids(&store.list_temporary()?), vec![id]);

        assert!(store.delete_temporary(id)?);

        assert!(store.list_temporary()?.is_empty());

        Ok(())
    }

    #[test]
    fn ids_are_not_reused_after_delete() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;

        let first = store.insert(&line(1, 0, VehicleClass::A))?;
        store.delete(first)?;
        let second = store.insert(&line(1, 0, VehicleClass::A))?;

        assert_ne!(first, second);

        Ok(())
    }

    #[test]
    fn placed_order_keeps_owner() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;

        let id = store.insert_placed_order("rider@example.com", &line(0, 3, VehicleClass::C))?;

        let placed = store.list_placed()?;

        assert_eq!(ids(&placed), vec![id]);
        assert_eq!(
            placed.first().and_then(|l| l.owner_email.as_deref()),
            Some("rider@example.com")
        );
        assert!(store.list_pending()?.is_empty());

        Ok(())
    }

    #[test]
    fn promote_moves_line_to_history() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;
        let staged = line(5, 1, VehicleClass::B);
        let id = store.stage(&staged)?;

        let placed = store.promote(id, "rider@example.com")?;

        assert!(placed.is_some());
        assert!(store.list_pending()?.is_empty());
        assert!(store.list_temporary()?.is_empty());

        let history = store.list_placed()?;
        let order = history.first();

        assert_eq!(history.len(), 1);
        assert_eq!(order.map(OrderLine::to_new), Some(staged));
        assert_eq!(order.map(|o| o.id), placed);
        assert_eq!(
            order.and_then(|o| o.owner_email.as_deref()),
            Some("rider@example.com")
        );

        Ok(())
    }

    #[test]
    fn promote_unknown_line_is_none() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;
        let placed = store.insert_placed_order("rider@example.com", &line(1, 0, VehicleClass::A))?;

        assert_eq!(store.promote(OrderId::new(404), "rider@example.com")?, None);
        assert_eq!(store.promote(placed, "rider@example.com")?, None);
        assert_eq!(store.list_placed()?.len(), 1);

        Ok(())
    }

    #[test]
    fn rejects_two_vehicle_flags_at_storage() -> TestResult {
        let store = SqliteOrderStore::open_in_memory()?;

        let result = store.conn.execute(
            "INSERT INTO order_lines (hours, days, class_a, class_b, class_c, total_price, date, time) \
             VALUES (1, 1, 1, 1, 0, 0, '2026-10-16', '10:00:00')",
            [],
        );

        assert!(result.is_err());

        Ok(())
    }

    #[test]
    fn undecodable_row_surfaces_invalid_row() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;
        let id = store.insert(&line(1, 0, VehicleClass::A))?;

        store.conn.execute(
            "UPDATE order_lines SET date = 'not a date' WHERE id = ?1",
            [id],
        )?;

        assert!(matches!(
            store.list_pending(),
            Err(OrderStoreError::InvalidRow { .. })
        ));

        Ok(())
    }

    #[test]
    fn promote_all_places_every_cart_line() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;
        let first = store.stage(&line(2, 0, VehicleClass::A))?;
        let second = store.stage(&line(0, 2, VehicleClass::C))?;

        let placed = store.promote_all(&[first, OrderId::new(404), second], "rider@example.com")?;

        assert_eq!(placed.len(), 2);
        assert!(store.list_temporary()?.is_empty());
        assert_eq!(
            store.list_placed()?.into_iter().map(|o| o.id).collect::<Vec<_>>(),
            placed
        );

        Ok(())
    }

    #[test]
    fn promote_all_places_nothing_when_a_line_fails() -> TestResult {
        let mut store = SqliteOrderStore::open_in_memory()?;
        let good = store.stage(&line(2, 0, VehicleClass::A))?;
        let bad = store.stage(&line(0, 2, VehicleClass::C))?;

        store.conn.execute(
            "UPDATE order_lines SET time = 'noon' WHERE id = ?1",
            [bad],
        )?;

        let result = store.promote_all(&[good, bad], "rider@example.com");

        assert!(matches!(result, Err(OrderStoreError::InvalidRow { .. })));
        assert!(store.list_placed()?.is_empty());
        assert_eq!(
            store
                .conn
                .query_row("SELECT COUNT(*) FROM order_line_views WHERE line_id = ?1", [good], |row| {
                    row.get::<_, i64>(0)
                })?,
            2
        );

        Ok(())
    }
}
