//! Booking
//!
//! Turns a confirmed configuration screen into a priced cart line.

use jiff::civil::{Date, Time};
use thiserror::Error;
use tracing::debug;

use crate::{
    identity::{DocumentKind, IdentityDocument},
    orders::{NewOrderLine, OrderId, OrderStore, OrderStoreError},
    pricing::RentalConfig,
    validation::ValidationError,
};

/// Errors placing a booking into the cart.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The submission needs correcting; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The line could not be written.
    #[error(transparent)]
    Store(#[from] OrderStoreError),
}

/// A configuration screen submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Kind of identification presented
    pub document_kind: DocumentKind,

    /// Identification number as typed
    pub document_number: String,

    /// Vehicle and duration selection
    pub config: RentalConfig,

    /// Pickup date
    pub date: Date,

    /// Pickup time
    pub time: Time,
}

impl BookingRequest {
    /// Validate the submission and build the priced line it describes.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::DocumentTooShort`]: the identification number is empty or too short.
    /// - [`ValidationError::NoVehicleSelected`]: no vehicle class was chosen.
    /// - [`ValidationError::ZeroDuration`]: hours and days are both zero.
    pub fn to_order_line(&self) -> Result<NewOrderLine, ValidationError> {
        IdentityDocument::new(self.document_kind, &self.document_number)?;

        if self.config.vehicle().is_none() {
            return Err(ValidationError::NoVehicleSelected);
        }

        if self.config.is_zero_duration() {
            return Err(ValidationError::ZeroDuration);
        }

        Ok(NewOrderLine::from_config(&self.config, self.date, self.time))
    }
}

/// Validate a booking and stage it in the cart.
///
/// # Errors
///
/// Returns [`BookingError::Validation`] before touching the store when the
/// request is invalid, or [`BookingError::Store`] when the write fails.
pub fn place_booking(
    store: &mut impl OrderStore,
    request: &BookingRequest,
) -> Result<OrderId, BookingError> {
    let line = request.to_order_line()?;
    let id = store.stage(&line)?;

    debug!(%id, total_price = line.total_price, "booking staged");

    Ok(id)
}
