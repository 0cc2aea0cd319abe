//! Rental Wheels prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    booking::{BookingError, BookingRequest, place_booking},
    cart::{Cart, CartError},
    checkout::{
        CheckoutError, CheckoutReceipt, PaymentGateway, PaymentOutcome, PaymentRequest,
        ScriptedGateway, checkout,
    },
    identity::{DocumentKind, IdentityDocument, PhoneNumber, UserProfile, VerificationCode},
    orders::{
        NewOrderLine, OrderId, OrderLine, OrderStore, OrderStoreError, SqliteOrderStore,
        Visibility,
    },
    pricing::{Adjusted, BoundNotice, MAX_DAYS, MAX_HOURS, RentalConfig, TotalPriceError, price},
    validation::ValidationError,
    vehicles::{Rates, VehicleClass},
};
