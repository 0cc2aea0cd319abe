//! Checkout
//!
//! Charges the temporary lines through a payment gateway and, once the
//! gateway confirms, records them as placed orders.

use std::fmt;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    orders::{OrderId, OrderStore, OrderStoreError},
    pricing::{TotalPriceError, total_price},
};

/// Errors that stop a checkout before or after payment.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to pay for.
    #[error("cart is empty")]
    EmptyCart,

    /// Reading the cart failed before any payment was attempted.
    #[error(transparent)]
    Store(#[from] OrderStoreError),

    /// Payment was captured but the lines could not be placed. No line was
    /// placed; the cart still holds them.
    #[error("payment {reference} of {amount} captured but orders were not placed")]
    Promotion {
        /// Gateway transaction reference of the captured payment
        reference: String,

        /// Amount captured
        amount: Money<'static, Currency>,

        /// Store failure
        source: OrderStoreError,
    },

    /// The amount could not be expressed as money.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),
}

/// Amount and metadata handed to the payment gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    /// Amount to charge
    pub amount: Money<'static, Currency>,

    /// Payer email
    pub email: String,

    /// Transaction reference
    pub reference: String,

    /// Description shown to the payer
    pub narration: String,
}

/// What the gateway reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment captured.
    Success {
        /// Gateway transaction reference
        reference: String,
    },

    /// Payment failed.
    Error {
        /// Gateway message
        message: String,
    },

    /// The payer abandoned the payment.
    Cancelled,
}

impl fmt::Display for PaymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentOutcome::Success { reference } => write!(f, "SUCCESS {reference}"),
            PaymentOutcome::Error { message } => write!(f, "ERROR {message}"),
            PaymentOutcome::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A third-party payment provider.
pub trait PaymentGateway {
    /// Attempt to charge the request.
    fn charge(&mut self, request: &PaymentRequest) -> PaymentOutcome;
}

/// A gateway that answers every charge with a fixed outcome and keeps the
/// requests it saw.
#[derive(Debug, Clone)]
pub struct ScriptedGateway {
    outcome: PaymentOutcome,
    requests: Vec<PaymentRequest>,
}

impl ScriptedGateway {
    /// Create a gateway that always reports `outcome`.
    pub fn new(outcome: PaymentOutcome) -> Self {
        Self {
            outcome,
            requests: Vec::new(),
        }
    }

    /// Requests charged so far.
    pub fn requests(&self) -> &[PaymentRequest] {
        &self.requests
    }
}

impl PaymentGateway for ScriptedGateway {
    fn charge(&mut self, request: &PaymentRequest) -> PaymentOutcome {
        self.requests.push(request.clone());

        self.outcome.clone()
    }
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    /// Gateway outcome
    pub outcome: PaymentOutcome,

    /// Amount charged (or attempted)
    pub amount: Money<'static, Currency>,

    /// Placed order ids; empty unless the payment succeeded
    pub placed: Vec<OrderId>,
}

impl CheckoutReceipt {
    /// Whether payment succeeded and the lines were placed.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, PaymentOutcome::Success { .. })
    }
}

/// Charge the temporary lines and promote them to placed orders on success.
///
/// An error or cancelled payment leaves the store untouched.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: there are no temporary lines; the gateway is not called.
/// - [`CheckoutError::Store`]: reading the temporary lines failed; nothing was charged.
/// - [`CheckoutError::Promotion`]: the payment succeeded but placing the lines
///   failed. Carries the gateway reference and amount; no line was placed.
/// - [`CheckoutError::TotalPrice`]: the amount overflowed.
pub fn checkout(
    store: &mut impl OrderStore,
    gateway: &mut impl PaymentGateway,
    owner_email: &str,
    currency: &'static Currency,
) -> Result<CheckoutReceipt, CheckoutError> {
    let lines = store.list_temporary()?;

    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let amount = total_price(&lines, currency)?;

    let request = PaymentRequest {
        amount,
        email: owner_email.to_string(),
        reference: format!("{}Ref", Timestamp::now().as_millisecond()),
        narration: "Rental Wheels booking".to_string(),
    };

    let outcome = gateway.charge(&request);

    let placed = match &outcome {
        PaymentOutcome::Success { reference } => {
            let ids: Vec<OrderId> = lines.iter().map(|line| line.id).collect();

            let placed = store.promote_all(&ids, owner_email).map_err(|source| {
                error!(%reference, %amount, %source, "payment captured but orders not placed");

                CheckoutError::Promotion {
                    reference: reference.clone(),
                    amount,
                    source,
                }
            })?;

            info!(%reference, %amount, orders = placed.len(), "checkout complete");

            placed
        }
        PaymentOutcome::Error { message } => {
            warn!(%message, %amount, "payment failed");

            Vec::new()
        }
        PaymentOutcome::Cancelled => {
            warn!(%amount, "payment cancelled");

            Vec::new()
        }
    };

    Ok(CheckoutReceipt {
        outcome,
        amount,
        placed,
    })
}
