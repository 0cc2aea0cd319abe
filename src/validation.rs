//! Validation errors
//!
//! Raised for user input that should be corrected and resubmitted. None of
//! these are reached after a store write has begun.

use thiserror::Error;

/// Input rejected before any state changes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The identification document number is empty or shorter than required.
    #[error("identification number must be at least {min} characters")]
    DocumentTooShort {
        /// Required length
        min: usize,
    },

    /// Hours and days are both zero.
    #[error("cart can't be empty: choose at least one hour or day")]
    ZeroDuration,

    /// No vehicle class was selected.
    #[error("select a vehicle before adding to the cart")]
    NoVehicleSelected,

    /// The phone number is too short or contains non-digits.
    #[error("enter a mobile number of at least {min} characters")]
    InvalidPhoneNumber {
        /// Required length
        min: usize,
    },

    /// The one-time verification code is too short.
    #[error("verification code must be at least {min} characters")]
    VerificationCodeTooShort {
        /// Required length
        min: usize,
    },

    /// The profile name is empty.
    #[error("please fill in your name")]
    NameRequired,

    /// The profile email is empty.
    #[error("please fill in your email")]
    EmailRequired,
}
