//! Identity fields
//!
//! Free-text fields collected at registration and booking time. Verification
//! itself belongs to the external authentication provider; these types only
//! check shape.

use std::fmt;

use clap::ValueEnum;

use crate::validation::ValidationError;

/// Minimum length of an identification document number.
pub const MIN_DOCUMENT_LEN: usize = 6;

/// Minimum length of a mobile number, counting a leading `+`.
pub const MIN_PHONE_LEN: usize = 10;

/// Kenyan country calling code used by the mobile-money provider.
const COUNTRY_CODE: &str = "254";

/// Minimum length of a one-time verification code.
pub const MIN_CODE_LEN: usize = 6;

/// Kind of identification document presented at booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DocumentKind {
    /// Passport
    #[default]
    Passport,

    /// National identity card
    NationalId,

    /// Visa
    Visa,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentKind::Passport => "Passport",
            DocumentKind::NationalId => "National ID",
            DocumentKind::Visa => "VISA",
        })
    }
}

/// A validated identification document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityDocument {
    kind: DocumentKind,
    number: String,
}

impl IdentityDocument {
    /// Validate a document number.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DocumentTooShort`] when the trimmed number is
    /// shorter than [`MIN_DOCUMENT_LEN`] characters.
    pub fn new(kind: DocumentKind, number: &str) -> Result<Self, ValidationError> {
        let number = number.trim();

        if number.chars().count() < MIN_DOCUMENT_LEN {
            return Err(ValidationError::DocumentTooShort {
                min: MIN_DOCUMENT_LEN,
            });
        }

        Ok(Self {
            kind,
            number: number.to_string(),
        })
    }

    /// Document kind.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Trimmed document number.
    pub fn number(&self) -> &str {
        &self.number
    }
}

/// A mobile number in the shape the OTP provider accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate a mobile number: digits only, optionally prefixed with `+`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPhoneNumber`] for other characters or
    /// when the trimmed number is shorter than [`MIN_PHONE_LEN`] characters.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

        if trimmed.len() < MIN_PHONE_LEN
            || digits.is_empty()
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ValidationError::InvalidPhoneNumber { min: MIN_PHONE_LEN });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The number as entered, trimmed.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The number in the international form mobile-money payments expect.
    ///
    /// A local `07..` number gains the `254` country code in place of its
    /// leading zero, and a full international number such as `+254..` loses its
    /// `+`. Anything else is
    /// returned as entered.
    pub fn to_msisdn(&self) -> String {
        let number = self.0.as_str();

        match (number.strip_prefix('0'), number.strip_prefix('+')) {
            (Some(local), _) if number.len() < 11 => format!("{COUNTRY_CODE}{local}"),
            (_, Some(international)) if number.len() == 13 => international.to_string(),
            _ => number.to_string(),
        }
    }
}

/// A one-time code received by SMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Validate a verification code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::VerificationCodeTooShort`] when the trimmed
    /// code is shorter than [`MIN_CODE_LEN`] characters.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let code = input.trim();

        if code.chars().count() < MIN_CODE_LEN {
            return Err(ValidationError::VerificationCodeTooShort { min: MIN_CODE_LEN });
        }

        Ok(Self(code.to_string()))
    }

    /// The trimmed code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Profile details a registered user completes after verifying their number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    name: String,
    email: String,
    mobile: PhoneNumber,
}

impl UserProfile {
    /// Validate a profile. Fields are trimmed and checked in form order.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NameRequired`]: the name is empty.
    /// - [`ValidationError::EmailRequired`]: the email is empty.
    /// - [`ValidationError::InvalidPhoneNumber`]: the mobile number is malformed.
    pub fn new(name: &str, email: &str, mobile: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }

        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::EmailRequired);
        }

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            mobile: PhoneNumber::parse(mobile)?,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact email; also the owner recorded on placed orders.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Verified mobile number.
    pub fn mobile(&self) -> &PhoneNumber {
        &self.mobile
    }
}
