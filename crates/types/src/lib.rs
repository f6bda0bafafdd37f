//! Validated primitive types shared across the re-engagement engine.
//!
//! These wrappers guarantee their invariant at construction time so that
//! downstream code never has to re-validate: display names are never empty,
//! email addresses have a plausible shape, and phone numbers are dialable.
//! All three serialise as plain strings and re-validate on deserialisation.

use serde::Deserialize;
use std::fmt;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace.
    #[error("text cannot be empty")]
    Empty,
    /// The input was not a plausible email address.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    /// The input was not a dialable phone number.
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during
/// construction; the trimmed result must contain at least one character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated email address.
///
/// Validation is deliberately shallow: exactly one `@` separating a
/// non-empty local part from a non-empty domain, and no whitespace.
/// Deliverability is the transport provider's problem, not this type's.
/// The domain is lowercased so equality behaves the way operators expect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a new `EmailAddress` from the given input.
    ///
    /// The input is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `TextError::InvalidEmail` if the trimmed input does not have
    /// the shape `local@domain`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TextError::InvalidEmail(trimmed.to_owned()));
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(TextError::InvalidEmail(trimmed.to_owned()));
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(TextError::InvalidEmail(trimmed.to_owned()));
        }
        Ok(Self(format!("{}@{}", local, domain.to_lowercase())))
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated, normalised phone number.
///
/// Accepts an optional leading `+` followed by 7 to 15 digits (the E.164
/// ceiling). Spaces, hyphens and parentheses are stripped during
/// normalisation, so `+351 912 345 678` and `+351912345678` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a new `PhoneNumber` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::InvalidPhone` if, after stripping separators, the
    /// input is not an optional `+` followed by 7 to 15 digits.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let raw = input.as_ref().trim();
        let mut normalised = String::with_capacity(raw.len());
        for (index, ch) in raw.chars().enumerate() {
            match ch {
                '+' if index == 0 => normalised.push(ch),
                '0'..='9' => normalised.push(ch),
                ' ' | '-' | '(' | ')' => {}
                _ => return Err(TextError::InvalidPhone(raw.to_owned())),
            }
        }
        let digits = normalised.strip_prefix('+').unwrap_or(&normalised);
        if digits.is_empty() || !(7..=15).contains(&digits.len()) {
            return Err(TextError::InvalidPhone(raw.to_owned()));
        }
        Ok(Self(normalised))
    }

    /// Returns the normalised number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_wrapper_impls {
    ($type:ty) => {
        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $type {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                <$type>::new(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_wrapper_impls!(NonEmptyText);
string_wrapper_impls!(EmailAddress);
string_wrapper_impls!(PhoneNumber);
