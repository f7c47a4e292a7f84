//! Ledger identifiers and the anchoring request.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::data_hash::DataHash;
use super::prediction::PlacementLabel;
use super::user::Username;

/// Validation failures for ledger identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerIdError {
    /// Value did not start with `0x`.
    #[error("expected a 0x-prefixed hex value")]
    MissingPrefix,
    /// Hex body had the wrong number of digits.
    #[error("expected {expected} hex digits, found {found}")]
    WrongLength { expected: usize, found: usize },
    /// Body contained a non-hex character.
    #[error("value contains non-hex characters")]
    NotHex,
}

fn parse_prefixed_hex(raw: &str, digits: usize) -> Result<String, LedgerIdError> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or(LedgerIdError::MissingPrefix)?;
    if body.len() != digits {
        return Err(LedgerIdError::WrongLength {
            expected: digits,
            found: body.len(),
        });
    }
    if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(LedgerIdError::NotHex);
    }
    Ok(format!("0x{}", body.to_ascii_lowercase()))
}

macro_rules! ledger_hex_id {
    ($(#[$meta:meta])* $name:ident, $digits:expr, $example:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(try_from = "String", into = "String")]
        #[schema(value_type = String, example = $example)]
        pub struct $name(String);

        impl $name {
            /// Parse and normalise to lowercase `0x…` form.
            pub fn parse(raw: &str) -> Result<Self, LedgerIdError> {
                parse_prefixed_hex(raw, $digits).map(Self)
            }

            /// Normalised `0x…` text.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = LedgerIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

ledger_hex_id!(
    /// Hash of a mined ledger transaction.
    TransactionId,
    64,
    "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060"
);

ledger_hex_id!(
    /// Externally owned account or contract address.
    ///
    /// # Examples
    /// ```
    /// use placement_backend::domain::AccountAddress;
    ///
    /// let address = AccountAddress::parse("0xABCDEF0123456789abcdef0123456789ABCDEF01").unwrap();
    /// assert_eq!(address.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    /// ```
    AccountAddress,
    40,
    "0x90f8bf6a479f320ead074411a4b0e7944ea8c9c1"
);

/// What gets written to the ledger for one prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorRequest {
    pub username: Username,
    pub data_hash: DataHash,
    pub label: PlacementLabel,
}
