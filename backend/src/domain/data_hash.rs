//! Deterministic fingerprint of a submitted prediction form.
//!
//! The hash covers the owning username and the canonical JSON rendering of
//! the form. The rendering must stay byte-for-byte stable: hashes already
//! anchored on the ledger are only verifiable while it does.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use super::features::RawForm;
use super::user::Username;

/// Length of a hex-encoded SHA-256 digest.
const HEX_LEN: usize = 64;

/// Raised when a stored hash is not 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("data hash must be {HEX_LEN} lowercase hex characters")]
pub struct InvalidDataHash;

/// Lowercase hex SHA-256 of `"{username}-{canonical form json}"`.
///
/// # Examples
/// ```
/// use placement_backend::domain::{DataHash, RawForm, Username};
///
/// let user = Username::new("alice").unwrap();
/// let form = RawForm::from_pairs([("Branch", "CS"), ("Age", "21")]);
/// let hash = DataHash::compute(&user, &form);
/// assert_eq!(hash, DataHash::compute(&user, &form));
/// assert_eq!(hash.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(
    value_type = String,
    example = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
)]
pub struct DataHash(String);

impl DataHash {
    /// Hash a form for `username`.
    pub fn compute(username: &Username, form: &RawForm) -> Self {
        let preimage = format!("{}-{}", username.as_ref(), canonical_form_json(form));
        Self(hex::encode(Sha256::digest(preimage.as_bytes())))
    }

    /// Validate a previously computed hash, e.g. one read from storage.
    pub fn parse(raw: &str) -> Result<Self, InvalidDataHash> {
        let valid = raw.len() == HEX_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(raw.to_owned()))
        } else {
            Err(InvalidDataHash)
        }
    }

    /// Whether recomputing from `username` and `form` reproduces this hash.
    pub fn matches(&self, username: &Username, form: &RawForm) -> bool {
        Self::compute(username, form) == *self
    }

    /// Hex digest.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DataHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DataHash {
    type Error = InvalidDataHash;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DataHash> for String {
    fn from(value: DataHash) -> Self {
        value.0
    }
}

/// Render a form as compact-but-spaced JSON with sorted keys and ASCII-only
/// output: `{"a": "1", "b": "2"}`. Non-ASCII characters are written as
/// `\uXXXX` escapes, using surrogate pairs outside the BMP.
///
/// # Examples
/// ```
/// use placement_backend::domain::{canonical_form_json, RawForm};
///
/// let form = RawForm::from_pairs([("b", "é"), ("a", "1")]);
/// assert_eq!(canonical_form_json(&form), r#"{"a": "1", "b": "\u00e9"}"#);
/// ```
pub fn canonical_form_json(form: &RawForm) -> String {
    let mut out = String::with_capacity(2 + form.len() * 16);
    out.push('{');
    for (index, (key, value)) in form.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        push_json_string(&mut out, key);
        out.push_str(": ");
        push_json_string(&mut out, value);
    }
    out.push('}');
    out
}

fn push_json_string(out: &mut String, raw: &str) {
    out.push('"');
    for ch in raw.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0_u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04x}"));
                }
            }
        }
    }
    out.push('"');
}
