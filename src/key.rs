//! Keys as typed by a user: numbers when the token reads as one, text
//! otherwise.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::btree_base::error::{BTreeError, Result};

/// Largest magnitude at which every integer is exactly representable.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Debug, Deserialize)]
#[serde(from = "RawKey")]
pub enum Key {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    Number(f64),
    Text(String),
}

impl From<RawKey> for Key {
    fn from(raw: RawKey) -> Self {
        match raw {
            RawKey::Number(n) => Key::number(n),
            RawKey::Text(s) => Key::Text(s),
        }
    }
}

impl Key {
    /// Parse one user token. Finite numbers win over text so that `10` sorts
    /// after `9`.
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(BTreeError::EmptyKey);
        }
        match token.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Key::number(n)),
            _ => Ok(Key::Text(token.to_owned())),
        }
    }

    /// `-0` folds into `0`. Non-finite values become their text spelling,
    /// the same key `parse` yields for `inf` or `NaN`.
    pub fn number(n: f64) -> Self {
        if n.is_finite() {
            Key::Number(n + 0.0)
        } else {
            Key::Text(n.to_string())
        }
    }

    /// Parse a comma separated list. Any empty token rejects the whole list.
    pub fn parse_list(tokens: &str) -> Result<Vec<Self>> {
        tokens.split(',').map(Key::parse).collect()
    }

    fn as_integer(&self) -> Option<i64> {
        match *self {
            Key::Number(n) if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT => Some(n as i64),
            _ => None,
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Number(n as f64)
    }
}

impl From<f64> for Key {
    fn from(n: f64) -> Self {
        Key::number(n)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_owned())
    }
}

impl FromStr for Key {
    type Err = BTreeError;

    fn from_str(s: &str) -> Result<Self> {
        Key::parse(s)
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Number(a), Key::Number(b)) => a.total_cmp(b),
            (Key::Number(_), Key::Text(_)) => Ordering::Less,
            (Key::Text(_), Key::Number(_)) => Ordering::Greater,
            (Key::Text(a), Key::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.as_integer()) {
            (_, Some(i)) => write!(f, "{}", i),
            (Key::Number(n), None) => write!(f, "{}", n),
            (Key::Text(s), None) => f.write_str(s),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match (self, self.as_integer()) {
            (_, Some(i)) => serializer.serialize_i64(i),
            (Key::Number(n), None) => serializer.serialize_f64(*n),
            (Key::Text(s), None) => serializer.serialize_str(s),
        }
    }
}
