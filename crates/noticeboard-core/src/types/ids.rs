// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Row identifier of a circular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct DocumentId(i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ClassId(i64);

fn validate_id(kind: &'static str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(Error::InvalidIdentifier {
            kind,
            value,
            reason: "must be a positive integer",
        });
    }
    Ok(())
}

macro_rules! impl_id_traits {
    ($name:ident, $kind:literal) => {
        impl $name {
            pub fn new(value: i64) -> Result<Self> {
                validate_id($kind, value)?;
                Ok(Self(value))
            }

            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = Error;

            fn try_from(value: i64) -> Result<Self> {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let value = s.trim().parse::<i64>().map_err(|_| Error::InvalidIdentifier {
                    kind: $kind,
                    value: 0,
                    reason: "must be numeric",
                })?;
                Self::new(value)
            }
        }
    };
}

impl_id_traits!(DocumentId, "document_id");
impl_id_traits!(UserId, "user_id");
impl_id_traits!(ClassId, "class_id");
