//! Airport record used as the vertex type of route graphs.

use std::fmt;

use serde::Serialize;

/// An airport, identified by its full name.
///
/// Two airports are equal exactly when their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Airport {
    name: String,
}

impl Airport {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Airport {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
