//! Forum groups.

use serde::{Deserialize, Serialize};

/// A named group of forum users with a stable numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
}
