use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
/// Request payload for the login endpoint.
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Query string shared by the list endpoints (`?q=`).
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    /// The trimmed search term, or `None` when absent or blank.
    pub fn term(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}
