//! Client domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hawala_shared::types::{AccountId, ClientId};

/// A client of the remittance desk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier.
    pub id: ClientId,
    /// Short code used in the liability account naming convention.
    pub code: String,
    /// Display name, as registered.
    pub name: String,
    /// Phone number, when known. Used by the exact-phone matching rule.
    pub phone: Option<String>,
    /// The client's liability account, resolved or created on first
    /// assignment.
    pub liability_account_id: Option<AccountId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Creates a new client with no liability account yet.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, phone: Option<String>) -> Self {
        Self {
            id: ClientId::new(),
            code: code.into(),
            name: name.into(),
            phone,
            liability_account_id: None,
            created_at: Utc::now(),
        }
    }
}
