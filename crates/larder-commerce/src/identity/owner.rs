//! Cart owner keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{GuestToken, UserId};

/// Who a cart belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum OwnerKey {
    /// Browsing session without login.
    Anonymous(GuestToken),
    /// Logged-in user.
    Authenticated(UserId),
}

impl OwnerKey {
    /// Key the owner's cart is persisted under.
    pub fn storage_key(&self) -> String {
        match self {
            OwnerKey::Anonymous(token) => format!("cart:guest:{}", token),
            OwnerKey::Authenticated(user) => format!("cart:user:{}", user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, OwnerKey::Authenticated(_))
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            OwnerKey::Authenticated(user) => Some(user),
            OwnerKey::Anonymous(_) => None,
        }
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}
