//! Marketplace actor roles.

use serde::{Deserialize, Serialize};

/// Role of a marketplace actor.
///
/// The role set is closed: every account is exactly one of these. Role
/// checks are policy decisions, so a recognized-but-unprivileged actor is a
/// conflict at the operation boundary, not an identity failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Seller,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Role::Customer => f.write_str("customer"),
            Role::Seller => f.write_str("seller"),
            Role::Admin => f.write_str("admin"),
        }
    }
}
