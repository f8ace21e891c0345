//! User account aggregate.

use serde::{Deserialize, Serialize};

use vendora_core::{AggregateRoot, DomainError, DomainResult, Money, UserId};

use crate::Role;

/// Marketplace user account.
///
/// # Invariants
/// - `balance` is mutated only through the wallet's transaction component;
///   every mutation is committed under the account's version token.
/// - `balance` never goes negative through credits (credits are validated
///   non-negative before they reach this type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    display_name: String,
    role: Role,
    balance: Money,
    version: u64,
}

impl User {
    pub fn new(id: UserId, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role,
            balance: Money::ZERO,
            version: 0,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Credit the balance. Zero is a valid no-op credit.
    pub fn credit(&mut self, amount: Money) -> DomainResult<()> {
        if amount.is_negative() {
            return Err(DomainError::amount_invalid("credit must be non-negative"));
        }
        self.balance = self.balance.checked_add(amount)?;
        Ok(())
    }
}

impl AggregateRoot for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
