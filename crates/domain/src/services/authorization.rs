//! Role-based authorization for product and local operations.
//!
//! The policy is a single table of `action -> permitted roles`, consulted once
//! per call. It never touches storage.

use crate::error::{DomainError, DomainResult};
use crate::models::{Role, User};

/// Every gated operation of the product and local use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateProduct,
    ListProducts,
    GetProduct,
    EditProduct,
    DeleteProduct,
    SetReadFlag,
    ClearReadFlag,
    ListReadProducts,
    CreateLocal,
    ListLocals,
    GetLocal,
    EditLocal,
    DeleteLocal,
}

impl Action {
    pub fn all() -> &'static [Action] {
        &[
            Action::CreateProduct,
            Action::ListProducts,
            Action::GetProduct,
            Action::EditProduct,
            Action::DeleteProduct,
            Action::SetReadFlag,
            Action::ClearReadFlag,
            Action::ListReadProducts,
            Action::CreateLocal,
            Action::ListLocals,
            Action::GetLocal,
            Action::EditLocal,
            Action::DeleteLocal,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateProduct => "product:create",
            Action::ListProducts => "product:list",
            Action::GetProduct => "product:get",
            Action::EditProduct => "product:edit",
            Action::DeleteProduct => "product:delete",
            Action::SetReadFlag => "product:set_read",
            Action::ClearReadFlag => "product:clear_read",
            Action::ListReadProducts => "product:list_read",
            Action::CreateLocal => "local:create",
            Action::ListLocals => "local:list",
            Action::GetLocal => "local:get",
            Action::EditLocal => "local:edit",
            Action::DeleteLocal => "local:delete",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every named tier. Tiers share the same rights today.
const ALL_TIERS: &[Role] = &[Role::Master, Role::Flat1, Role::Flat2, Role::Flat3];

/// The authorization policy.
pub const POLICY: &[(Action, &[Role])] = &[
    (Action::CreateProduct, ALL_TIERS),
    (Action::ListProducts, ALL_TIERS),
    (Action::GetProduct, ALL_TIERS),
    (Action::EditProduct, ALL_TIERS),
    (Action::DeleteProduct, ALL_TIERS),
    (Action::SetReadFlag, ALL_TIERS),
    (Action::ClearReadFlag, ALL_TIERS),
    (Action::ListReadProducts, ALL_TIERS),
    (Action::CreateLocal, ALL_TIERS),
    (Action::ListLocals, ALL_TIERS),
    (Action::GetLocal, ALL_TIERS),
    (Action::EditLocal, ALL_TIERS),
    (Action::DeleteLocal, ALL_TIERS),
];

/// Roles permitted to perform `action`. Actions missing from the table permit nobody.
pub fn permitted_roles(action: Action) -> &'static [Role] {
    POLICY
        .iter()
        .find(|(a, _)| *a == action)
        .map(|(_, roles)| *roles)
        .unwrap_or(&[])
}

pub fn is_allowed(role: Role, action: Action) -> bool {
    permitted_roles(action).contains(&role)
}

/// Checks `user` against the policy, yielding `Unauthorized` when denied.
pub fn authorize(user: &User, action: Action) -> DomainResult<()> {
    if is_allowed(user.role, action) {
        Ok(())
    } else {
        Err(DomainError::Unauthorized(format!(
            "role '{}' may not perform {}",
            user.role, action
        )))
    }
}
