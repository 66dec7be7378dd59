//! Principals, pseudo-roles and the role-based authorization predicate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ANONYMOUS_ROLE_NAME, DEFAULT_EVERYONE_ROLE_NAME, DEFAULT_REGISTERED_ROLE_NAME,
};

/// The caller whose access is being checked
pub trait Principal: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// Native role-membership check
    fn is_in_role(&self, role: &str) -> bool;
}

/// Principal built from a resolved identity and its role claims
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimsPrincipal {
    name: Option<String>,
    roles: HashSet<String>,
}

impl ClaimsPrincipal {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated<I, S>(name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl Principal for ClaimsPrincipal {
    fn is_authenticated(&self) -> bool {
        self.name.is_some()
    }

    fn is_in_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Role names with a built-in meaning instead of an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoRole {
    Everyone,
    Registered,
    Anonymous,
}

/// Configured names of the pseudo-roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PseudoRoleNames {
    pub everyone: String,
    pub registered: String,
    pub anonymous: String,
}

impl Default for PseudoRoleNames {
    fn default() -> Self {
        Self {
            everyone: DEFAULT_EVERYONE_ROLE_NAME.to_string(),
            registered: DEFAULT_REGISTERED_ROLE_NAME.to_string(),
            anonymous: DEFAULT_ANONYMOUS_ROLE_NAME.to_string(),
        }
    }
}

impl PseudoRoleNames {
    pub fn name_of(&self, role: PseudoRole) -> &str {
        match role {
            PseudoRole::Everyone => &self.everyone,
            PseudoRole::Registered => &self.registered,
            PseudoRole::Anonymous => &self.anonymous,
        }
    }

    /// Which pseudo-role, if any, a role name denotes
    pub fn classify(&self, role: &str) -> Option<PseudoRole> {
        [PseudoRole::Everyone, PseudoRole::Registered, PseudoRole::Anonymous]
            .into_iter()
            .find(|pseudo| self.name_of(*pseudo) == role)
    }
}

/// Decide whether `principal` may act under any of `roles`.
///
/// Roles are checked in order and the first match wins:
/// 1. the Everyone pseudo-role;
/// 2. any role other than Registered, for an authenticated principal;
/// 3. the Anonymous pseudo-role, for an unauthenticated principal;
/// 4. a role the principal actually holds.
///
/// A missing principal, missing role list or empty role list is never
/// authorized.
pub fn is_authorized<S: AsRef<str>>(
    principal: Option<&dyn Principal>,
    roles: Option<&[S]>,
    names: &PseudoRoleNames,
) -> bool {
    let (Some(principal), Some(roles)) = (principal, roles) else {
        return false;
    };

    let authenticated = principal.is_authenticated();

    roles.iter().any(|role| {
        let role: &str = role.as_ref();
        let pseudo = names.classify(role);

        pseudo == Some(PseudoRole::Everyone)
            || (pseudo != Some(PseudoRole::Registered) && authenticated)
            || (pseudo == Some(PseudoRole::Anonymous) && !authenticated)
            || principal.is_in_role(role)
    })
}
