//! Ownership-based authorization for mutating catalogue operations.
//!
//! Every decision is a pure function of the caller's role and the manufacturer ids
//! involved; callers resolve those ids (e.g. by loading the beer) before asking.

use super::error::{Error, Result};

/// Access tier of an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    /// Scoped to the manufacturer with the given id.
    Manufacturer(i64),
}

/// Who is making the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated {
        username: String,
        /// `None` for accounts without a role, or manufacturer accounts missing their manufacturer.
        role: Option<Role>,
    },
}

#[cfg(test)]
impl Caller {
    pub fn admin(username: &str) -> Caller {
        Caller::Authenticated {
            username: username.to_owned(),
            role: Some(Role::Admin),
        }
    }

    pub fn manufacturer(username: &str, owner: i64) -> Caller {
        Caller::Authenticated {
            username: username.to_owned(),
            role: Some(Role::Manufacturer(owner)),
        }
    }
}

impl Caller {
    pub fn username(&self) -> Option<&str> {
        match self {
            Caller::Anonymous => None,
            Caller::Authenticated { username, .. } => Some(username),
        }
    }
}

/// A mutating operation together with the manufacturer ids it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateBeer { manufacturer_id: i64 },
    /// `current` owns the stored beer, `requested` is the manufacturer in the new payload.
    UpdateBeer { current: i64, requested: i64 },
    DeleteBeer { current: i64 },
    CreateManufacturer,
    UpdateManufacturer { id: i64 },
    DeleteManufacturer { id: i64 },
}

impl Action {
    fn denial(&self) -> &'static str {
        match self {
            Action::CreateBeer { .. } => {
                "You do not have permission to create a beer for this manufacturer"
            }
            Action::UpdateBeer { .. } => "You do not have permission to modify this beer",
            Action::DeleteBeer { .. } => "You do not have permission to delete this beer",
            Action::CreateManufacturer => "You do not have permission to create a manufacturer",
            Action::UpdateManufacturer { .. } => {
                "You do not have permission to modify this manufacturer"
            }
            Action::DeleteManufacturer { .. } => {
                "You do not have permission to delete this manufacturer"
            }
        }
    }
}

/// Whether `role` may perform `action`.
///
/// Admins may do anything. A manufacturer account may only touch records it owns and
/// may never move a beer to another manufacturer.
pub fn permits(role: Role, action: Action) -> bool {
    let owner = match role {
        Role::Admin => return true,
        Role::Manufacturer(owner) => owner,
    };

    match action {
        Action::CreateBeer { manufacturer_id } => manufacturer_id == owner,
        Action::UpdateBeer { current, requested } => current == owner && requested == owner,
        Action::DeleteBeer { current } => current == owner,
        Action::CreateManufacturer => false,
        Action::UpdateManufacturer { id } | Action::DeleteManufacturer { id } => id == owner,
    }
}

/// Fails with `Unauthenticated` for anonymous callers and `AccessDenied` when the role
/// does not permit the action.
pub fn authorize(caller: &Caller, action: Action) -> Result<()> {
    require_authenticated(caller)?;

    let allowed = match caller {
        Caller::Authenticated {
            role: Some(role), ..
        } => permits(*role, action),
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        warn!(
            "Denied {:?} for user {}",
            action,
            caller.username().unwrap_or("<anonymous>")
        );
        Err(Error::AccessDenied(action.denial().to_owned()))
    }
}

pub fn require_authenticated(caller: &Caller) -> Result<()> {
    match caller {
        Caller::Anonymous => Err(Error::Unauthenticated),
        Caller::Authenticated { .. } => Ok(()),
    }
}
