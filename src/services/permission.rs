//! Permission gate — which roles may perform which actions.
//!
//! Denied actions are dropped by the caller without a reply and without
//! touching room state.

use crate::state::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Join,
    Disconnect,
    Draw,
    ClearCanvas,
    Chat,
    Signal,
}

/// The permission table.
#[must_use]
pub fn permits(role: Role, action: Action) -> bool {
    match action {
        Action::Join | Action::Disconnect | Action::Chat | Action::Signal => true,
        Action::Draw | Action::ClearCanvas => matches!(role, Role::Admin | Role::Editor),
    }
}

impl Role {
    #[must_use]
    pub fn can(self, action: Action) -> bool {
        permits(self, action)
    }
}
