//! Chat messages exchanged with the oracle.

use crate::Role;
use serde::{Deserialize, Serialize};

/// One message in an oracle request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Message {
    /// Author role
    role: Role,
    /// Plain text content
    content: String,
}

impl Message {
    /// Create a message.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// System instruction.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// User content.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}
