//! Message roles.

use serde::{Deserialize, Serialize};

/// Author of a message sent to the oracle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Instruction framing the task
    System,
    /// Caller-supplied content
    User,
    /// Previous oracle output
    Assistant,
}
