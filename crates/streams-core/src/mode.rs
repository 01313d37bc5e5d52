use serde::{Deserialize, Serialize};

/// Validation and rendering flags carried by a document.
///
/// Missing fields deserialize to the defaults: strict checking, compact text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mode {
    /// Run property checks on every assignment.
    pub strict: bool,
    /// Render indented text.
    pub pretty: bool,
}

impl Mode {
    /// Strict checking, compact text.
    pub const fn strict() -> Self {
        Self {
            strict: true,
            pretty: false,
        }
    }

    /// No checking, compact text.
    pub const fn lenient() -> Self {
        Self {
            strict: false,
            pretty: false,
        }
    }

    /// Same flags with indented rendering.
    pub const fn pretty(self) -> Self {
        Self {
            pretty: true,
            ..self
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::strict()
    }
}
