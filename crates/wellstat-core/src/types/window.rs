use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowState {
    #[default]
    Idle,
    Open,
}

/// Snapshot of the store's transaction window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionWindow {
    pub state: WindowState,
    /// Set when a write inside the open window failed.
    pub has_error: bool,
}

impl TransactionWindow {
    pub fn is_open(&self) -> bool {
        self.state == WindowState::Open
    }
}

/// What a window close did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseOutcome {
    /// No window was open; nothing was issued.
    Idle,
    Committed,
    RolledBack,
}
