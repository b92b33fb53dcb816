//! Coarse view state machine (idle/loading/error).
//!
//! Overlapping searches are allowed; the controller drops stale completions.

/// Coarse state of the weather view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Error,
}

impl UiState {
    /// State after a search or geolocation request starts.
    pub fn on_start(self) -> Self {
        UiState::Loading
    }

    /// State after results were rendered.
    pub fn on_success(self) -> Self {
        UiState::Idle
    }

    /// State after a fetch or resolve failure.
    pub fn on_failure(self) -> Self {
        UiState::Error
    }

    pub fn is_loading(self) -> bool {
        matches!(self, UiState::Loading)
    }
}
