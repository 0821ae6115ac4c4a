use thiserror::Error;

/// Which list a catalog fetch failure belongs to, so the shell can show an
/// inline error on the affected pane only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Countries,
    SubCategories,
    Channels,
    Status,
    ContinueWatching,
}

impl std::fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FetchTarget {
    pub fn display_name(&self) -> &'static str {
        match self {
            FetchTarget::Countries => "Countries",
            FetchTarget::SubCategories => "Sub-Categories",
            FetchTarget::Channels => "Channels",
            FetchTarget::Status => "Status",
            FetchTarget::ContinueWatching => "Continue Watching",
        }
    }
}

/// Error taxonomy for the viewer.
///
/// Fetch failures surface as inline empty/error state for the affected list
/// and are never fatal. Playback failures move the player to its error state.
/// Persistence failures are logged and dropped.
#[derive(Debug, Error, Clone)]
pub enum ViewerError {
    /// A catalog/category/status request failed
    #[error("{0} request failed: {1}")]
    FetchFailure(FetchTarget, String),

    /// The media subsystem reported an unplayable source
    #[error("Playback failed: {0}")]
    PlaybackFailure(String),

    /// A watch-position write failed (best-effort, not retried)
    #[error("Watch position not saved: {0}")]
    PersistenceFailure(String),
}

impl ViewerError {
    /// User-facing message for the shell. Persistence failures have none;
    /// they are logged only.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ViewerError::FetchFailure(target, _) => {
                Some(format!("{} could not be loaded. Try again.", target))
            }
            ViewerError::PlaybackFailure(_) => {
                Some("Stream could not be played. Reload to retry.".to_string())
            }
            ViewerError::PersistenceFailure(_) => None,
        }
    }
}
