// Application layer - Use case interactors

use std::path::PathBuf;

pub mod cache_interactor;
pub mod clean_interactor;
pub mod clip_interactor;
pub mod container;
pub mod inspect_interactor;

// Re-export interactors
pub use cache_interactor::{CacheEntry, CacheInteractor};
pub use clean_interactor::{CleanInteractor, CleanRequest};
pub use clip_interactor::{ClipInteractor, ClipRequest};
pub use container::AppContainer;
pub use inspect_interactor::InspectInteractor;

/// Result of running one use case over a list of files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Final output paths, in input order
    pub written: Vec<PathBuf>,
    /// Files that failed
    pub failed: usize,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
