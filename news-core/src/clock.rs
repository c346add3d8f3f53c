use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Source of `published_at` stamps.
///
/// `Anchored` derives UTC time from the tokio timer, so a paused test runtime
/// that advances virtual time also advances the stamps written by the queue.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    Anchored { utc: DateTime<Utc>, instant: Instant },
}

impl Clock {
    pub fn system() -> Self {
        Clock::System
    }

    /// Anchor `utc` to the current tokio instant.
    pub fn anchored(utc: DateTime<Utc>) -> Self {
        Clock::Anchored {
            utc,
            instant: Instant::now(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Anchored { utc, instant } => {
                let elapsed = chrono::Duration::from_std(instant.elapsed())
                    .unwrap_or_else(|_| chrono::Duration::zero());
                *utc + elapsed
            }
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::System
    }
}
