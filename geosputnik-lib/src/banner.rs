//! Transient error banner.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Banner {
    message: String,
    expires_at: Instant,
}

/// Holds at most one user-facing error message, which disappears on its own once the display
/// interval has elapsed. A newer message replaces the current one.
#[derive(Debug, Clone)]
pub struct BannerSlot {
    interval: Duration,
    current: Option<Banner>,
}

impl BannerSlot {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            current: None,
        }
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.current = Some(Banner {
            message: message.into(),
            expires_at: Instant::now() + self.interval,
        });
    }

    /// The message on display right now, if any
    pub fn current(&self) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|b| Instant::now() < b.expires_at)
            .map(|b| b.message.as_str())
    }
}
