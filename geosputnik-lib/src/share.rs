//! Best-effort sharing of a freshly created marker.

use std::future::{self, Future};

use thiserror::Error;

use crate::marker::Marker;

#[derive(Debug, Clone, PartialEq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    pub fn for_marker(marker: &Marker, title: &str, url: &str) -> Self {
        Self {
            title: title.into(),
            text: format!(
                "Marker: {}\nSK-42 X: {:.2}, Y: {:.2}",
                marker.description, marker.projected_x, marker.projected_y
            ),
            url: url.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Sharing is not supported on this platform")]
    Unsupported,
    #[error("Share was cancelled")]
    Cancelled,
    #[error("Share failed: {0}")]
    Failed(String),
}

/// A platform share sheet. Outcomes are only ever logged.
pub trait Share {
    fn share(&self, payload: &SharePayload) -> impl Future<Output = Result<(), ShareError>>;
}

/// [`Share`] for platforms without a share sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShare;

impl Share for NoShare {
    fn share(&self, _payload: &SharePayload) -> impl Future<Output = Result<(), ShareError>> {
        future::ready(Err(ShareError::Unsupported))
    }
}
