//! Health probe results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome tag of a health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum HealthState {
    /// Every dependency answered.
    #[serde(rename = "ready")]
    Ready,
    /// A dependency failed its probe.
    #[serde(rename = "not ready")]
    NotReady,
    /// The process is alive.
    #[serde(rename = "healthy")]
    Healthy,
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::NotReady => write!(f, "not ready"),
            Self::Healthy => write!(f, "healthy"),
        }
    }
}

/// Result of a single probe invocation. Built fresh on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthStatus {
    /// Probe outcome.
    pub status: HealthState,
    /// Which dependency failed and why.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HealthStatus {
    #[must_use]
    pub const fn ready() -> Self {
        Self {
            status: HealthState::Ready,
            details: None,
        }
    }

    #[must_use]
    pub const fn healthy() -> Self {
        Self {
            status: HealthState::Healthy,
            details: None,
        }
    }

    #[must_use]
    pub fn not_ready(details: impl Into<String>) -> Self {
        Self {
            status: HealthState::NotReady,
            details: Some(details.into()),
        }
    }

    /// True for `ready` and `healthy`.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        !matches!(self.status, HealthState::NotReady)
    }
}
