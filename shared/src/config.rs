//! Runtime configuration for the portal core.
//!
//! Every field has a default equal to the behaviour the shells were built
//! against, so an empty JSON object is a valid configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::{
    COMPLAINT_ID_PREFIX, COOLDOWN_TICK_MS, FALLBACK_LOCATION, HOME_PREVIEW_LEN,
    LOCATION_DETECT_DELAY_MS, OTP_NOTIFICATION_MS, OTP_SEND_DELAY_MS, RESEND_COOLDOWN_SECS,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Malformed(String),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub otp_send_delay_ms: u64,
    pub otp_notification_ms: u64,
    pub resend_cooldown_secs: u32,
    pub cooldown_tick_ms: u64,
    pub location_detect_delay_ms: u64,
    pub fallback_location: String,
    pub complaint_id_prefix: String,
    pub home_preview_len: usize,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            otp_send_delay_ms: OTP_SEND_DELAY_MS,
            otp_notification_ms: OTP_NOTIFICATION_MS,
            resend_cooldown_secs: RESEND_COOLDOWN_SECS,
            cooldown_tick_ms: COOLDOWN_TICK_MS,
            location_detect_delay_ms: LOCATION_DETECT_DELAY_MS,
            fallback_location: FALLBACK_LOCATION.to_string(),
            complaint_id_prefix: COMPLAINT_ID_PREFIX.to_string(),
            home_preview_len: HOME_PREVIEW_LEN,
        }
    }
}

impl PortalConfig {
    /// Parses a shell-supplied JSON document and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validated()
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.cooldown_tick_ms == 0 {
            return Err(ConfigError::Zero { field: "cooldown_tick_ms" });
        }
        if self.complaint_id_prefix.trim().is_empty() {
            return Err(ConfigError::Empty { field: "complaint_id_prefix" });
        }
        if self.fallback_location.trim().is_empty() {
            return Err(ConfigError::Empty { field: "fallback_location" });
        }
        Ok(self)
    }

    #[must_use]
    pub fn otp_send_delay(&self) -> Duration {
        Duration::from_millis(self.otp_send_delay_ms)
    }

    #[must_use]
    pub fn otp_notification(&self) -> Duration {
        Duration::from_millis(self.otp_notification_ms)
    }

    #[must_use]
    pub fn cooldown_tick(&self) -> Duration {
        Duration::from_millis(self.cooldown_tick_ms)
    }

    #[must_use]
    pub fn location_detect_delay(&self) -> Duration {
        Duration::from_millis(self.location_detect_delay_ms)
    }
}
