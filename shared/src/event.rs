use serde::{Deserialize, Serialize};

use crate::capabilities::{CameraResult, LocationResult, TimerId, TimerOutput};
use crate::model::{ComplaintId, Tab};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    /// JSON `PortalConfig` supplied by the shell at start-up.
    ConfigProvided { json: String },

    // Login
    PhoneChanged { value: String },
    PhoneSubmitted,
    OtpChanged { value: String },
    OtpSubmitted,
    ResendRequested,
    ChangeNumberRequested,
    AlertDismissed,

    // Navigation
    CategorySelected { category_id: String },
    ViewAllRequested,
    BackRequested,
    TabSelected { tab: Tab },
    ComplaintCancelled,
    ComplaintToggled { id: ComplaintId },

    // Complaint form
    TypeChanged { value: String },
    DescriptionChanged { value: String },
    LocationChanged { value: String },
    DetectLocationRequested,
    PhotoRequested,
    PhotoRemoved,
    ComplaintSubmitted,

    // Capability responses (boxed to keep enum size small)
    TimerFired { id: TimerId, output: TimerOutput },
    LocationResolved { form: u64, result: Box<LocationResult> },
    PhotoResolved { form: u64, result: Box<CameraResult> },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ConfigProvided { .. } => "config_provided",
            Self::PhoneChanged { .. } => "phone_changed",
            Self::PhoneSubmitted => "phone_submitted",
            Self::OtpChanged { .. } => "otp_changed",
            Self::OtpSubmitted => "otp_submitted",
            Self::ResendRequested => "resend_requested",
            Self::ChangeNumberRequested => "change_number_requested",
            Self::AlertDismissed => "alert_dismissed",
            Self::CategorySelected { .. } => "category_selected",
            Self::ViewAllRequested => "view_all_requested",
            Self::BackRequested => "back_requested",
            Self::TabSelected { .. } => "tab_selected",
            Self::ComplaintCancelled => "complaint_cancelled",
            Self::ComplaintToggled { .. } => "complaint_toggled",
            Self::TypeChanged { .. } => "type_changed",
            Self::DescriptionChanged { .. } => "description_changed",
            Self::LocationChanged { .. } => "location_changed",
            Self::DetectLocationRequested => "detect_location_requested",
            Self::PhotoRequested => "photo_requested",
            Self::PhotoRemoved => "photo_removed",
            Self::ComplaintSubmitted => "complaint_submitted",
            Self::TimerFired { .. } => "timer_fired",
            Self::LocationResolved { .. } => "location_resolved",
            Self::PhotoResolved { .. } => "photo_resolved",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::ConfigProvided { .. }
                | Self::TimerFired { .. }
                | Self::LocationResolved { .. }
                | Self::PhotoResolved { .. }
        )
    }

    /// Login-screen input, which the blocking alert holds back.
    #[must_use]
    pub const fn is_login_input(&self) -> bool {
        matches!(
            self,
            Self::PhoneChanged { .. }
                | Self::PhoneSubmitted
                | Self::OtpChanged { .. }
                | Self::OtpSubmitted
                | Self::ResendRequested
                | Self::ChangeNumberRequested
        )
    }

    /// Edits to the complaint form, only meaningful while it is on screen.
    #[must_use]
    pub const fn is_form_input(&self) -> bool {
        matches!(
            self,
            Self::TypeChanged { .. }
                | Self::DescriptionChanged { .. }
                | Self::LocationChanged { .. }
                | Self::DetectLocationRequested
                | Self::PhotoRequested
                | Self::PhotoRemoved
                | Self::ComplaintSubmitted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_responses_are_not_user_actions() {
        assert!(!Event::TimerFired {
            id: TimerId::new(crate::capabilities::TimerKind::OtpSend, 1),
            output: TimerOutput::Elapsed,
        }
        .is_user_initiated());
        assert!(!Event::ConfigProvided { json: "{}".into() }.is_user_initiated());
        assert!(Event::PhoneSubmitted.is_user_initiated());
        assert!(Event::ComplaintSubmitted.is_user_initiated());
    }

    #[test]
    fn login_input_classification() {
        assert!(Event::OtpChanged { value: "1".into() }.is_login_input());
        assert!(!Event::AlertDismissed.is_login_input());
        assert!(!Event::BackRequested.is_login_input());
        assert!(Event::PhotoRemoved.is_form_input());
        assert!(Event::ComplaintSubmitted.is_form_input());
        assert!(!Event::ComplaintCancelled.is_form_input());
    }

    #[test]
    fn event_names() {
        assert_eq!(Event::PhoneSubmitted.name(), "phone_submitted");
        assert_eq!(
            Event::TabSelected { tab: Tab::Status }.name(),
            "tab_selected"
        );
    }

    #[test]
    fn event_size_is_reasonable() {
        let size = std::mem::size_of::<Event>();
        assert!(size <= 64, "Event enum is {size} bytes, box more variants");
    }
}
