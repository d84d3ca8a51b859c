use serde::{Deserialize, Serialize};
use std::fmt;

use crate::capabilities::PhotoRef;
use crate::clock::{SharedClock, UnixTimeMs};
use crate::complaint_form::ComplaintForm;
use crate::config::PortalConfig;
use crate::login::LoginFlow;
use crate::navigation::Navigator;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplaintId(String);

impl ComplaintId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolution stages, in the order a complaint moves through them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Received,
    Assigned,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [
        ComplaintStatus::Received,
        ComplaintStatus::Assigned,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Received => 0,
            Self::Assigned => 1,
            Self::InProgress => 2,
            Self::Resolved => 3,
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Received => "Received",
            Self::Assigned => "Assigned to Department",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }

    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What the complaint form hands over on submission. The receiver stamps
/// `id`, `timestamp` and `status`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewComplaint {
    pub complaint_type: String,
    pub description: String,
    pub location: String,
    pub photo: Option<PhotoRef>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Complaint {
    id: ComplaintId,
    timestamp: UnixTimeMs,
    pub complaint_type: String,
    pub description: String,
    pub location: String,
    pub status: ComplaintStatus,
    pub photo: Option<PhotoRef>,
}

impl Complaint {
    /// Every complaint starts out `Received`.
    #[must_use]
    pub fn file(id: ComplaintId, timestamp: UnixTimeMs, input: NewComplaint) -> Self {
        Self {
            id,
            timestamp,
            complaint_type: input.complaint_type,
            description: input.description,
            location: input.location,
            status: ComplaintStatus::Received,
            photo: input.photo,
        }
    }

    pub fn id(&self) -> &ComplaintId {
        &self.id
    }

    pub fn timestamp(&self) -> UnixTimeMs {
        self.timestamp
    }
}

// Redact debug output because this can contain citizen-provided text.
impl fmt::Debug for Complaint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Complaint")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp)
            .field("complaint_type", &self.complaint_type)
            .field("description_len", &self.description.len())
            .field("status", &self.status)
            .field("photo_present", &self.photo.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Login,
    Home,
    RaiseComplaint,
    StatusTracking,
}

impl Screen {
    /// Header title; the login screen has no header.
    #[must_use]
    pub const fn title(self) -> Option<&'static str> {
        match self {
            Self::Login => None,
            Self::Home => Some("Citizen Portal"),
            Self::RaiseComplaint => Some("New Complaint"),
            Self::StatusTracking => Some("Status Tracking"),
        }
    }

    #[must_use]
    pub const fn has_back_button(self) -> bool {
        matches!(self, Self::RaiseComplaint | Self::StatusTracking)
    }
}

/// Bottom navigation entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    Home,
    Report,
    Status,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Report, Tab::Status];

    #[must_use]
    pub const fn screen(self) -> Screen {
        match self {
            Self::Home => Screen::Home,
            Self::Report => Screen::RaiseComplaint,
            Self::Status => Screen::StatusTracking,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Report => "Report",
            Self::Status => "Status",
        }
    }
}

/// Blocking, shell-rendered message the citizen must dismiss.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
}

/// Application root state. Shells never write into it directly; every change
/// goes through an `Event`.
#[derive(Debug, Default)]
pub struct Model {
    pub config: PortalConfig,
    pub clock: SharedClock,
    /// Refreshed from `clock` at the start of every update.
    pub now: UnixTimeMs,
    pub login: LoginFlow,
    pub nav: Navigator,
    pub form: ComplaintForm,
    pub alert: Option<Alert>,
    pub(crate) form_epochs: u64,
}

impl Model {
    #[must_use]
    pub fn with_clock(clock: SharedClock) -> Self {
        let now = clock.now();
        Self {
            clock,
            now,
            ..Self::default()
        }
    }

    pub fn update_timestamp(&mut self) {
        self.now = self.clock.now();
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.nav.is_logged_in()
    }

    /// Replaces the complaint form with a fresh one for `category_id`.
    pub(crate) fn reset_form(&mut self, category_id: &str) -> ComplaintForm {
        self.form_epochs += 1;
        let next = self.form.successor(self.form_epochs, category_id);
        std::mem::replace(&mut self.form, next)
    }
}
