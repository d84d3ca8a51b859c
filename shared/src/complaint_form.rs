//! The "New Complaint" form: field state, location detection and photo
//! evidence.
//!
//! Location detection asks the shell for a position. A fix is shown after a
//! short simulated lookup; any failure falls back to the ward placeholder at
//! once. Both paths write the same field the citizen can type into.

use std::fmt;
use tracing::{debug, warn};

use crate::capabilities::{
    CameraOutput, CameraResult, Coordinates, LocationResult, PhotoRef, TimerCommand, TimerId,
    TimerIds, TimerKind,
};
use crate::categories;
use crate::config::PortalConfig;
use crate::error::ValidationError;
use crate::model::NewComplaint;

/// Location text shown after a successful fix.
#[must_use]
pub fn describe_position(position: Coordinates, ward: &str) -> String {
    format!(
        "Lat: {:.4}, Lng: {:.4} ({ward})",
        position.latitude, position.longitude
    )
}

#[derive(Default)]
pub struct ComplaintForm {
    /// Identifies this form instance; replies addressed to an older form are
    /// dropped.
    epoch: u64,
    pub complaint_type: String,
    pub description: String,
    pub location: String,
    photo: Option<PhotoRef>,
    is_locating: bool,
    pending_fix: Option<(TimerId, Coordinates)>,
    ids: TimerIds,
}

impl fmt::Debug for ComplaintForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplaintForm")
            .field("epoch", &self.epoch)
            .field("complaint_type", &self.complaint_type)
            .field("description_len", &self.description.len())
            .field("has_location", &!self.location.is_empty())
            .field("photo_present", &self.photo.is_some())
            .field("is_locating", &self.is_locating)
            .finish_non_exhaustive()
    }
}

impl ComplaintForm {
    /// A blank form pre-filled from the category picked on Home. Unknown ids
    /// are kept as free text.
    #[must_use]
    pub fn for_category(epoch: u64, category_id: &str) -> Self {
        let complaint_type = categories::by_id(category_id)
            .map_or_else(|| category_id.to_string(), |c| c.name.to_string());
        Self {
            epoch,
            complaint_type,
            ..Self::default()
        }
    }

    /// Replacement form for the next visit. The timer counter carries over so
    /// a delay still pending from this form can never match the new one.
    #[must_use]
    pub fn successor(&self, epoch: u64, category_id: &str) -> Self {
        Self {
            ids: self.ids.clone(),
            ..Self::for_category(epoch, category_id)
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn photo(&self) -> Option<&PhotoRef> {
        self.photo.as_ref()
    }

    pub fn is_locating(&self) -> bool {
        self.is_locating
    }

    pub fn set_type(&mut self, value: &str) {
        self.complaint_type = value.to_string();
    }

    pub fn set_description(&mut self, value: &str) {
        self.description = value.to_string();
    }

    /// Manual entry. Also wins over a lookup still in flight.
    pub fn set_location(&mut self, value: &str) -> Vec<TimerCommand> {
        self.location = value.to_string();
        self.stop_locating()
    }

    /// Returns `false` when a lookup is already running.
    pub fn begin_locating(&mut self) -> bool {
        if self.is_locating {
            return false;
        }
        self.is_locating = true;
        true
    }

    pub fn location_resolved(
        &mut self,
        result: LocationResult,
        config: &PortalConfig,
    ) -> Vec<TimerCommand> {
        if !self.is_locating {
            debug!("location reply after detection ended");
            return Vec::new();
        }
        match result {
            Ok(position) => {
                let id = self.ids.next(TimerKind::LocationDetect);
                self.pending_fix = Some((id, position));
                vec![TimerCommand::Start {
                    id,
                    after: config.location_detect_delay(),
                }]
            }
            Err(e) => {
                debug!(error = %e, "location unavailable, using fallback");
                self.location = config.fallback_location.clone();
                self.is_locating = false;
                Vec::new()
            }
        }
    }

    /// Returns `true` if the timer belonged to this form.
    pub fn on_timer(&mut self, id: TimerId, config: &PortalConfig) -> bool {
        match self.pending_fix {
            Some((pending, position)) if pending == id => {
                self.pending_fix = None;
                self.is_locating = false;
                self.location = describe_position(position, &config.fallback_location);
                true
            }
            _ => false,
        }
    }

    pub fn photo_resolved(&mut self, result: CameraResult) -> Result<(), ValidationError> {
        match result {
            Ok(CameraOutput::Photo(photo)) => {
                self.photo = Some(PhotoRef::try_from(&photo)?);
                Ok(())
            }
            Ok(CameraOutput::Cancelled) => Ok(()),
            Err(e) => {
                warn!(error = %e, "photo capture failed");
                Ok(())
            }
        }
    }

    pub fn remove_photo(&mut self) {
        self.photo = None;
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.submission().is_ok()
    }

    /// Type, description and location are required; the photo is optional.
    pub fn submission(&self) -> Result<NewComplaint, ValidationError> {
        let required = [
            ("type", &self.complaint_type),
            ("description", &self.description),
            ("location", &self.location),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ValidationError::MissingField(*field));
        }
        Ok(NewComplaint {
            complaint_type: self.complaint_type.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            photo: self.photo.clone(),
        })
    }

    fn stop_locating(&mut self) -> Vec<TimerCommand> {
        self.is_locating = false;
        self.pending_fix
            .take()
            .map(|(id, _)| TimerCommand::Cancel(id))
            .into_iter()
            .collect()
    }

    /// Cancels the pending lookup delay. Called when the form is discarded.
    pub fn teardown(&mut self) -> Vec<TimerCommand> {
        self.stop_locating()
    }
}
