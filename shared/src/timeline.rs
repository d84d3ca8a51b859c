use serde::Serialize;

use crate::model::ComplaintStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageProgress {
    pub status: ComplaintStatus,
    pub label: &'static str,
    pub is_done: bool,
    pub is_current: bool,
}

#[must_use]
pub const fn stage_label(status: ComplaintStatus) -> &'static str {
    match status {
        ComplaintStatus::Received => "Received",
        ComplaintStatus::Assigned => "Assigned to Dept.",
        ComplaintStatus::InProgress => "In Progress",
        ComplaintStatus::Resolved => "Resolved",
    }
}

/// Progress of every stage relative to `current`: stages up to and including
/// the current one are done, and only the current one is current.
#[must_use]
pub fn derive(current: ComplaintStatus) -> [StageProgress; 4] {
    ComplaintStatus::ALL.map(|status| StageProgress {
        status,
        label: stage_label(status),
        is_done: status.index() <= current.index(),
        is_current: status == current,
    })
}
