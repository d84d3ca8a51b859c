//! Render-ready projection of the model. Everything here is derived; the
//! shell draws it as-is.

use serde::Serialize;

use crate::categories::{self, Category, Icon, FALLBACK_CATEGORY_ID, SLOGANS};
use crate::clock::UnixTimeMs;
use crate::login::{LoginFlow, LoginStep};
use crate::model::{Complaint, Model, Screen, Tab};
use crate::timeline;
use crate::WARD_LABEL;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct HeaderView {
    pub title: String,
    pub show_back: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NavItemView {
    pub tab: Tab,
    pub label: String,
    pub is_active: bool,
}

/// Simulated inbound SMS carrying the verification code.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SmsNotificationView {
    pub sender: String,
    pub code: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LoginView {
    pub step: LoginStep,
    pub heading: String,
    pub prompt: String,
    pub phone: String,
    pub otp: String,
    pub is_loading: bool,
    pub is_success: bool,
    pub can_submit_phone: bool,
    pub can_submit_otp: bool,
    pub can_resend: bool,
    pub resend_label: String,
    pub notification: Option<SmsNotificationView>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ComplaintSummaryView {
    pub id: String,
    pub complaint_type: String,
    pub description: String,
    pub status: String,
    pub is_resolved: bool,
    pub date: String,
    pub photo_url: Option<String>,
    pub icon: Icon,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StageView {
    pub label: String,
    pub is_done: bool,
    pub is_current: bool,
    pub note: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ComplaintCardView {
    pub id: String,
    pub complaint_type: String,
    pub is_expanded: bool,
    pub description: String,
    pub location: String,
    pub reported_on: String,
    pub photo_url: Option<String>,
    pub stages: Vec<StageView>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub enum ScreenView {
    Login(Box<LoginView>),
    Home {
        slogan: String,
        categories: Vec<Category>,
        ward: String,
        recent: Vec<ComplaintSummaryView>,
        /// Category the "raise your first complaint" prompt opens, shown
        /// only while nothing has been filed.
        empty_state_category: Option<String>,
    },
    RaiseComplaint {
        complaint_type: String,
        description: String,
        location: String,
        is_locating: bool,
        photo_url: Option<String>,
        category_names: Vec<String>,
        can_submit: bool,
    },
    StatusTracking {
        complaints: Vec<ComplaintCardView>,
    },
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ViewModel {
    pub screen: ScreenView,
    pub header: Option<HeaderView>,
    pub bottom_nav: Vec<NavItemView>,
    pub alert: Option<String>,
    pub is_logged_in: bool,
}

fn login_view(login: &LoginFlow) -> LoginView {
    let (heading, prompt) = match login.step() {
        LoginStep::Phone => ("Sign In", "Enter your mobile to receive an OTP".to_string()),
        LoginStep::Otp => (
            "Verify Identity",
            format!(
                "Enter the 4-digit code sent to {}",
                login.submitted_phone().map_or(login.phone(), |p| p.as_str())
            ),
        ),
    };
    let resend_label = match login.cooldown_secs() {
        0 => "Resend Code".to_string(),
        secs => format!("Resend in {secs}s"),
    };
    let notification = login
        .generated_otp()
        .filter(|_| login.notification_visible())
        .map(|code| SmsNotificationView {
            sender: "CitizenConnect".to_string(),
            code: code.expose().to_string(),
        });

    LoginView {
        step: login.step(),
        heading: heading.to_string(),
        prompt,
        phone: login.phone().to_string(),
        otp: login.otp().to_string(),
        is_loading: login.is_loading(),
        is_success: login.is_success(),
        can_submit_phone: login.can_submit_phone(),
        can_submit_otp: login.can_submit_otp(),
        can_resend: login.can_resend(),
        resend_label,
        notification,
    }
}

fn summary(complaint: &Complaint) -> ComplaintSummaryView {
    ComplaintSummaryView {
        id: complaint.id().to_string(),
        complaint_type: complaint.complaint_type.clone(),
        description: complaint.description.clone(),
        status: complaint.status.to_string(),
        is_resolved: complaint.status.is_resolved(),
        date: complaint.timestamp().local_date(),
        photo_url: complaint.photo.as_ref().map(|p| p.as_str().to_string()),
        icon: categories::icon_for_type(&complaint.complaint_type),
    }
}

/// Finished stages carry the render date, not a recorded transition date:
/// per-stage history is not kept.
fn stages(complaint: &Complaint, now: UnixTimeMs) -> Vec<StageView> {
    timeline::derive(complaint.status)
        .iter()
        .map(|stage| StageView {
            label: stage.label.to_string(),
            is_done: stage.is_done,
            is_current: stage.is_current,
            note: if stage.is_current {
                Some("Active Stage".to_string())
            } else if stage.is_done {
                Some(format!("Completed on {}", now.local_date()))
            } else {
                None
            },
        })
        .collect()
}

fn card(complaint: &Complaint, is_expanded: bool, now: UnixTimeMs) -> ComplaintCardView {
    ComplaintCardView {
        id: complaint.id().to_string(),
        complaint_type: complaint.complaint_type.clone(),
        is_expanded,
        description: complaint.description.clone(),
        location: complaint.location.clone(),
        reported_on: format!("Reported on {}", complaint.timestamp().local_date_time()),
        photo_url: complaint.photo.as_ref().map(|p| p.as_str().to_string()),
        stages: stages(complaint, now),
    }
}

#[must_use]
pub fn build(model: &Model) -> ViewModel {
    let nav = &model.nav;
    let screen = match nav.screen() {
        Screen::Login => ScreenView::Login(Box::new(login_view(&model.login))),
        Screen::Home => ScreenView::Home {
            slogan: SLOGANS[0].to_string(),
            categories: categories::CATEGORIES.to_vec(),
            ward: WARD_LABEL.to_string(),
            recent: nav
                .complaints()
                .latest(model.config.home_preview_len)
                .iter()
                .map(summary)
                .collect(),
            empty_state_category: nav
                .complaints()
                .is_empty()
                .then(|| FALLBACK_CATEGORY_ID.to_string()),
        },
        Screen::RaiseComplaint => ScreenView::RaiseComplaint {
            complaint_type: model.form.complaint_type.clone(),
            description: model.form.description.clone(),
            location: model.form.location.clone(),
            is_locating: model.form.is_locating(),
            photo_url: model.form.photo().map(|p| p.as_str().to_string()),
            category_names: categories::CATEGORIES
                .iter()
                .map(|c| c.name.to_string())
                .collect(),
            can_submit: model.form.is_complete(),
        },
        Screen::StatusTracking => ScreenView::StatusTracking {
            complaints: nav
                .complaints()
                .all()
                .iter()
                .map(|c| card(c, nav.expanded() == Some(c.id()), model.now))
                .collect(),
        },
    };

    let header = nav.screen().title().map(|title| HeaderView {
        title: title.to_string(),
        show_back: nav.screen().has_back_button(),
    });

    let bottom_nav = if nav.screen() == Screen::Login {
        Vec::new()
    } else {
        Tab::ALL
            .iter()
            .map(|&tab| NavItemView {
                tab,
                label: tab.label().to_string(),
                is_active: tab.screen() == nav.screen(),
            })
            .collect()
    };

    ViewModel {
        screen,
        header,
        bottom_nav,
        alert: model.alert.as_ref().map(|a| a.message.clone()),
        is_logged_in: model.is_logged_in(),
    }
}
