//! Screen selection and the session's complaint collection.
//!
//! Navigation is flat: every back action lands on Home, never on the
//! previously visited screen.

use tracing::{debug, info};

use crate::clock::UnixTimeMs;
use crate::error::TransitionError;
use crate::login::PhoneNumber;
use crate::model::{Complaint, ComplaintId, NewComplaint, Screen, Tab};

/// Complaints filed this session, most recent first.
#[derive(Debug, Default)]
pub struct ComplaintBook {
    complaints: Vec<Complaint>,
    issued: u64,
}

impl ComplaintBook {
    /// Stamps id, timestamp and `Received` status and puts the complaint at
    /// the front. Ids come from a session counter and never repeat.
    pub fn file(&mut self, input: NewComplaint, now: UnixTimeMs, prefix: &str) -> &Complaint {
        self.issued += 1;
        let id = ComplaintId::new(format!("{prefix}-{:04}", self.issued));
        self.complaints.insert(0, Complaint::file(id, now, input));
        &self.complaints[0]
    }

    pub fn all(&self) -> &[Complaint] {
        &self.complaints
    }

    pub fn latest(&self, n: usize) -> &[Complaint] {
        &self.complaints[..n.min(self.complaints.len())]
    }

    pub fn get(&self, id: &ComplaintId) -> Option<&Complaint> {
        self.complaints.iter().find(|c| c.id() == id)
    }

    pub fn len(&self) -> usize {
        self.complaints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complaints.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Navigator {
    screen: Screen,
    is_logged_in: bool,
    phone: Option<PhoneNumber>,
    /// Category id carried from Home into the complaint form.
    selected_category: String,
    /// The one complaint card expanded on the status screen.
    expanded: Option<ComplaintId>,
    complaints: ComplaintBook,
}

impl Navigator {
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    pub fn expanded(&self) -> Option<&ComplaintId> {
        self.expanded.as_ref()
    }

    pub fn complaints(&self) -> &ComplaintBook {
        &self.complaints
    }

    fn require(&self, action: &'static str, allowed: &[Screen]) -> Result<(), TransitionError> {
        if allowed.contains(&self.screen) {
            Ok(())
        } else {
            Err(TransitionError::NotOnScreen {
                action,
                screen: self.screen,
            })
        }
    }

    fn go(&mut self, to: Screen) {
        debug!(from = ?self.screen, ?to, "navigate");
        if to == Screen::StatusTracking && self.screen != Screen::StatusTracking {
            // A freshly opened status screen expands the newest complaint.
            self.expanded = self.complaints.all().first().map(|c| c.id().clone());
        }
        self.screen = to;
    }

    pub fn login(&mut self, phone: PhoneNumber) -> Result<(), TransitionError> {
        self.require("login", &[Screen::Login])?;
        self.is_logged_in = true;
        self.phone = Some(phone);
        info!("citizen signed in");
        self.go(Screen::Home);
        Ok(())
    }

    pub fn select_category(&mut self, category_id: &str) -> Result<(), TransitionError> {
        self.require("select_category", &[Screen::Home])?;
        self.selected_category = category_id.to_string();
        self.go(Screen::RaiseComplaint);
        Ok(())
    }

    pub fn view_all(&mut self) -> Result<(), TransitionError> {
        self.require("view_all", &[Screen::Home])?;
        self.go(Screen::StatusTracking);
        Ok(())
    }

    pub fn cancel_complaint(&mut self) -> Result<(), TransitionError> {
        self.require("cancel_complaint", &[Screen::RaiseComplaint])?;
        self.go(Screen::Home);
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), TransitionError> {
        self.require("back", &[Screen::RaiseComplaint, Screen::StatusTracking])?;
        self.go(Screen::Home);
        Ok(())
    }

    /// Bottom navigation. Available on every screen except Login.
    pub fn select_tab(&mut self, tab: Tab) -> Result<(), TransitionError> {
        self.require(
            "select_tab",
            &[Screen::Home, Screen::RaiseComplaint, Screen::StatusTracking],
        )?;
        self.go(tab.screen());
        Ok(())
    }

    /// Files the complaint and moves to status tracking with it expanded.
    pub fn submit_complaint(
        &mut self,
        input: NewComplaint,
        now: UnixTimeMs,
        id_prefix: &str,
    ) -> Result<ComplaintId, TransitionError> {
        self.require("submit_complaint", &[Screen::RaiseComplaint])?;
        let id = self.complaints.file(input, now, id_prefix).id().clone();
        info!(complaint = %id, total = self.complaints.len(), "complaint filed");
        self.go(Screen::StatusTracking);
        self.expanded = Some(id.clone());
        Ok(id)
    }

    /// Expands a complaint card, or collapses it if it is already open.
    pub fn toggle_expanded(&mut self, id: &ComplaintId) -> Result<(), TransitionError> {
        self.require("toggle_expanded", &[Screen::StatusTracking])?;
        if self.expanded.as_ref() == Some(id) {
            self.expanded = None;
        } else if self.complaints.get(id).is_some() {
            self.expanded = Some(id.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComplaintStatus;

    fn input(kind: &str) -> NewComplaint {
        NewComplaint {
            complaint_type: kind.into(),
            description: "No water since 3 days".into(),
            location: "Ward 12".into(),
            photo: None,
        }
    }

    fn logged_in() -> Navigator {
        let mut nav = Navigator::default();
        nav.login(PhoneNumber::parse("9876543210").unwrap()).unwrap();
        nav
    }

    #[test]
    fn starts_on_login_and_logs_in_to_home() {
        let mut nav = Navigator::default();
        assert_eq!(nav.screen(), Screen::Login);
        assert!(!nav.is_logged_in());

        nav.login(PhoneNumber::parse("9876543210").unwrap()).unwrap();
        assert_eq!(nav.screen(), Screen::Home);
        assert!(nav.is_logged_in());
        assert_eq!(nav.phone().map(PhoneNumber::as_str), Some("9876543210"));
    }

    #[test]
    fn second_login_is_rejected() {
        let mut nav = logged_in();
        let err = nav.login(PhoneNumber::parse("9876543210").unwrap()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::NotOnScreen { action: "login", screen: Screen::Home }
        );
    }

    #[test]
    fn tabs_unavailable_before_login() {
        let mut nav = Navigator::default();
        assert!(nav.select_tab(Tab::Status).is_err());
        assert_eq!(nav.screen(), Screen::Login);
    }

    #[test]
    fn select_category_carries_id() {
        let mut nav = logged_in();
        nav.select_category("water").unwrap();
        assert_eq!(nav.screen(), Screen::RaiseComplaint);
        assert_eq!(nav.selected_category(), "water");
    }

    #[test]
    fn back_always_returns_home() {
        let mut nav = logged_in();
        nav.view_all().unwrap();
        nav.select_tab(Tab::Report).unwrap();
        nav.back().unwrap();
        assert_eq!(nav.screen(), Screen::Home);
        assert!(nav.back().is_err());
    }

    #[test]
    fn cancel_returns_home() {
        let mut nav = logged_in();
        nav.select_category("roads").unwrap();
        nav.cancel_complaint().unwrap();
        assert_eq!(nav.screen(), Screen::Home);
    }

    #[test]
    fn submit_prepends_and_moves_to_status() {
        let mut nav = logged_in();
        nav.select_category("garbage").unwrap();
        let first = nav.submit_complaint(input("Garbage"), UnixTimeMs(100), "CMP").unwrap();

        nav.select_tab(Tab::Report).unwrap();
        let second = nav.submit_complaint(input("Water Supply"), UnixTimeMs(200), "CMP").unwrap();

        assert_eq!(nav.screen(), Screen::StatusTracking);
        assert_eq!(nav.expanded(), Some(&second));
        let ids: Vec<_> = nav.complaints().all().iter().map(|c| c.id().clone()).collect();
        assert_eq!(ids, vec![second.clone(), first]);

        let newest = &nav.complaints().all()[0];
        assert_eq!(newest.status, ComplaintStatus::Received);
        assert_eq!(newest.complaint_type, "Water Supply");
        assert_eq!(newest.timestamp(), UnixTimeMs(200));
        assert_eq!(second.as_str(), "CMP-0002");
    }

    #[test]
    fn submit_outside_form_is_rejected() {
        let mut nav = logged_in();
        assert!(nav.submit_complaint(input("Roads"), UnixTimeMs(1), "CMP").is_err());
        assert!(nav.complaints().is_empty());
    }

    #[test]
    fn latest_is_bounded() {
        let mut book = ComplaintBook::default();
        assert!(book.latest(3).is_empty());
        for i in 0..5 {
            book.file(input("Roads"), UnixTimeMs(i), "CMP");
        }
        assert_eq!(book.latest(3).len(), 3);
        assert_eq!(book.latest(3)[0].id().as_str(), "CMP-0005");
        assert_eq!(book.latest(10).len(), 5);
    }

    #[test]
    fn opening_status_expands_newest() {
        let mut nav = logged_in();
        nav.select_category("roads").unwrap();
        let id = nav.submit_complaint(input("Roads"), UnixTimeMs(1), "CMP").unwrap();
        nav.toggle_expanded(&id).unwrap();
        assert_eq!(nav.expanded(), None);

        nav.back().unwrap();
        nav.view_all().unwrap();
        assert_eq!(nav.expanded(), Some(&id));
    }

    #[test]
    fn toggle_switches_between_cards() {
        let mut nav = logged_in();
        nav.select_category("roads").unwrap();
        let a = nav.submit_complaint(input("Roads"), UnixTimeMs(1), "CMP").unwrap();
        nav.select_tab(Tab::Report).unwrap();
        let b = nav.submit_complaint(input("Roads"), UnixTimeMs(2), "CMP").unwrap();

        nav.toggle_expanded(&a).unwrap();
        assert_eq!(nav.expanded(), Some(&a));
        nav.toggle_expanded(&b).unwrap();
        assert_eq!(nav.expanded(), Some(&b));
        nav.toggle_expanded(&ComplaintId::new("CMP-9999")).unwrap();
        assert_eq!(nav.expanded(), Some(&b));
    }
}
