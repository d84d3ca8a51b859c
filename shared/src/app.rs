use tracing::{debug, info, warn};

use crate::capabilities::{Capabilities, PickConfig, TimerCommand, TimerKind, TimerOutput};
use crate::config::PortalConfig;
use crate::event::Event;
use crate::login::LoginCommand;
use crate::model::{Alert, Model, Screen};
use crate::view::{self, ViewModel};

#[derive(Default)]
pub struct App;

impl App {
    fn run_timers(commands: impl IntoIterator<Item = TimerCommand>, caps: &Capabilities) {
        for command in commands {
            match command {
                TimerCommand::Start { id, after } => {
                    caps.timer
                        .start(id, after, move |output| Event::TimerFired { id, output });
                }
                TimerCommand::Cancel(id) => caps.timer.cancel(id),
            }
        }
    }

    fn run_login(commands: Vec<LoginCommand>, model: &mut Model, caps: &Capabilities) {
        for command in commands {
            match command {
                LoginCommand::Timer(timer) => Self::run_timers([timer], caps),
                LoginCommand::LoggedIn(phone) => {
                    if let Err(e) = model.nav.login(phone) {
                        warn!(error = %e, "login rejected by navigator");
                    }
                }
                LoginCommand::Alert(message) => model.alert = Some(Alert { message }),
            }
        }
    }

    /// Starts a fresh form whenever the complaint screen is entered, and
    /// drops the old form's pending lookup whenever it is left.
    fn sync_form(previous: Screen, model: &mut Model, caps: &Capabilities) {
        let current = model.nav.screen();
        if previous == current {
            return;
        }
        if current == Screen::RaiseComplaint {
            let category = model.nav.selected_category().to_string();
            let mut old = model.reset_form(&category);
            Self::run_timers(old.teardown(), caps);
        } else if previous == Screen::RaiseComplaint {
            Self::run_timers(model.form.teardown(), caps);
        }
    }

    fn navigate(model: &mut Model, caps: &Capabilities, event: Event) {
        let previous = model.nav.screen();
        let result = match &event {
            Event::CategorySelected { category_id } => model.nav.select_category(category_id),
            Event::ViewAllRequested => model.nav.view_all(),
            Event::BackRequested => model.nav.back(),
            Event::TabSelected { tab } => model.nav.select_tab(*tab),
            Event::ComplaintCancelled => model.nav.cancel_complaint(),
            Event::ComplaintToggled { id } => model.nav.toggle_expanded(id),
            _ => Ok(()),
        };
        if let Err(e) = result {
            warn!(event = event.name(), error = %e, "navigation rejected");
            return;
        }
        Self::sync_form(previous, model, caps);
    }

    fn submit_complaint(model: &mut Model, caps: &Capabilities) {
        let input = match model.form.submission() {
            Ok(input) => input,
            Err(e) => {
                warn!(error = %e, "incomplete complaint");
                return;
            }
        };
        let now = model.now;
        let prefix = model.config.complaint_id_prefix.clone();
        match model.nav.submit_complaint(input, now, &prefix) {
            Ok(id) => {
                debug!(complaint = %id, "form cleared after filing");
                let category = model.nav.selected_category().to_string();
                let mut old = model.reset_form(&category);
                Self::run_timers(old.teardown(), caps);
            }
            Err(e) => warn!(error = %e, "complaint not filed"),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        model.update_timestamp();

        let event_name = event.name();
        if event.is_user_initiated() {
            debug!(event = event_name, "user action");
        } else {
            debug!(event = event_name, "shell reply");
        }

        if model.alert.is_some() && event.is_login_input() {
            debug!(event = event_name, "held back by alert");
            return;
        }
        if event.is_form_input() && model.nav.screen() != Screen::RaiseComplaint {
            warn!(event = event_name, "form input outside the form");
            return;
        }

        match event {
            Event::ConfigProvided { json } => match PortalConfig::from_json(&json) {
                Ok(config) => {
                    info!("portal configuration applied");
                    model.config = config;
                }
                Err(e) => warn!(error = %e, "keeping current configuration"),
            },

            Event::PhoneChanged { value } => model.login.set_phone(&value),

            Event::PhoneSubmitted => match model.login.submit_phone(&model.config) {
                Ok(commands) => Self::run_login(commands, model, caps),
                Err(e) => warn!(error = %e, "phone submission rejected"),
            },

            Event::OtpChanged { value } => {
                let commands = model.login.set_otp(&value);
                Self::run_login(commands, model, caps);
            }

            Event::OtpSubmitted => match model.login.submit_otp() {
                Ok(commands) => Self::run_login(commands, model, caps),
                Err(e) => warn!(error = %e, "code submission rejected"),
            },

            Event::ResendRequested => {
                match model.login.resend(&mut rand::thread_rng(), &model.config) {
                    Ok(commands) => Self::run_login(commands, model, caps),
                    Err(e) => warn!(error = %e, "resend rejected"),
                }
            }

            Event::ChangeNumberRequested => {
                if let Err(e) = model.login.change_number() {
                    warn!(error = %e, "change number rejected");
                }
            }

            Event::AlertDismissed => model.alert = None,

            event @ (Event::CategorySelected { .. }
            | Event::ViewAllRequested
            | Event::BackRequested
            | Event::TabSelected { .. }
            | Event::ComplaintCancelled
            | Event::ComplaintToggled { .. }) => Self::navigate(model, caps, event),

            Event::TypeChanged { value } => model.form.set_type(&value),

            Event::DescriptionChanged { value } => model.form.set_description(&value),

            Event::LocationChanged { value } => {
                let commands = model.form.set_location(&value);
                Self::run_timers(commands, caps);
            }

            Event::DetectLocationRequested => {
                if model.form.begin_locating() {
                    let form = model.form.epoch();
                    caps.geolocation.current_position(move |result| Event::LocationResolved {
                        form,
                        result: Box::new(result),
                    });
                } else {
                    debug!("location lookup already running");
                }
            }

            Event::PhotoRequested => {
                let form = model.form.epoch();
                caps.camera
                    .pick_photo(PickConfig::default(), move |result| Event::PhotoResolved {
                        form,
                        result: Box::new(result),
                    });
            }

            Event::PhotoRemoved => model.form.remove_photo(),

            Event::ComplaintSubmitted => Self::submit_complaint(model, caps),

            Event::TimerFired { output: TimerOutput::Cancelled, id } => {
                debug!(timer = %id, "timer cancelled");
                return;
            }

            Event::TimerFired { id, output: TimerOutput::Elapsed } => {
                if id.kind == TimerKind::LocationDetect {
                    if !model.form.on_timer(id, &model.config) {
                        debug!(timer = %id, "stale location timer");
                    }
                } else {
                    let commands = model.login.on_timer(id, &mut rand::thread_rng(), &model.config);
                    Self::run_login(commands, model, caps);
                }
            }

            Event::LocationResolved { form, result } => {
                if form == model.form.epoch() {
                    let commands = model.form.location_resolved(*result, &model.config);
                    Self::run_timers(commands, caps);
                } else {
                    debug!(form, "location reply for a discarded form");
                }
            }

            Event::PhotoResolved { form, result } => {
                if form != model.form.epoch() {
                    debug!(form, "photo reply for a discarded form");
                } else if let Err(e) = model.form.photo_resolved(*result) {
                    warn!(error = %e, "photo rejected");
                }
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        view::build(model)
    }
}
