//! Headless core of the CitizenConnect municipal complaint portal.
//!
//! All behaviour lives here and is driven by [`Event`]s; platform shells
//! render the [`ViewModel`] and perform the effects the core requests
//! (timers, geolocation, photo capture).

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod categories;
pub mod clock;
pub mod complaint_form;
pub mod config;
pub mod error;
pub mod event;
pub mod login;
pub mod model;
pub mod navigation;
pub mod timeline;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::PortalConfig;
pub use error::{PortalError, PortalResult};
pub use event::Event;
pub use model::Model;
pub use view::ViewModel;

/// Simulated SMS gateway latency before the code screen appears.
pub const OTP_SEND_DELAY_MS: u64 = 1200;
/// How long the incoming-code notification stays on screen.
pub const OTP_NOTIFICATION_MS: u64 = 8000;
pub const RESEND_COOLDOWN_SECS: u32 = 30;
pub const COOLDOWN_TICK_MS: u64 = 1000;
/// Simulated reverse-geocoding delay after a position fix.
pub const LOCATION_DETECT_DELAY_MS: u64 = 1500;
pub const FALLBACK_LOCATION: &str = "Ward 12, Market Area";
pub const COMPLAINT_ID_PREFIX: &str = "CMP";
pub const HOME_PREVIEW_LEN: usize = 3;
pub const WARD_LABEL: &str = "Ward No. 12 - Market Area";
