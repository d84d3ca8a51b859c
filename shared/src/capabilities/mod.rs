//! Side effects the core asks the shell to perform.
//!
//! Rendering uses Crux's built-in Render capability directly. Timers,
//! geolocation and photo capture are small custom capabilities; the shell
//! owns the platform APIs behind them.

mod camera;
mod location;
mod timer;

pub use self::camera::{
    Camera, CameraError, CameraOperation, CameraOutput, CameraResult, CapturedPhoto, ImageFormat,
    PhotoRef, PickConfig,
};
pub use self::location::{
    Coordinates, Geolocation, GeolocationOperation, LocationError, LocationResult,
};
pub use self::timer::{
    Timer, TimerCommand, TimerId, TimerIds, TimerKind, TimerOperation, TimerOutput,
};
pub use crux_core::render::Render;

// The `Effect` derive refers to the app by this name.
use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub timer: Timer<Event>,
    pub geolocation: Geolocation<Event>,
    pub camera: Camera<Event>,
}
