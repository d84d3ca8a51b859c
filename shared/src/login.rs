//! Phone number → one-time code → verified.
//!
//! `LoginFlow` is a plain state machine. It never touches capabilities; each
//! transition returns the `LoginCommand`s the update loop must carry out
//! (start or cancel a timer, raise the alert, complete the login).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument};

use crate::capabilities::{TimerCommand, TimerId, TimerIds, TimerKind};
use crate::config::PortalConfig;
use crate::error::{PortalResult, TransitionError, ValidationError};

pub const PHONE_DIGITS: usize = 10;
pub const OTP_DIGITS: usize = 4;

fn digits_only(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// A ten digit mobile number.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let all_digits = raw.chars().all(|c| c.is_ascii_digit());
        if !all_digits || raw.len() != PHONE_DIGITS {
            return Err(ValidationError::PhoneLength {
                len: raw.chars().filter(char::is_ascii_digit).count(),
                expected: PHONE_DIGITS,
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Only the last two digits make it into logs.
impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tail = self.0.get(PHONE_DIGITS - 2..).unwrap_or_default();
        write!(f, "PhoneNumber(********{tail})")
    }
}

/// A four digit verification code.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Draws a code in `1000..=9999`, so it never starts with a zero.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(1000..=9999_u16).to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn matches(&self, entered: &str) -> bool {
        self.0 == entered
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginStep {
    #[default]
    Phone,
    Otp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginCommand {
    Timer(TimerCommand),
    /// Verification succeeded; emitted at most once per flow.
    LoggedIn(PhoneNumber),
    /// Blocking alert for the citizen.
    Alert(String),
}

impl From<TimerCommand> for LoginCommand {
    fn from(cmd: TimerCommand) -> Self {
        LoginCommand::Timer(cmd)
    }
}

#[derive(Default)]
pub struct LoginFlow {
    step: LoginStep,
    phone: String,
    /// Number the current code was sent to.
    submitted: Option<PhoneNumber>,
    otp: String,
    generated_otp: Option<OtpCode>,
    is_loading: bool,
    is_success: bool,
    notification_visible: bool,
    /// Seconds until resend unlocks.
    timer: u32,
    send_timer: Option<TimerId>,
    notification_timer: Option<TimerId>,
    cooldown_timer: Option<TimerId>,
    ids: TimerIds,
}

/// Typed digits are never printed; only their count.
impl fmt::Debug for LoginFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginFlow")
            .field("step", &self.step)
            .field("phone_digits", &self.phone.len())
            .field("submitted", &self.submitted)
            .field("otp_digits", &self.otp.len())
            .field("generated_otp", &self.generated_otp)
            .field("is_loading", &self.is_loading)
            .field("is_success", &self.is_success)
            .field("notification_visible", &self.notification_visible)
            .field("timer", &self.timer)
            .field("pending", &self.pending_timers().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl LoginFlow {
    pub fn step(&self) -> LoginStep {
        self.step
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn submitted_phone(&self) -> Option<&PhoneNumber> {
        self.submitted.as_ref()
    }

    pub fn otp(&self) -> &str {
        &self.otp
    }

    pub fn generated_otp(&self) -> Option<&OtpCode> {
        self.generated_otp.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_success(&self) -> bool {
        self.is_success
    }

    pub fn notification_visible(&self) -> bool {
        self.notification_visible
    }

    pub fn cooldown_secs(&self) -> u32 {
        self.timer
    }

    pub fn can_resend(&self) -> bool {
        self.step == LoginStep::Otp && self.timer == 0 && !self.is_success
    }

    pub fn can_submit_phone(&self) -> bool {
        self.step == LoginStep::Phone && self.phone.len() == PHONE_DIGITS && !self.is_loading
    }

    pub fn can_submit_otp(&self) -> bool {
        self.step == LoginStep::Otp && self.otp.len() == OTP_DIGITS && !self.is_success
    }

    /// Keeps digits only, at most ten of them.
    pub fn set_phone(&mut self, raw: &str) {
        if self.is_success || self.is_loading {
            return;
        }
        self.phone = digits_only(raw, PHONE_DIGITS);
    }

    /// Starts sending a code to the entered number.
    pub fn submit_phone(
        &mut self,
        config: &PortalConfig,
    ) -> PortalResult<Vec<LoginCommand>> {
        if self.step != LoginStep::Phone {
            return Err(TransitionError::WrongStep("submit_phone").into());
        }
        if self.is_loading {
            return Err(TransitionError::SendInFlight.into());
        }
        self.submitted = Some(PhoneNumber::parse(&self.phone)?);

        let id = self.ids.next(TimerKind::OtpSend);
        self.send_timer = Some(id);
        self.is_loading = true;
        debug!(timer = %id, "sending verification code");
        Ok(vec![TimerCommand::Start {
            id,
            after: config.otp_send_delay(),
        }
        .into()])
    }

    /// Keeps digits only, at most four of them. A full code is verified
    /// straight away.
    pub fn set_otp(&mut self, raw: &str) -> Vec<LoginCommand> {
        if self.is_success || self.step != LoginStep::Otp {
            return Vec::new();
        }
        self.otp = digits_only(raw, OTP_DIGITS);
        if self.otp.len() == OTP_DIGITS {
            self.verify()
        } else {
            Vec::new()
        }
    }

    /// Explicit "Verify & Continue"; same check as auto-verification.
    pub fn submit_otp(&mut self) -> PortalResult<Vec<LoginCommand>> {
        if self.step != LoginStep::Otp {
            return Err(TransitionError::WrongStep("submit_otp").into());
        }
        if self.is_success {
            return Err(TransitionError::AlreadyVerified.into());
        }
        if self.otp.len() != OTP_DIGITS {
            return Err(ValidationError::OtpLength {
                len: self.otp.len(),
                expected: OTP_DIGITS,
            }
            .into());
        }
        Ok(self.verify())
    }

    fn verify(&mut self) -> Vec<LoginCommand> {
        let (Some(expected), Some(phone)) = (self.generated_otp.as_ref(), self.submitted.as_ref())
        else {
            return Vec::new();
        };

        if expected.matches(&self.otp) {
            let phone = phone.clone();
            self.is_success = true;
            info!("verification code accepted");
            let mut commands = vec![LoginCommand::LoggedIn(phone)];
            commands.extend(self.teardown());
            commands
        } else {
            debug!("verification code mismatch");
            let message = format!("Invalid OTP! Please use the code: {}", expected.expose());
            self.otp.clear();
            vec![LoginCommand::Alert(message)]
        }
    }

    /// Issues a fresh code once the cooldown has run out.
    pub fn resend<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        config: &PortalConfig,
    ) -> Result<Vec<LoginCommand>, TransitionError> {
        if self.step != LoginStep::Otp {
            return Err(TransitionError::WrongStep("resend"));
        }
        if self.is_success {
            return Err(TransitionError::AlreadyVerified);
        }
        if self.timer > 0 {
            return Err(TransitionError::CooldownActive {
                remaining_secs: self.timer,
            });
        }
        self.otp.clear();
        Ok(self.issue_code(rng, config))
    }

    /// Back to phone entry. The number is kept for editing; the cooldown
    /// keeps running.
    pub fn change_number(&mut self) -> Result<(), TransitionError> {
        if self.step != LoginStep::Otp {
            return Err(TransitionError::WrongStep("change_number"));
        }
        if self.is_success {
            return Err(TransitionError::AlreadyVerified);
        }
        self.step = LoginStep::Phone;
        self.otp.clear();
        Ok(())
    }

    /// Routes a fired timer. Timers this flow no longer tracks are ignored.
    #[instrument(skip_all, fields(timer = %id))]
    pub fn on_timer<R: Rng + ?Sized>(
        &mut self,
        id: TimerId,
        rng: &mut R,
        config: &PortalConfig,
    ) -> Vec<LoginCommand> {
        if self.send_timer == Some(id) {
            self.send_timer = None;
            self.is_loading = false;
            self.step = LoginStep::Otp;
            return self.issue_code(rng, config);
        }

        if self.notification_timer == Some(id) {
            self.notification_timer = None;
            self.notification_visible = false;
            return Vec::new();
        }

        if self.cooldown_timer == Some(id) {
            self.cooldown_timer = None;
            self.timer = self.timer.saturating_sub(1);
            if self.timer > 0 {
                let next = self.ids.next(TimerKind::ResendCooldown);
                self.cooldown_timer = Some(next);
                return vec![TimerCommand::Start {
                    id: next,
                    after: config.cooldown_tick(),
                }
                .into()];
            }
            debug!("resend unlocked");
            return Vec::new();
        }

        debug!("ignoring stale timer");
        Vec::new()
    }

    fn issue_code<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        config: &PortalConfig,
    ) -> Vec<LoginCommand> {
        let mut commands: Vec<LoginCommand> = Vec::with_capacity(4);
        for stale in [self.notification_timer.take(), self.cooldown_timer.take()]
            .into_iter()
            .flatten()
        {
            commands.push(TimerCommand::Cancel(stale).into());
        }

        self.generated_otp = Some(OtpCode::generate(rng));
        self.notification_visible = true;
        self.timer = config.resend_cooldown_secs;

        let notification = self.ids.next(TimerKind::OtpNotification);
        self.notification_timer = Some(notification);
        commands.push(
            TimerCommand::Start {
                id: notification,
                after: config.otp_notification(),
            }
            .into(),
        );

        if self.timer > 0 {
            let tick = self.ids.next(TimerKind::ResendCooldown);
            self.cooldown_timer = Some(tick);
            commands.push(
                TimerCommand::Start {
                    id: tick,
                    after: config.cooldown_tick(),
                }
                .into(),
            );
        }

        info!(cooldown_secs = self.timer, "verification code issued");
        commands
    }

    /// Cancels every pending timer. Called when the login screen goes away.
    pub fn teardown(&mut self) -> Vec<LoginCommand> {
        [
            self.send_timer.take(),
            self.notification_timer.take(),
            self.cooldown_timer.take(),
        ]
        .into_iter()
        .flatten()
        .map(|id| TimerCommand::Cancel(id).into())
        .collect()
    }

    /// Timers this flow is waiting on.
    pub fn pending_timers(&self) -> impl Iterator<Item = TimerId> + '_ {
        [self.send_timer, self.notification_timer, self.cooldown_timer]
            .into_iter()
            .flatten()
    }
}
