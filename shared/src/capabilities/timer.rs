//! One-shot delays resolved by the shell.
//!
//! The core never sleeps. Every simulated latency is a `Start` request the
//! shell answers once the delay has passed, which keeps tests synchronous:
//! they resolve the request immediately.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    OtpSend,
    OtpNotification,
    ResendCooldown,
    LocationDetect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId {
    pub kind: TimerKind,
    pub seq: u64,
}

impl TimerId {
    #[must_use]
    pub const fn new(kind: TimerKind, seq: u64) -> Self {
        Self { kind, seq }
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.kind, self.seq)
    }
}

/// Hands out timer ids. A counter is moved along, never restarted, when its
/// owner is replaced, so a late firing can always be told apart from the
/// live timer.
#[derive(Debug, Clone, Default)]
pub struct TimerIds {
    next: u64,
}

impl TimerIds {
    pub fn next(&mut self, kind: TimerKind) -> TimerId {
        self.next += 1;
        TimerId::new(kind, self.next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerOperation {
    Start { id: TimerId, millis: u64 },
    Cancel { id: TimerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerOutput {
    Elapsed,
    Cancelled,
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

/// Side effect a state machine asks the update loop to perform on its behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start { id: TimerId, after: Duration },
    Cancel(TimerId),
}

pub struct Timer<Ev> {
    context: CapabilityContext<TimerOperation, Ev>,
}

impl<Ev> Capability<Ev> for Timer<Ev> {
    type Operation = TimerOperation;
    type MappedSelf<MappedEv> = Timer<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Timer::new(self.context.map_event(f))
    }
}

impl<Ev> Timer<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<TimerOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn start<F>(&self, id: TimerId, after: Duration, callback: F)
    where
        F: FnOnce(TimerOutput) -> Ev + Send + 'static,
    {
        let millis = u64::try_from(after.as_millis()).unwrap_or(u64::MAX);
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(TimerOperation::Start { id, millis })
                .await;
            ctx.update_app(callback(output));
        });
    }

    pub fn cancel(&self, id: TimerId) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(TimerOperation::Cancel { id }).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut ids = TimerIds::default();
        let a = ids.next(TimerKind::OtpSend);
        let b = ids.next(TimerKind::OtpSend);
        assert_ne!(a, b);
        assert_eq!(a.kind, b.kind);
    }

    #[test]
    fn display_names_kind_and_seq() {
        let id = TimerId::new(TimerKind::ResendCooldown, 7);
        assert_eq!(id.to_string(), "ResendCooldown#7");
    }
}
