use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct UnixTimeMs(pub u64);

impl UnixTimeMs {
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    fn to_local(self) -> Option<DateTime<Local>> {
        let millis = i64::try_from(self.0).ok()?;
        let utc: DateTime<Utc> = Utc.timestamp_millis_opt(millis).single()?;
        Some(utc.with_timezone(&Local))
    }

    /// Calendar date in the device's local zone, e.g. `19/10/2026`.
    #[must_use]
    pub fn local_date(self) -> String {
        self.to_local()
            .map(|t| t.format("%d/%m/%Y").to_string())
            .unwrap_or_default()
    }

    /// Date and time in the device's local zone, e.g. `19/10/2026, 14:05:09`.
    #[must_use]
    pub fn local_date_time(self) -> String {
        self.to_local()
            .map(|t| t.format("%d/%m/%Y, %H:%M:%S").to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for UnixTimeMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> UnixTimeMs;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTimeMs {
        let millis = Utc::now().timestamp_millis();
        UnixTimeMs(u64::try_from(millis).unwrap_or(0))
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    #[must_use]
    pub fn at(start: UnixTimeMs) -> Self {
        Self {
            now_ms: AtomicU64::new(start.0),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, at: UnixTimeMs) {
        self.now_ms.store(at.0, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> UnixTimeMs {
        UnixTimeMs(self.now_ms.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> UnixTimeMs {
        (**self).now()
    }
}

/// Clock handle owned by the model.
#[derive(Clone)]
pub struct SharedClock(Arc<dyn Clock>);

impl SharedClock {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self(Arc::new(clock))
    }

    #[must_use]
    pub fn now(&self) -> UnixTimeMs {
        self.0.now()
    }
}

impl Default for SharedClock {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl fmt::Debug for SharedClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedClock").field(&self.now()).finish()
    }
}
