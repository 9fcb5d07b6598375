/// Source of wall-clock timestamps for the engagement log and console.
///
/// Injected so tests can pin time instead of reading the system clock.
pub trait WallClock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl WallClock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that returns a caller-controlled instant.
#[derive(Debug, Default)]
pub struct FixedClock {
    now_ms: std::cell::Cell<i64>,
}

impl FixedClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: std::cell::Cell::new(now_ms),
        }
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }
}

impl WallClock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}
