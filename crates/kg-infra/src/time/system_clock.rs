use std::time::{SystemTime, UNIX_EPOCH};

use kg_core::ports::ClockPort;

pub struct SystemClock;

impl ClockPort for SystemClock {
    /// Milliseconds since the UNIX epoch; a clock set before the epoch reads 0.
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or_default()
    }
}
