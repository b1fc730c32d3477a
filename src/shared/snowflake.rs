//! Snowflake ID Generator
//!
//! Time-ordered 63-bit identifiers for clinic records.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Default epoch (2024-01-01T00:00:00.000Z)
pub const CLINIC_EPOCH: u64 = 1704067200000;

const SEQUENCE_MASK: u64 = 0xFFF;

#[derive(Default)]
struct State {
    last_timestamp: u64,
    sequence: u64,
}

/// Snowflake ID generator
pub struct SnowflakeGenerator {
    epoch: u64,
    machine_id: u64,
    state: Mutex<State>,
}

impl SnowflakeGenerator {
    /// Create a generator using the default epoch
    pub fn new(machine_id: u64) -> Self {
        Self::with_epoch(machine_id, CLINIC_EPOCH)
    }

    /// Create a generator counting milliseconds from a custom epoch
    pub fn with_epoch(machine_id: u64, epoch: u64) -> Self {
        Self {
            epoch,
            machine_id: machine_id & 0x3FF, // 10 bits
            state: Mutex::new(State::default()),
        }
    }

    /// Generate a new snowflake ID
    ///
    /// At most 4096 IDs are issued per millisecond; past that the call waits
    /// for the clock to advance. A clock that steps backwards keeps the last
    /// seen millisecond.
    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock();
        let mut timestamp = current_timestamp().max(state.last_timestamp);

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                timestamp = wait_next_millis(state.last_timestamp);
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = timestamp;

        let id = (timestamp.saturating_sub(self.epoch) << 22)
            | (self.machine_id << 12)
            | state.sequence;

        (id & i64::MAX as u64) as i64
    }

    /// Extract the creation timestamp (unix millis) from an ID
    pub fn extract_timestamp(&self, snowflake: i64) -> u64 {
        ((snowflake as u64) >> 22) + self.epoch
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn wait_next_millis(last: u64) -> u64 {
    loop {
        let now = current_timestamp();
        if now > last {
            return now;
        }
        std::hint::spin_loop();
    }
}
