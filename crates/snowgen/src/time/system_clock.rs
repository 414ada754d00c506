use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    error::Error,
    time::{MESSENGER_EPOCH, TimeSource},
};

/// Reads the wall clock in milliseconds since the Unix epoch.
pub(crate) fn unix_millis() -> Result<u64, Error> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Error::ClockBeforeUnixEpoch)?;
    Ok(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

fn epoch_millis(epoch: Duration) -> u64 {
    u64::try_from(epoch.as_millis()).unwrap_or(u64::MAX)
}

/// A wall-clock time source that reads [`SystemTime::now`] on every call and
/// subtracts a fixed epoch.
///
/// Wall-clock adjustments (NTP steps, manual changes) show up directly in the
/// returned value, including steps backward. Pair it with a
/// [`MonoSnowflakeGenerator`] or use a [`MonotonicClock`] when identifiers must
/// never go backward.
///
/// [`MonoSnowflakeGenerator`]: crate::MonoSnowflakeGenerator
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch_millis: u64,
}

impl Default for SystemClock {
    /// Constructs a wall clock aligned to [`MESSENGER_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(MESSENGER_EPOCH)
    }
}

impl SystemClock {
    /// Constructs a wall clock using `epoch` (a [`Duration`] since
    /// 1970-01-01 UTC) as the origin.
    ///
    /// Readings earlier than the epoch clamp to zero.
    pub const fn with_epoch(epoch: Duration) -> Self {
        let millis = epoch.as_millis();
        Self {
            epoch_millis: if millis > u64::MAX as u128 {
                u64::MAX
            } else {
                millis as u64
            },
        }
    }

    /// Like [`Self::with_epoch`], but rejects an epoch that lies in the future
    /// of the current wall clock.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockBeforeEpoch`] if the wall clock reads earlier than
    ///   `epoch`
    /// - [`Error::ClockBeforeUnixEpoch`] if the wall clock reads earlier than
    ///   1970-01-01 UTC
    pub fn try_with_epoch(epoch: Duration) -> Result<Self, Error> {
        let epoch_millis = epoch_millis(epoch);
        let now_millis = unix_millis()?;
        if now_millis < epoch_millis {
            return Err(Error::ClockBeforeEpoch {
                epoch_millis,
                now_millis,
            });
        }
        Ok(Self { epoch_millis })
    }

    /// The configured epoch, in milliseconds since the Unix epoch.
    pub const fn epoch_millis(&self) -> u64 {
        self.epoch_millis
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        unix_millis()
            .unwrap_or(0)
            .saturating_sub(self.epoch_millis)
    }
}
