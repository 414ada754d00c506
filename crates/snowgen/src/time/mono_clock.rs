use core::time::Duration;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread,
    time::Instant,
};

use crate::{
    error::Error,
    time::{MESSENGER_EPOCH, TimeSource, system_clock::unix_millis},
};

/// Milliseconds elapsed since the clock was constructed, published by the
/// ticker thread.
#[derive(Debug)]
struct Ticker {
    elapsed: AtomicU64,
}

/// A monotonic time source that returns elapsed time since construction,
/// offset from a user-defined epoch.
///
/// The wall clock is consulted exactly once, at construction, to compute the
/// offset between the epoch and "now". After that the clock advances from an
/// [`Instant`], so NTP steps or manual clock changes can never make it run
/// backward.
///
/// A background thread updates a shared atomic counter once per millisecond,
/// which keeps syscalls off the hot path. Clones share the same ticker; the
/// thread exits after the last clone is dropped.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    ticker: Arc<Ticker>,
    epoch_offset: u64, // in milliseconds
}

impl Default for MonotonicClock {
    /// Constructs a monotonic clock aligned to [`MESSENGER_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(MESSENGER_EPOCH)
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock using `epoch` (a [`Duration`] since
    /// 1970-01-01 UTC) as the origin (t = 0).
    ///
    /// If the wall clock reads earlier than the epoch, the clock starts at
    /// zero.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::{Duration, SystemTime, UNIX_EPOCH};
    /// use snowgen::{MonotonicClock, TimeSource};
    ///
    /// let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    /// let clock = MonotonicClock::with_epoch(now);
    ///
    /// std::thread::sleep(Duration::from_millis(5));
    ///
    /// // Usually close to 5, but timer alignment and sleep accuracy make
    /// // values like 4-6 common. The reading never goes backward.
    /// let ts = clock.current_millis();
    /// assert!(ts < 1_000);
    /// ```
    pub fn with_epoch(epoch: Duration) -> Self {
        let epoch_millis = u64::try_from(epoch.as_millis()).unwrap_or(u64::MAX);
        let offset = unix_millis().unwrap_or(0).saturating_sub(epoch_millis);
        Self::start(offset)
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
        let epoch_millis = u64::try_from(epoch.as_millis()).unwrap_or(u64::MAX);
        let now_millis = unix_millis()?;
        let offset = now_millis
            .checked_sub(epoch_millis)
            .ok_or(Error::ClockBeforeEpoch {
                epoch_millis,
                now_millis,
            })?;
        Ok(Self::start(offset))
    }

    fn start(epoch_offset: u64) -> Self {
        let start = Instant::now();
        let ticker = Arc::new(Ticker {
            elapsed: AtomicU64::new(0),
        });

        let weak = Arc::downgrade(&ticker);
        thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(ticker) = weak.upgrade() else {
                    break;
                };

                // Absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                // Recompute after waking; sleep may overshoot.
                let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                ticker.elapsed.store(now_ms, Ordering::Relaxed);

                tick = now_ms + 1;
            }
        });

        Self {
            ticker,
            epoch_offset,
        }
    }
}

impl TimeSource for MonotonicClock {
    /// Returns the number of milliseconds since the configured epoch, based on
    /// the elapsed monotonic time since construction.
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.ticker.elapsed.load(Ordering::Relaxed)
    }
}
