use core::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::Result,
    generator::{
        IdGenStatus, MonoSnowflakeGenerator,
        interface::{reduce_worker_id, wrap_sequence},
        mutex::{Mutex, lock},
        padded::{Padded, pad},
    },
    id::SnowflakeId,
    time::TimeSource,
};

/// A lock-based strict Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued ID is kept behind a [`Mutex`]. Each call compares the
/// current time against its timestamp: a later millisecond resets the
/// sequence, the same millisecond increments it until it is exhausted, and an
/// earlier reading (the clock moved backward) is refused.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Never repeats an ID and never goes backward
/// - ❌ May report [`IdGenStatus::Pending`]
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
/// - Uniqueness must hold under any request rate
///
/// ## See Also
/// - [`AtomicMonoSnowflakeGenerator`]
/// - [`LockSnowflakeGenerator`]
///
/// [`AtomicMonoSnowflakeGenerator`]: crate::AtomicMonoSnowflakeGenerator
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
pub struct LockMonoSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    pub(crate) state: Padded<Mutex<ID>>,
    time: T,
}

impl<ID, T> LockMonoSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new [`LockMonoSnowflakeGenerator`] for `worker_id`.
    ///
    /// The initial timestamp and sequence are zero; the first call at any
    /// later millisecond starts the sequence at zero.
    ///
    /// # Example
    /// ```
    /// use snowgen::{IdGenStatus, LockMonoSnowflakeGenerator, MessengerId, MonotonicClock};
    ///
    /// let generator = LockMonoSnowflakeGenerator::<MessengerId, _>::new(0, MonotonicClock::default());
    ///
    /// let id = loop {
    ///     match generator.poll_id() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// assert_eq!(id.machine_id(), 0);
    /// ```
    pub fn new(worker_id: u64, time: T) -> Self {
        Self::from_components(0, worker_id, 0, time)
    }

    /// Creates a generator from explicit component values of the "last
    /// issued" ID.
    ///
    /// This constructor is primarily useful for restoring state or for tests.
    /// In typical use cases, you should prefer [`Self::new`].
    pub fn from_components(timestamp: u64, worker_id: u64, sequence: u64, time: T) -> Self {
        let id = ID::from_components(
            timestamp,
            reduce_worker_id::<ID>(worker_id),
            wrap_sequence::<ID>(sequence),
        );
        Self {
            state: pad(Mutex::new(id)),
            time,
        }
    }

    /// The effective (reduced) worker ID.
    pub fn worker_id(&self) -> u64 {
        lock(&self.state).machine_id()
    }

    /// Attempts to generate the next available ID.
    ///
    /// Returns [`IdGenStatus::Pending`] if the sequence is exhausted for the
    /// current millisecond or the clock is behind the last issued ID.
    pub fn poll_id(&self) -> IdGenStatus<ID> {
        match self.try_poll_id() {
            Ok(status) => status,
            Err(e) => {
                #[allow(unreachable_code)]
                match e {}
            }
        }
    }

    /// A fallible version of [`Self::poll_id`]. Always returns `Ok`.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: A new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_for })`: The time to wait (in
    ///   milliseconds) before trying again
    ///
    /// # Errors
    /// - This method currently does not return any errors. A poisoned std
    ///   mutex is recovered, since the last issued ID it guards is always
    ///   valid.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        let now = self.time.current_millis();

        let mut id = lock(&self.state);

        let current_ts = id.timestamp();
        match now.cmp(&current_ts) {
            Ordering::Equal => {
                if id.has_sequence_room() {
                    *id = id.increment_sequence();
                    Ok(IdGenStatus::Ready { id: *id })
                } else {
                    Ok(IdGenStatus::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                *id = id.rollover_to_timestamp(now);
                Ok(IdGenStatus::Ready { id: *id })
            }
            Ordering::Less => Ok(Self::cold_clock_behind(now, current_ts)),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, current_ts: u64) -> IdGenStatus<ID> {
        let yield_for = current_ts - now;
        #[cfg(feature = "tracing")]
        tracing::debug!(now, last = current_ts, yield_for, "clock is behind the last issued id");
        IdGenStatus::Pending { yield_for }
    }
}

impl<ID, T> MonoSnowflakeGenerator<ID, T> for LockMonoSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    type Err = core::convert::Infallible;

    fn new(worker_id: u64, time: T) -> Self {
        Self::new(worker_id, time)
    }

    fn poll_id(&self) -> IdGenStatus<ID> {
        self.poll_id()
    }

    fn try_poll_id(&self) -> Result<IdGenStatus<ID>, Self::Err> {
        self.try_poll_id()
    }
}
