use core::{cmp, marker::PhantomData};

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::Result,
    generator::{
        IdGenStatus, MonoSnowflakeGenerator,
        interface::{reduce_worker_id, wrap_sequence},
        padded::{Padded, pad},
    },
    id::SnowflakeId,
    time::TimeSource,
};

/// A lock-free strict Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued ID is packed into one [`AtomicU64`] and advanced with a
/// compare-and-swap, following the same rules as
/// [`LockMonoSnowflakeGenerator`]. A lost race reports
/// [`IdGenStatus::Pending`] with `yield_for: 0`.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Never repeats an ID and never goes backward
/// - ❌ May report [`IdGenStatus::Pending`], including under contention
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`LockMonoSnowflakeGenerator`]
/// - [`AtomicSnowflakeGenerator`]
///
/// [`LockMonoSnowflakeGenerator`]: crate::LockMonoSnowflakeGenerator
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
pub struct AtomicMonoSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    state: Padded<AtomicU64>,
    time: T,
    _id: PhantomData<ID>,
}

impl<ID, T> AtomicMonoSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new [`AtomicMonoSnowflakeGenerator`] for `worker_id`.
    ///
    /// # Example
    /// ```
    /// use snowgen::{AtomicMonoSnowflakeGenerator, IdGenStatus, MessengerId, MonotonicClock};
    ///
    /// let generator = AtomicMonoSnowflakeGenerator::<MessengerId, _>::new(9, MonotonicClock::default());
    ///
    /// let id = loop {
    ///     match generator.poll_id() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => core::hint::spin_loop(),
    ///     }
    /// };
    /// assert_eq!(id.machine_id(), 9);
    /// ```
    pub fn new(worker_id: u64, time: T) -> Self {
        Self::from_components(0, worker_id, 0, time)
    }

    /// Creates a generator from explicit component values of the "last
    /// issued" ID.
    ///
    /// In typical use cases, you should prefer [`Self::new`].
    pub fn from_components(timestamp: u64, worker_id: u64, sequence: u64, time: T) -> Self {
        let initial = ID::from_components(
            timestamp,
            reduce_worker_id::<ID>(worker_id),
            wrap_sequence::<ID>(sequence),
        );
        Self {
            state: pad(AtomicU64::new(initial.to_raw())),
            time,
            _id: PhantomData,
        }
    }

    /// The effective (reduced) worker ID.
    pub fn worker_id(&self) -> u64 {
        ID::from_raw(self.state.load(Ordering::Relaxed)).machine_id()
    }

    /// Attempts to generate the next available ID.
    ///
    /// Returns [`IdGenStatus::Pending`] if the sequence is exhausted, the
    /// clock is behind, or another thread advanced the state first.
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
    /// # Errors
    /// - This method currently does not return any errors and always returns
    ///   `Ok`. It is marked as fallible to allow for future extensibility
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        let now = self.time.current_millis();

        let current_raw = self.state.load(Ordering::Relaxed);
        let current_id = ID::from_raw(current_raw);
        let current_ts = current_id.timestamp();

        let next_id = match now.cmp(&current_ts) {
            cmp::Ordering::Equal => {
                if current_id.has_sequence_room() {
                    current_id.increment_sequence()
                } else {
                    return Ok(IdGenStatus::Pending { yield_for: 1 });
                }
            }
            cmp::Ordering::Greater => current_id.rollover_to_timestamp(now),
            cmp::Ordering::Less => {
                return Ok(Self::cold_clock_behind(now, current_ts));
            }
        };

        let next_raw = next_id.to_raw();

        if self
            .state
            .compare_exchange(current_raw, next_raw, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            Ok(IdGenStatus::Ready { id: next_id })
        } else {
            // Another thread won the race; retry immediately.
            Ok(IdGenStatus::Pending { yield_for: 0 })
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

impl<ID, T> MonoSnowflakeGenerator<ID, T> for AtomicMonoSnowflakeGenerator<ID, T>
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
