use core::marker::PhantomData;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    generator::{
        SnowflakeGenerator,
        interface::{reduce_worker_id, wrap_sequence},
        padded::{Padded, pad},
    },
    id::SnowflakeId,
    time::TimeSource,
};

/// A lock-free Snowflake ID generator suitable for multi-threaded environments.
///
/// The sequence counter is an [`AtomicU64`] advanced with a single
/// `fetch_add`; the low bits of the pre-increment value become the sequence.
/// Because the sequence width is a power of two that divides 2^64, masking the
/// free-running counter wraps exactly like an explicit modulo.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Never blocks on the clock and never fails
/// - ❌ Repeats IDs past `max_sequence() + 1` calls in one millisecond
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`BasicSnowflakeGenerator`]
/// - [`LockSnowflakeGenerator`]
/// - [`AtomicMonoSnowflakeGenerator`]
///
/// [`BasicSnowflakeGenerator`]: crate::BasicSnowflakeGenerator
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
/// [`AtomicMonoSnowflakeGenerator`]: crate::AtomicMonoSnowflakeGenerator
pub struct AtomicSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    sequence: Padded<AtomicU64>,
    worker_id: u64,
    time: T,
    _id: PhantomData<ID>,
}

impl<ID, T> AtomicSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new [`AtomicSnowflakeGenerator`] for `worker_id`, with the
    /// sequence counter at zero.
    ///
    /// # Example
    /// ```
    /// use snowgen::{AtomicSnowflakeGenerator, MessengerId, SystemClock};
    ///
    /// let generator = AtomicSnowflakeGenerator::<MessengerId, _>::new(3, SystemClock::default());
    /// let a = generator.next_id();
    /// let b = generator.next_id();
    /// assert_ne!(a, b);
    /// ```
    pub fn new(worker_id: u64, time: T) -> Self {
        Self::with_sequence(worker_id, 0, time)
    }

    /// Creates a generator whose counter starts at `sequence` (reduced to the
    /// sequence width).
    ///
    /// In typical use cases, you should prefer [`Self::new`].
    pub fn with_sequence(worker_id: u64, sequence: u64, time: T) -> Self {
        Self {
            sequence: pad(AtomicU64::new(wrap_sequence::<ID>(sequence))),
            worker_id: reduce_worker_id::<ID>(worker_id),
            time,
            _id: PhantomData,
        }
    }

    /// The effective (reduced) worker ID.
    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// Generates the next ID.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> ID {
        let now = self.time.current_millis();

        // Relaxed is enough: uniqueness only needs the RMW to be atomic.
        let counter = self.sequence.fetch_add(1, Ordering::Relaxed);
        let sequence = wrap_sequence::<ID>(counter);

        #[cfg(feature = "tracing")]
        if sequence == ID::max_sequence() {
            tracing::trace!(worker_id = self.worker_id, "sequence counter wrapped");
        }

        ID::from_components(now, self.worker_id, sequence)
    }
}

impl<ID, T> SnowflakeGenerator<ID, T> for AtomicSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    fn new(worker_id: u64, time: T) -> Self {
        Self::new(worker_id, time)
    }

    fn worker_id(&self) -> u64 {
        self.worker_id()
    }

    fn next_id(&self) -> ID {
        self.next_id()
    }
}
