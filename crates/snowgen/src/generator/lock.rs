use core::marker::PhantomData;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    generator::{
        SnowflakeGenerator,
        interface::{reduce_worker_id, wrap_sequence},
        mutex::{Mutex, lock},
        padded::{Padded, pad},
    },
    id::SnowflakeId,
    time::TimeSource,
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// Only the sequence counter sits behind the [`Mutex`]; the clock is read
/// before the lock is taken, so the critical section is a single
/// read-increment-wrap. Concurrent callers receive sequence values in the
/// order they acquire the lock.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Never blocks on the clock and never fails
/// - ❌ Repeats IDs past `max_sequence() + 1` calls in one millisecond
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
/// - Your target doesn't support 64-bit atomics
///
/// ## See Also
/// - [`BasicSnowflakeGenerator`]
/// - [`AtomicSnowflakeGenerator`]
/// - [`LockMonoSnowflakeGenerator`]
///
/// [`BasicSnowflakeGenerator`]: crate::BasicSnowflakeGenerator
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
/// [`LockMonoSnowflakeGenerator`]: crate::LockMonoSnowflakeGenerator
pub struct LockSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    pub(crate) sequence: Padded<Mutex<u64>>,
    worker_id: u64,
    time: T,
    _id: PhantomData<ID>,
}

impl<ID, T> LockSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new [`LockSnowflakeGenerator`] for `worker_id`, with the
    /// sequence counter at zero.
    ///
    /// `worker_id` must be unique among all generators sharing an epoch; it is
    /// reduced modulo `ID::max_machine_id() + 1` so it always fits its field.
    ///
    /// # Example
    /// ```
    /// use snowgen::{LockSnowflakeGenerator, MessengerId, SystemClock};
    ///
    /// let generator = LockSnowflakeGenerator::<MessengerId, _>::new(1025, SystemClock::default());
    /// assert_eq!(generator.worker_id(), 1);
    ///
    /// let id = generator.next_id();
    /// assert_eq!(id.machine_id(), 1);
    /// ```
    pub fn new(worker_id: u64, time: T) -> Self {
        Self::with_sequence(worker_id, 0, time)
    }

    /// Creates a generator whose counter starts at `sequence` (reduced to the
    /// sequence width). Mostly useful for tests and for resuming a counter.
    ///
    /// In typical use cases, you should prefer [`Self::new`].
    pub fn with_sequence(worker_id: u64, sequence: u64, time: T) -> Self {
        Self {
            sequence: pad(Mutex::new(wrap_sequence::<ID>(sequence))),
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

        let sequence = {
            let mut counter = lock(&self.sequence);
            let current = *counter;
            *counter = wrap_sequence::<ID>(current + 1);
            current
        };

        #[cfg(feature = "tracing")]
        if sequence == ID::max_sequence() {
            tracing::trace!(worker_id = self.worker_id, "sequence counter wrapped");
        }

        ID::from_components(now, self.worker_id, sequence)
    }
}

impl<ID, T> SnowflakeGenerator<ID, T> for LockSnowflakeGenerator<ID, T>
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
