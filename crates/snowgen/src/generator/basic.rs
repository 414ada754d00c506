use core::{cell::Cell, marker::PhantomData};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    generator::{
        SnowflakeGenerator,
        interface::{reduce_worker_id, wrap_sequence},
    },
    id::SnowflakeId,
    time::TimeSource,
};

/// A non-concurrent Snowflake ID generator suitable for single-threaded
/// environments.
///
/// The counter lives in a [`Cell`], so the generator is `!Sync` and cannot be
/// shared across threads. In exchange there is no locking or atomic traffic at
/// all.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ Never blocks on the clock and never fails
/// - ❌ Repeats IDs past `max_sequence() + 1` calls in one millisecond
///
/// ## Recommended When
/// - You're in a single-threaded environment (no need for synchronization)
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
/// - [`AtomicSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
pub struct BasicSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    sequence: Cell<u64>,
    worker_id: u64,
    time: T,
    _id: PhantomData<ID>,
}

impl<ID, T> BasicSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new [`BasicSnowflakeGenerator`] for `worker_id`, with the
    /// sequence counter at zero.
    ///
    /// # Example
    /// ```
    /// use snowgen::{BasicSnowflakeGenerator, MessengerId, SystemClock};
    ///
    /// let generator = BasicSnowflakeGenerator::<MessengerId, _>::new(0, SystemClock::default());
    /// let id = generator.next_id();
    /// assert_eq!(id.sequence(), 0);
    /// ```
    pub fn new(worker_id: u64, time: T) -> Self {
        Self::with_sequence(worker_id, 0, time)
    }

    /// Creates a generator whose counter starts at `sequence` (reduced to the
    /// sequence width).
    pub fn with_sequence(worker_id: u64, sequence: u64, time: T) -> Self {
        Self {
            sequence: Cell::new(wrap_sequence::<ID>(sequence)),
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
        let sequence = self.sequence.get();
        self.sequence.set(wrap_sequence::<ID>(sequence + 1));
        ID::from_components(now, self.worker_id, sequence)
    }
}

impl<ID, T> SnowflakeGenerator<ID, T> for BasicSnowflakeGenerator<ID, T>
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
