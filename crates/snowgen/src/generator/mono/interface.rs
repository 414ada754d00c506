use core::fmt;

use crate::{error::Result, generator::IdGenStatus, id::SnowflakeId, time::TimeSource};

/// A strict Snowflake generator: IDs from one instance are unique and never
/// decrease.
///
/// Unlike a [`SnowflakeGenerator`], the sequence never wraps within a
/// millisecond. When it is exhausted, or when the clock reads earlier than the
/// last issued ID, generation reports [`IdGenStatus::Pending`] instead.
///
/// [`SnowflakeGenerator`]: crate::SnowflakeGenerator
pub trait MonoSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// The error type returned by the fallible methods.
    type Err: fmt::Debug;

    /// Creates a new generator. `worker_id` is reduced modulo
    /// `ID::max_machine_id() + 1`.
    fn new(worker_id: u64, time: T) -> Self;

    /// Attempts to generate the next ID without blocking.
    ///
    /// This is the infallible counterpart to
    /// [`MonoSnowflakeGenerator::try_poll_id`].
    fn poll_id(&self) -> IdGenStatus<ID>
    where
        Self::Err: Into<core::convert::Infallible>,
    {
        match self.try_poll_id() {
            Ok(status) => status,
            Err(e) => {
                #[allow(unreachable_code)]
                // `into()` satisfies the trait bound at compile time.
                match e.into() {}
            }
        }
    }

    /// Attempts to generate the next ID without blocking, with fallible error
    /// handling.
    ///
    /// # Errors
    ///
    /// None of the generators in this crate can fail; the signature leaves
    /// room for implementations that can.
    fn try_poll_id(&self) -> Result<IdGenStatus<ID>, Self::Err>;

    /// Generates the next ID, calling `backoff(yield_for)` every time the
    /// generator reports [`IdGenStatus::Pending`].
    ///
    /// `backoff` decides how to wait: spin, yield the thread, or sleep.
    ///
    /// ```
    /// use snowgen::{LockMonoSnowflakeGenerator, MessengerId, MonoSnowflakeGenerator, MonotonicClock};
    ///
    /// let generator: LockMonoSnowflakeGenerator<MessengerId, _> =
    ///     MonoSnowflakeGenerator::new(0, MonotonicClock::default());
    /// let id = generator.next_id(|_| std::thread::yield_now());
    /// assert_eq!(id.machine_id(), 0);
    /// ```
    fn next_id(&self, backoff: impl FnMut(u64)) -> ID
    where
        Self::Err: Into<core::convert::Infallible>,
    {
        match self.try_next_id(backoff) {
            Ok(id) => id,
            Err(e) => {
                #[allow(unreachable_code)]
                // `into()` satisfies the trait bound at compile time.
                match e.into() {}
            }
        }
    }

    /// Fallible version of [`MonoSnowflakeGenerator::next_id`].
    ///
    /// # Errors
    ///
    /// Propagates the first error from
    /// [`MonoSnowflakeGenerator::try_poll_id`].
    fn try_next_id(&self, mut backoff: impl FnMut(u64)) -> Result<ID, Self::Err> {
        loop {
            match self.try_poll_id()? {
                IdGenStatus::Ready { id } => return Ok(id),
                IdGenStatus::Pending { yield_for } => backoff(yield_for),
            }
        }
    }
}
