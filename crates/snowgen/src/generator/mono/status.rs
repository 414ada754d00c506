/// Represents the result of attempting to generate a new ID with a
/// [`MonoSnowflakeGenerator`].
///
/// - [`IdGenStatus::Ready`] indicates a new ID was successfully generated.
/// - [`IdGenStatus::Pending`] means the generator cannot produce an ID without
///   repeating or going backward, and the caller should retry after
///   `yield_for` milliseconds.
///
/// This allows non-blocking generation loops and clean backoff strategies.
///
/// # Example
///
/// ```
/// use snowgen::{IdGenStatus, LockMonoSnowflakeGenerator, MessengerId, SnowflakeId, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1
///     }
/// }
///
/// let generator = LockMonoSnowflakeGenerator::<MessengerId, _>::from_components(
///     1,
///     0,
///     MessengerId::max_sequence(),
///     FixedTime,
/// );
/// match generator.poll_id() {
///     IdGenStatus::Ready { id } => println!("ID: {}", id.timestamp()),
///     IdGenStatus::Pending { yield_for } => println!("Back off for {yield_for} ms"),
/// }
/// ```
///
/// [`MonoSnowflakeGenerator`]: crate::MonoSnowflakeGenerator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus<ID> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: ID,
    },
    /// No ID could be generated: the sequence is exhausted for the current
    /// millisecond, the clock is behind the last issued ID, or (for the
    /// atomic generator) another thread won the race.
    Pending {
        /// Milliseconds to wait before trying again. Zero means retry
        /// immediately.
        yield_for: u64,
    },
}
