use crate::{id::SnowflakeId, time::TimeSource};

/// The base generator contract: one worker identity, one wrapping sequence
/// counter, and a `next_id` that never blocks and never fails.
///
/// The sequence wraps to zero after [`SnowflakeId::max_sequence`] without
/// waiting for the clock. More than `max_sequence() + 1` calls within a single
/// millisecond therefore repeat earlier IDs. Use a [`MonoSnowflakeGenerator`]
/// when that is unacceptable.
///
/// [`MonoSnowflakeGenerator`]: crate::MonoSnowflakeGenerator
pub trait SnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new generator. `worker_id` is reduced modulo
    /// `ID::max_machine_id() + 1` and the sequence starts at zero.
    fn new(worker_id: u64, time: T) -> Self;

    /// The effective (reduced) worker ID stamped into every ID.
    fn worker_id(&self) -> u64;

    /// Generates the next ID.
    ///
    /// Reads the clock, then takes the current sequence value and advances
    /// the counter (wrapping to zero after `ID::max_sequence()`), and packs
    /// `(timestamp, worker_id, sequence)`.
    fn next_id(&self) -> ID;
}

/// Reduces a caller-supplied worker ID to the width of the layout's machine ID
/// field.
pub(crate) fn reduce_worker_id<ID: SnowflakeId>(worker_id: u64) -> u64 {
    worker_id % (ID::max_machine_id() + 1)
}

/// Reduces a sequence value to the width of the layout's sequence field.
pub(crate) fn wrap_sequence<ID: SnowflakeId>(sequence: u64) -> u64 {
    sequence % (ID::max_sequence() + 1)
}
