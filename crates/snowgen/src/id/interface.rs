use core::{fmt, hash::Hash};

/// A trait representing a Snowflake-style identifier layout.
///
/// Every layout packs three disjoint bit fields into a `u64`: a timestamp, a
/// machine (worker) ID, and a per-millisecond sequence. Generators are generic
/// over this trait so they never hard-code field widths.
///
/// # Example
///
/// ```
/// use snowgen::{MessengerId, SnowflakeId};
///
/// let id = MessengerId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.machine_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// ```
pub trait SnowflakeId:
    Sized + Copy + Clone + fmt::Display + fmt::Debug + PartialOrd + Ord + PartialEq + Eq + Hash
{
    /// Returns the timestamp portion of the ID.
    fn timestamp(&self) -> u64;

    /// Returns the maximum possible value for the timestamp field.
    fn max_timestamp() -> u64;

    /// Returns the machine ID portion of the ID.
    fn machine_id(&self) -> u64;

    /// Returns the maximum possible value for the machine ID field.
    fn max_machine_id() -> u64;

    /// Returns the sequence portion of the ID.
    fn sequence(&self) -> u64;

    /// Returns the maximum possible value for the sequence field.
    fn max_sequence() -> u64;

    /// Constructs a new ID from its components.
    ///
    /// Each component is truncated to its field width, so a machine ID `m` is
    /// stored as `m % (max_machine_id() + 1)`.
    fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self;

    /// Converts this type into its raw representation.
    fn to_raw(&self) -> u64;

    /// Converts a raw value into this type without validation.
    fn from_raw(raw: u64) -> Self;

    /// Returns `true` if no bits outside the defined fields are set.
    fn is_valid(&self) -> bool;

    /// Splits the ID into `(timestamp, machine_id, sequence)`.
    fn into_components(self) -> (u64, u64, u64) {
        (self.timestamp(), self.machine_id(), self.sequence())
    }

    /// Returns true if the current sequence value can be incremented.
    fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns the next sequence value.
    fn next_sequence(&self) -> u64 {
        self.sequence() + 1
    }

    /// Returns a new ID with the sequence incremented.
    fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.machine_id(), self.next_sequence())
    }

    /// Returns a new ID for a newer timestamp with sequence reset to zero.
    fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from_components(ts, self.machine_id(), 0)
    }
}
