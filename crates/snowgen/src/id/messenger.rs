use core::fmt;

use crate::{
    error::Error,
    id::{FieldLayout, SnowflakeBitLayout, SnowflakeId, write_bit_layout_debug},
};

/// A 63-bit Snowflake ID stored in a `u64`.
///
/// - 1 bit reserved (always zero, so the value also fits a non-negative `i64`)
/// - 42 bits timestamp (ms since [`MESSENGER_EPOCH`])
/// - 10 bits worker ID
/// - 11 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            21 20             11 10             0
///              +--------------+----------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (42) |  worker ID (10) | sequence (11) |
///              +--------------+----------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
/// ```
/// [`MESSENGER_EPOCH`]: crate::MESSENGER_EPOCH
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MessengerId {
    id: u64,
}

impl MessengerId {
    /// Bitmask for extracting the 42-bit timestamp field. Occupies bits 21
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for extracting the 10-bit worker ID field. Occupies bits 11
    /// through 20.
    pub const MACHINE_ID_MASK: u64 = (1 << 10) - 1;

    /// Bitmask for extracting the 11-bit sequence field. Occupies bits 0
    /// through 10.
    pub const SEQUENCE_MASK: u64 = (1 << 11) - 1;

    /// Number of bits to shift the timestamp to its position (bit 21).
    pub const TIMESTAMP_SHIFT: u64 = 21;

    /// Number of bits to shift the worker ID to its position (bit 11).
    pub const MACHINE_ID_SHIFT: u64 = 11;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Bit 63. Never set by any constructor other than [`Self::from_raw`].
    pub const RESERVED_MASK: u64 = 1 << 63;

    /// Packs the three fields, truncating each to its width.
    pub const fn from(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | machine_id | sequence,
        }
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Wraps a raw value as-is. See [`Self::try_from_raw`] for the checked
    /// variant.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Wraps a raw value, rejecting values that set the reserved bit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedBitSet`] if bit 63 is set.
    pub const fn try_from_raw(raw: u64) -> Result<Self, Error> {
        if raw & Self::RESERVED_MASK != 0 {
            return Err(Error::ReservedBitSet { raw });
        }
        Ok(Self { id: raw })
    }

    /// Returns the raw `u64`.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Returns the ID as a signed 64-bit integer. The sign bit is always zero
    /// for IDs built from components.
    #[allow(clippy::cast_possible_wrap)]
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Returns the ID as a zero-padded 19-digit string, the width of
    /// `i64::MAX`.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl SnowflakeId for MessengerId {
    fn timestamp(&self) -> u64 {
        self.timestamp()
    }

    fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    fn machine_id(&self) -> u64 {
        self.machine_id()
    }

    fn max_machine_id() -> u64 {
        Self::MACHINE_ID_MASK
    }

    fn sequence(&self) -> u64 {
        self.sequence()
    }

    fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, machine_id, sequence)
    }

    fn to_raw(&self) -> u64 {
        self.id
    }

    fn from_raw(raw: u64) -> Self {
        Self::from_raw(raw)
    }

    fn is_valid(&self) -> bool {
        self.id & Self::RESERVED_MASK == 0
    }
}

impl From<MessengerId> for i64 {
    fn from(id: MessengerId) -> Self {
        id.to_i64()
    }
}

impl From<MessengerId> for u64 {
    fn from(id: MessengerId) -> Self {
        id.to_raw()
    }
}

impl TryFrom<i64> for MessengerId {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(Self::from_raw)
            .map_err(|_| Error::NegativeId { value })
    }
}

impl fmt::Display for MessengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for MessengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bit_layout_debug(f, self, "MessengerId")
    }
}

impl SnowflakeBitLayout for MessengerId {
    fn id(&self) -> u64 {
        self.id
    }

    fn fields(&self) -> Vec<FieldLayout> {
        vec![
            FieldLayout {
                name: "reserved",
                bits: 1,
                value: self.id >> 63,
            },
            FieldLayout {
                name: "timestamp",
                bits: 42,
                value: self.timestamp(),
            },
            FieldLayout {
                name: "worker_id",
                bits: 10,
                value: self.machine_id(),
            },
            FieldLayout {
                name: "sequence",
                bits: 11,
                value: self.sequence(),
            },
        ]
    }

    fn to_padded_string(&self) -> String {
        self.to_padded_string()
    }
}
