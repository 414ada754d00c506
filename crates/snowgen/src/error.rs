use thiserror::Error;

/// A result type that is infallible by default.
///
/// No generator in this crate can fail, so the fallible generation methods
/// return [`core::convert::Infallible`] errors. Clock construction and
/// identifier conversions use [`Error`].
pub type Result<T, E = core::convert::Infallible> = core::result::Result<T, E>;

/// All error variants that `snowgen` can emit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum Error {
    /// The wall clock reads earlier than the epoch a clock was configured
    /// with, so the timestamp field would be negative.
    #[error("system clock ({now_millis} ms) is earlier than the epoch ({epoch_millis} ms)")]
    ClockBeforeEpoch {
        /// The configured epoch, in milliseconds since the Unix epoch.
        epoch_millis: u64,
        /// The wall clock reading, in milliseconds since the Unix epoch.
        now_millis: u64,
    },

    /// The wall clock reads earlier than 1970-01-01 UTC.
    #[error("system clock is earlier than the unix epoch")]
    ClockBeforeUnixEpoch,

    /// A signed value was negative and cannot carry an identifier.
    #[error("identifier {value} is negative")]
    NegativeId {
        /// The rejected value.
        value: i64,
    },

    /// A raw value sets bit 63, which the layout reserves.
    #[error("identifier {raw:#018x} sets the reserved bit")]
    ReservedBitSet {
        /// The rejected value.
        raw: u64,
    },
}
