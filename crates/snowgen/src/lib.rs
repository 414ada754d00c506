//! # snowgen
//!
//! Process-local generator for 63-bit, time-ordered identifiers that need no
//! coordination between nodes beyond a pre-assigned worker number.
//!
//! ```text
//!  Bit Index:  63           63 62            21 20             11 10             0
//!              +--------------+----------------+-----------------+---------------+
//!  Field:      | reserved (1) | timestamp (42) |  worker ID (10) | sequence (11) |
//!              +--------------+----------------+-----------------+---------------+
//! ```
//!
//! Two families of generators are provided:
//!
//! - [`SnowflakeGenerator`] implementations ([`BasicSnowflakeGenerator`],
//!   [`LockSnowflakeGenerator`], [`AtomicSnowflakeGenerator`]) never block and
//!   never fail. The sequence counter wraps to zero after 2047, so more than
//!   2048 calls within one millisecond repeat identifiers.
//! - [`MonoSnowflakeGenerator`] implementations ([`LockMonoSnowflakeGenerator`],
//!   [`AtomicMonoSnowflakeGenerator`]) refuse to wrap or go backward and report
//!   [`IdGenStatus::Pending`] until the clock catches up.
//!
//! ```
//! use snowgen::{LockSnowflakeGenerator, MessengerId, SystemClock};
//!
//! let generator = LockSnowflakeGenerator::<MessengerId, _>::new(7, SystemClock::default());
//! let id = generator.next_id();
//! assert_eq!(id.machine_id(), 7);
//! assert!(id.to_i64() >= 0);
//! ```

mod error;
mod generator;
mod id;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
