use core::time::Duration;

/// Messenger epoch: Tuesday, January 12, 2021 16:17:46.715 UTC
///
/// The zero point of the 42-bit timestamp field, which therefore runs out
/// roughly 139 years later.
pub const MESSENGER_EPOCH: Duration = Duration::from_millis(1_610_468_266_715);

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const ZERO_EPOCH: Duration = Duration::from_millis(0);
