#[cfg(feature = "cache-padded")]
pub(crate) type Padded<T> = crossbeam_utils::CachePadded<T>;

#[cfg(not(feature = "cache-padded"))]
pub(crate) type Padded<T> = T;

/// Aligns shared generator state to its own cache line when the
/// `cache-padded` feature is enabled.
#[cfg(feature = "cache-padded")]
pub(crate) const fn pad<T>(value: T) -> Padded<T> {
    crossbeam_utils::CachePadded::new(value)
}

#[cfg(not(feature = "cache-padded"))]
pub(crate) const fn pad<T>(value: T) -> Padded<T> {
    value
}
