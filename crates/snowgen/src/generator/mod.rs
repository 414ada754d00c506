mod atomic;
mod basic;
mod interface;
mod lock;
mod mono;
mod mutex;
mod padded;

pub use atomic::*;
pub use basic::*;
pub use interface::*;
pub use lock::*;
pub use mono::*;
