mod interface;
mod layout;
mod messenger;

pub use interface::*;
pub use layout::*;
pub use messenger::*;
