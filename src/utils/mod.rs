// Utils compartidos

pub mod browser;
pub mod countdown;
pub mod format;

pub use countdown::Countdown;
pub use format::{format_address, format_ether};
