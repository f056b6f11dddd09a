//! User-facing notices (toasts) for the desk editor.
//!
//! Remote failures and save confirmations are published here; whatever
//! renders toasts subscribes.

pub mod bus;

pub use bus::{Notice, NoticeBus, NoticeLevel};
