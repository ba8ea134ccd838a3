//! Platform abstraction layer
//!
//! What the host shell hands the core, and what the core hands back:
//! - Input events (clicks with a button designator)
//! - Time/ticks (fixed-interval tick driver)
//! - Notices (user-visible error side channel)

pub mod input;
pub mod notify;
pub mod time;

pub use input::{ClickEvent, MouseButton};
pub use notify::{LogNotifier, Notice, Notifier};
pub use time::TickDriver;
