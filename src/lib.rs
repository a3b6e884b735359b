pub mod error;
pub mod flags;
pub mod logging;
pub mod shell;

pub mod core;
pub mod highlight;
pub mod input;
pub mod io;
pub mod path;
pub mod plugins;

pub use crate::core::dispatcher::{DispatchOutcome, MAX_DISPATCH_DEPTH};
pub use crate::core::session::{Registers, Session};
