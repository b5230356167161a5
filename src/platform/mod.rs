//! Host-facing glue: raw input mapping, frame timing and the window loop

pub mod input;
pub mod time;
pub mod window;

pub use input::{InputAdapter, InputState, Key};
pub use time::{FrameClock, MAX_SUBSTEPS, SIM_DT};
pub use window::{Host, Window};
