mod countdown;
mod flag;
mod session_window;
mod signal;
mod start_sequence;

pub use countdown::{format_signed_hms, race_countdown};
pub use flag::{Flag, FlagAction, FlagState};
pub use session_window::SessionWindow;
pub use signal::{Signal, StartStage, VisualSignal};
pub use start_sequence::{StartGroup, StartSequence};
