use std::fmt::{Display, Formatter};
use strum_macros::Display;

/// A flag shown from the committee boat during the start sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    /// Class flag of a dinghy class, named after the class.
    Class(String),
    /// Flag used in place of a class flag for handicap starts.
    Handicap,
    /// Flag P, the preparatory signal.
    BluePeter,
}

impl Display for Flag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Flag::Class(name) => write!(f, "{name} Class Flag"),
            Flag::Handicap => write!(f, "Handicap Flag"),
            Flag::BluePeter => write!(f, "Blue Peter"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FlagAction {
    Raise,
    Lower,
}

impl FlagAction {
    /// State a flag is in after this action.
    pub fn resulting_state(self) -> FlagState {
        match self {
            FlagAction::Raise => FlagState::Raised,
            FlagAction::Lower => FlagState::Lowered,
        }
    }
}

/// Flags start out lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum FlagState {
    #[default]
    Lowered,
    Raised,
}
