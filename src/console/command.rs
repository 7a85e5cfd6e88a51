use chrono::{NaiveTime, TimeDelta};
use std::path::PathBuf;
use std::str::FromStr;
use strum_macros::Display;

/// Operator input read line by line while a console is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `window HH:MM HH:MM` selects the races starting between the two local times.
    Window { open: NaiveTime, close: NaiveTime },
    /// `postpone <race> <minutes>` moves a race's planned start.
    Postpone { race: String, by: TimeDelta },
    /// `lap <sail number>` records a lap in the race console.
    Lap { sail_number: String },
    Refresh,
    Results,
    Export { path: PathBuf },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum CommandError {
    #[strum(to_string = "Empty command")]
    Empty,
    #[strum(to_string = "Unknown command \"{command}\", try \"help\"")]
    Unknown { command: String },
    #[strum(to_string = "{command} needs {argument}")]
    MissingArgument { command: String, argument: String },
    #[strum(to_string = "Invalid {argument} \"{value}\"")]
    InvalidArgument { argument: String, value: String },
}

impl std::error::Error for CommandError {}

impl Command {
    pub const HELP: &'static str = "window HH:MM HH:MM | postpone <race> <minutes> | lap <sail number> | \
                                    refresh | results | export <file.csv> | help | quit";

    fn missing(command: &str, argument: &str) -> CommandError {
        CommandError::MissingArgument { command: command.to_string(), argument: argument.to_string() }
    }

    fn invalid(argument: &str, value: &str) -> CommandError {
        CommandError::InvalidArgument { argument: argument.to_string(), value: value.to_string() }
    }

    fn parse_time(value: &str) -> Result<NaiveTime, CommandError> {
        NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| Self::invalid("time", value))
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else { return Err(CommandError::Empty) };
        let args: Vec<&str> = words.collect();
        match keyword.to_lowercase().as_str() {
            "window" => {
                let &[open, close] = args.as_slice() else {
                    return Err(Self::missing("window", "an opening and a closing time"));
                };
                Ok(Command::Window { open: Self::parse_time(open)?, close: Self::parse_time(close)? })
            }
            "postpone" => {
                let Some((minutes, name)) = args.split_last().filter(|(_, name)| !name.is_empty()) else {
                    return Err(Self::missing("postpone", "a race name and minutes"));
                };
                let by = minutes.parse::<i64>().map_err(|_| Self::invalid("minutes", minutes))?;
                Ok(Command::Postpone { race: name.join(" "), by: TimeDelta::minutes(by) })
            }
            "lap" => match *args.as_slice() {
                [sail_number] => Ok(Command::Lap { sail_number: sail_number.to_string() }),
                [] => Err(Self::missing("lap", "a sail number")),
                _ => Err(Self::invalid("sail number", &args.join(" "))),
            },
            "export" if args.is_empty() => Err(Self::missing("export", "a file name")),
            "export" => Ok(Command::Export { path: PathBuf::from(args.join(" ")) }),
            "refresh" => Ok(Command::Refresh),
            "results" => Ok(Command::Results),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown { command: keyword.to_string() }),
        }
    }
}
