/// Terminal commands
use crate::error::CallerError;
use std::fmt;
use std::str::FromStr;

/// A line typed by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Restart,
    Finish,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Every command, in help order
    pub const ALL: [Command; 7] = [
        Command::Start,
        Command::Pause,
        Command::Restart,
        Command::Finish,
        Command::Status,
        Command::Help,
        Command::Quit,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Command::Start => "start or resume the presentation",
            Command::Pause => "freeze the current card and fade out the music",
            Command::Restart => "reshuffle the deck and clear the board",
            Command::Finish => "stop the presentation, keeping the deck position",
            Command::Status => "show counters and timer",
            Command::Help => "list commands",
            Command::Quit => "leave",
        }
    }

    /// Single-letter alias
    pub fn alias(self) -> Option<char> {
        match self {
            Command::Start => Some('s'),
            Command::Pause => Some('p'),
            Command::Restart => Some('r'),
            Command::Finish => Some('f'),
            Command::Quit => Some('q'),
            Command::Status | Command::Help => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Restart => "restart",
            Command::Finish => "finish",
            Command::Status => "status",
            Command::Help => "help",
            Command::Quit => "quit",
        };
        f.write_str(name)
    }
}

impl FromStr for Command {
    type Err = CallerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" | "s" => Ok(Command::Start),
            "pause" | "p" => Ok(Command::Pause),
            "restart" | "r" => Ok(Command::Restart),
            "finish" | "f" => Ok(Command::Finish),
            "status" => Ok(Command::Status),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(CallerError::UnknownCommand(other.to_string())),
        }
    }
}
