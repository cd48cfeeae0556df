use ringmotion::NavInput;
use std::fmt;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Show,
    Hide,
    Navigate(NavInput),
    ConfigReload,
}

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
    #[error("'jump' needs an item index")]
    MissingIndex,
    #[error("Invalid item index '{0}'")]
    BadIndex(String),
    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
enum Verb {
    Show,
    Hide,
    #[strum(to_string = "next", serialize = "n", serialize = "right")]
    Next,
    #[strum(to_string = "prev", serialize = "p", serialize = "previous", serialize = "left")]
    Prev,
    #[strum(to_string = "reset", serialize = "home")]
    Reset,
    #[strum(to_string = "jump", serialize = "goto")]
    Jump,
}

/// One line of the control socket protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Show,
    Hide,
    Next,
    Prev,
    Reset,
    Jump(usize),
}

impl FromStr for ControlCommand {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let head = words.next().unwrap_or_default();
        let verb =
            Verb::from_str(head).map_err(|_| ControlError::UnknownCommand(head.to_string()))?;

        let command = match verb {
            Verb::Show => Self::Show,
            Verb::Hide => Self::Hide,
            Verb::Next => Self::Next,
            Verb::Prev => Self::Prev,
            Verb::Reset => Self::Reset,
            Verb::Jump => {
                let arg = words.next().ok_or(ControlError::MissingIndex)?;
                let index = arg
                    .parse()
                    .map_err(|_| ControlError::BadIndex(arg.to_string()))?;
                Self::Jump(index)
            }
        };

        match words.next() {
            Some(extra) => Err(ControlError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show => write!(f, "{}", Verb::Show),
            Self::Hide => write!(f, "{}", Verb::Hide),
            Self::Next => write!(f, "{}", Verb::Next),
            Self::Prev => write!(f, "{}", Verb::Prev),
            Self::Reset => write!(f, "{}", Verb::Reset),
            Self::Jump(i) => write!(f, "{} {}", Verb::Jump, i),
        }
    }
}

impl From<ControlCommand> for AppEvent {
    fn from(command: ControlCommand) -> Self {
        match command {
            ControlCommand::Show => AppEvent::Show,
            ControlCommand::Hide => AppEvent::Hide,
            ControlCommand::Next => AppEvent::Navigate(NavInput::Next),
            ControlCommand::Prev => AppEvent::Navigate(NavInput::Prev),
            ControlCommand::Reset => AppEvent::Navigate(NavInput::Reset),
            ControlCommand::Jump(i) => AppEvent::Navigate(NavInput::Jump(i)),
        }
    }
}
