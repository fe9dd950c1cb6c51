/// Interactive session commands
use crate::error::PlayerError;
use melody_core::TrackId;
use std::str::FromStr;

/// One line typed into a session
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Previous,
    Play,
    Pause,
    Toggle,
    Shuffle,
    Loop,
    /// Fraction of the active track, 0 to 1
    Seek(f64),
    Volume(f64),
    Mute,
    /// Set a speed, or step the speed button without an argument
    Speed(Option<f64>),
    Goto(TrackId),
    Queue,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  next | n            skip to the next track
  prev | p            back to the previous track
  play | pause | toggle
  shuffle             toggle shuffle (turns loop off)
  loop                toggle loop (turns shuffle off)
  seek <0..1>         jump to a fraction of the track
  vol <0..1>          set volume
  mute                mute / restore volume
  speed [<x>]         set speed, or step 0.5x..4x
  goto <id>           play a track from the queue
  queue               show what plays next
  status              show the active track
  help                this text
  quit | q            end the session";

impl FromStr for Command {
    type Err = PlayerError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Err(PlayerError::Command("empty line".to_string()));
        };
        let arg = parts.next();

        let command = match (word.to_lowercase().as_str(), arg) {
            ("next" | "n", None) => Command::Next,
            ("prev" | "previous" | "p", None) => Command::Previous,
            ("play", None) => Command::Play,
            ("pause", None) => Command::Pause,
            ("toggle", None) => Command::Toggle,
            ("shuffle", None) => Command::Shuffle,
            ("loop", None) => Command::Loop,
            ("seek", Some(arg)) => Command::Seek(number(arg)?),
            ("vol" | "volume", Some(arg)) => Command::Volume(number(arg)?),
            ("mute", None) => Command::Mute,
            ("speed", None) => Command::Speed(None),
            ("speed", Some(arg)) => Command::Speed(Some(number(arg)?)),
            ("goto", Some(arg)) => Command::Goto(TrackId::new(arg)),
            ("queue", None) => Command::Queue,
            ("status", None) => Command::Status,
            ("help" | "?", None) => Command::Help,
            ("quit" | "exit" | "q", None) => Command::Quit,
            _ => return Err(PlayerError::Command(line.trim().to_string())),
        };

        if parts.next().is_some() {
            return Err(PlayerError::Command(line.trim().to_string()));
        }
        Ok(command)
    }
}

fn number(arg: &str) -> Result<f64, PlayerError> {
    arg.parse()
        .map_err(|_| PlayerError::Command(format!("not a number: {}", arg)))
}
