pub mod access_map;
pub mod areas;
pub mod curves;
pub mod opportunities;
pub mod palma;

use accessatlas::{Mode, Outcome};
use anyhow::Result;

/// The ready value, or `None` after telling the user why there is none.
pub(crate) fn ready<T>(command: &str, outcome: Outcome<T>) -> Option<T> {
    match outcome {
        Outcome::Ready(value) => Some(value),
        other => {
            if let Some(message) = other.message() {
                log::warn!("[{}] {}", command, message);
                println!("{}", message);
            }
            None
        }
    }
}

/// An absent or empty mode stays unselected; anything else must parse.
pub(crate) fn parse_mode(mode: &Option<String>) -> Result<Option<Mode>> {
    match mode.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(mode) => Ok(Some(mode.parse()?)),
    }
}
