//! Non-fatal results of a user interaction.
//!
//! Fatal problems (unreadable files, schema mismatches) travel as
//! `anyhow::Error`. An [`Outcome`] covers everything else: the selection may
//! still be incomplete, or it may simply match no data.

use std::fmt;

use crate::selection::SelectionField;

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    /// The user has not chosen every required parameter yet.
    Incomplete(Vec<SelectionField>),
    /// The selection is complete but nothing in the data matches it.
    NoData(String),
}

impl<T> Outcome<T> {
    pub fn no_data(reason: impl Into<String>) -> Self {
        Outcome::NoData(reason.into())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Ready(value) => Outcome::Ready(value),
            Outcome::Incomplete(fields) => Outcome::Incomplete(fields.clone()),
            Outcome::NoData(reason) => Outcome::NoData(reason.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ready(value) => Outcome::Ready(f(value)),
            Outcome::Incomplete(fields) => Outcome::Incomplete(fields),
            Outcome::NoData(reason) => Outcome::NoData(reason),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Ready(value) => f(value),
            Outcome::Incomplete(fields) => Outcome::Incomplete(fields),
            Outcome::NoData(reason) => Outcome::NoData(reason),
        }
    }

    /// The ready value, or this outcome re-typed for an early return.
    pub fn into_ready<U>(self) -> Result<T, Outcome<U>> {
        match self {
            Outcome::Ready(value) => Ok(value),
            Outcome::Incomplete(fields) => Err(Outcome::Incomplete(fields)),
            Outcome::NoData(reason) => Err(Outcome::NoData(reason)),
        }
    }

    /// Message to show the user instead of a result, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Outcome::Ready(_) => None,
            Outcome::Incomplete(fields) => Some(incomplete_message(fields)),
            Outcome::NoData(reason) => Some(format!("No data for this selection: {}", reason)),
        }
    }
}

fn incomplete_message(fields: &[SelectionField]) -> String {
    let names = fields.iter().map(|field| field.to_string()).collect::<Vec<_>>();
    match names.as_slice() {
        [] => "Please complete the selection".to_string(),
        [one] => format!("Please select {}", one),
        [init @ .., last] => format!("Please select {} and {}", init.join(", "), last),
    }
}

impl<T> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => f.write_str(&message),
            None => f.write_str("ready"),
        }
    }
}
