//! Row conversion helpers shared by the query modules.

use std::str::FromStr;

use jiff::{civil::Date, Timestamp};
use rusqlite::{types::Type, Row};

/// Current time truncated to whole seconds.
///
/// Stored timestamps never carry a fractional part, so their text form sorts
/// and compares the same way as the instants themselves.
pub fn now() -> Timestamp {
    whole_second(Timestamp::now())
}

/// `at` with its fractional second dropped.
pub fn whole_second(at: Timestamp) -> Timestamp {
    Timestamp::from_second(at.as_second()).unwrap_or(at)
}

/// Read a text column and parse it with `FromStr`.
pub(crate) fn parse_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("Invalid value '{raw}': {e}").into(),
        )
    })
}

/// Nullable variant of [`parse_column`].
pub(crate) fn parse_optional_column<T>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        raw.parse::<T>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                Type::Text,
                format!("Invalid value '{raw}': {e}").into(),
            )
        })
    })
    .transpose()
}

pub(crate) fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<Timestamp> {
    parse_column(row, idx)
}

pub(crate) fn date_column(row: &Row, idx: usize) -> rusqlite::Result<Date> {
    parse_column(row, idx)
}

pub(crate) fn id_column(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(idx)? as u64)
}
