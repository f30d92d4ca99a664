use std::env;
use std::fmt::Display;
use std::str::FromStr;

pub(crate) const FLOATX_VAR: &str = "BLOCKS_FLOATX";
pub(crate) const DEFAULT_SEED_VAR: &str = "BLOCKS_DEFAULT_SEED";

/// Reads and parses an environment variable, ignoring unset or blank values.
///
/// Values that fail to parse are reported once through `tracing` and treated as unset.
pub(crate) fn parse_var<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse_value(name, &value),
        _ => None,
    }
}

fn parse_value<T>(name: &str, value: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!(var = name, value, %err, "ignoring invalid environment override");
            None
        }
    }
}
