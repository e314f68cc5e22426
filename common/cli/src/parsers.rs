use std::collections::HashMap;
use std::ffi::OsStr;
use std::str::FromStr;

use clap::builder::TypedValueParser;
use clap::error::ErrorKind;
use clap::{Arg, Command, Error};
use inventory::RankSpec;
use math::Point;

#[derive(Clone, Default)]
pub struct RankSpecParser {}

impl TypedValueParser for RankSpecParser {
    type Value = RankSpec;

    /// Parses a run-length encoded rank selection, e.g. '2-3+'
    fn parse_ref(&self, _cmd: &Command, _arg: Option<&Arg>, value: &OsStr) -> Result<Self::Value, Error> {
        let value = value
            .to_str()
            .ok_or_else(|| Error::raw(ErrorKind::InvalidValue, "Invalid argument encoding"))?;

        RankSpec::from_str(value).map_err(|error| Error::raw(ErrorKind::InvalidValue, error.to_string()))
    }
}

/// Parses a point in the format 'x=<X>,y=<Y>', e.g. 'x=10,y=2.5'
pub fn point_parser(s: &str) -> Result<Point, String> {
    let mut values = HashMap::new();
    let mut errors = Vec::new();
    let required_keys = ["x", "y"];

    for chunk in s.split(',') {
        let chunk_chunks: Vec<_> = chunk.split('=').collect();
        if chunk_chunks.len() != 2 {
            errors.push(format!(
                "Expected exactly 1 equal sign in '{}', found {}",
                chunk,
                chunk_chunks.len() - 1
            ));
            continue;
        }

        let key = chunk_chunks[0].trim();
        let value_str = chunk_chunks[1].trim();

        if !required_keys.contains(&key) {
            errors.push(format!("Invalid key: '{}'", key));
            continue;
        }

        match value_str.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                values.insert(key, value);
            }
            Ok(value) => {
                errors.push(format!("Non-finite value for key '{}': {}", key, value));
            }
            Err(e) => {
                errors.push(format!("Failed to parse value for key '{}': {}", key, e));
            }
        }
    }

    let missing: Vec<_> = required_keys
        .iter()
        .filter(|key| !values.contains_key(*key))
        .copied()
        .collect();

    if !missing.is_empty() {
        errors.push(format!(
            "Missing/invalid keys: {}, expected keys: {}",
            missing.join(", "),
            required_keys.join(", ")
        ));
    }

    if !errors.is_empty() {
        return Err(errors.join("; "));
    }

    Ok(Point::new(values["x"], values["y"]))
}
