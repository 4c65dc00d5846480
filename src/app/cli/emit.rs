//! `--emit EVENT[=JSON]` values

use crate::app::cli::config::ConfigError;
use serde_json::Value;
use std::str::FromStr;

/// One event to emit with its arguments
#[derive(Debug, Clone, PartialEq)]
pub struct EmitSpec {
    pub event: String,
    pub args: Vec<Value>,
}

impl FromStr for EmitSpec {
    type Err = ConfigError;

    /// `name` emits no arguments, `name=[1,2]` emits each array element as
    /// its own argument, and any other JSON value is a single argument
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (event, payload) = match spec.split_once('=') {
            Some((event, payload)) => (event.trim(), Some(payload)),
            None => (spec.trim(), None),
        };
        if event.is_empty() {
            return Err(ConfigError::InvalidEmit {
                spec: spec.to_string(),
                message: "missing event name".to_string(),
            });
        }

        let args = match payload {
            None => Vec::new(),
            Some(payload) => match serde_json::from_str::<Value>(payload) {
                Ok(Value::Array(items)) => items,
                Ok(value) => vec![value],
                Err(error) => {
                    return Err(ConfigError::InvalidEmit {
                        spec: spec.to_string(),
                        message: error.to_string(),
                    })
                }
            },
        };

        Ok(Self {
            event: event.to_string(),
            args,
        })
    }
}
