//! Renders configuration templates with a `get_env` helper.
use std::collections::HashMap;

use serde_json::Value;
use tera::{Context, Tera};

use crate::Result;

fn get_env(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = args
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("get_env requires a `name` argument"))?;
    match std::env::var(name) {
        Ok(value) => Ok(Value::String(value)),
        Err(_) => args
            .get("default")
            .cloned()
            .ok_or_else(|| tera::Error::msg(format!("environment variable `{name}` is not set"))),
    }
}

/// Renders `template` once with the values in `locals`.
///
/// # Errors
///
/// Returns an error when the template is invalid or references an unset
/// variable without a default.
pub fn render_string(template: &str, locals: &serde_json::Value) -> Result<String> {
    let mut tera = Tera::default();
    tera.register_function("get_env", get_env);
    let context = Context::from_serialize(locals)?;
    Ok(tera.render_str(template, &context)?)
}
