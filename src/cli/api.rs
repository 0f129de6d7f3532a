//
//  basecamp-cli
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! Sends one request through the active profile's client and prints the
//! decoded response, similar to `gh api` for GitHub.
//!
//! ## Examples
//!
//! ```bash
//! # List archived projects (GET fields become query parameters)
//! bcx api projects -F status=archived
//!
//! # Create a to-do (other methods send fields as a JSON body)
//! bcx api -X POST buckets/1/todolists/2/todos -F content="Ship it" -F notify=true
//!
//! # Send a body from a file
//! bcx api -X PUT projects/3 --input project.json
//!
//! # Give up after five seconds
//! bcx api projects --deadline 5
//! ```

use std::fs;
use std::io::Read;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use serde_json::{Map, Value};

use crate::api::{ApiResult, Method, ResponseBody};
use crate::config::Config;

use super::{build_client, GlobalOptions};

/// Make an authenticated API request
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// Route below the profile's base URI (e.g., projects/42)
    pub route: String,

    /// HTTP method (GET, POST, PUT, DELETE)
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Typed parameter (key=value; true, false, null, numbers and JSON are parsed; nest with dots)
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// String parameter (key=value, never parsed)
    #[arg(long, action = clap::ArgAction::Append)]
    pub raw_field: Vec<String>,

    /// Read parameters from a file (- for stdin); non-JSON content is sent verbatim
    #[arg(long, short = 'f', conflicts_with_all = ["field", "raw_field"])]
    pub input: Option<String>,

    /// Print the response status line before the body
    #[arg(long, short = 'i')]
    pub include: bool,

    /// Do not print the response body
    #[arg(long)]
    pub silent: bool,

    /// Abandon the request after this many seconds
    #[arg(long)]
    pub deadline: Option<u64>,
}

impl ApiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let method: Method = self.method.parse()?;
        let params = self.build_params()?;

        let config = Config::load()?;
        let client = build_client(global, &config)?;

        let result = match self.deadline {
            Some(secs) => {
                client
                    .run_with_deadline(&self.route, &params, method, Duration::from_secs(secs))
                    .await?
            }
            None => client.run(&self.route, &params, method).await?,
        };

        self.print(&result, global)?;

        if let Some(message) = result.api_message() {
            eprintln!("{} {}", style("!").red(), message);
        }
        result.into_result()?;
        Ok(())
    }

    fn build_params(&self) -> Result<Value> {
        if let Some(input) = &self.input {
            let content = if input == "-" {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read parameters from stdin")?;
                buffer
            } else {
                fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
            };
            return Ok(parse_input(content));
        }

        if self.field.is_empty() && self.raw_field.is_empty() {
            return Ok(Value::Null);
        }

        let mut params = Map::new();
        for field in &self.field {
            let (key, value) = split_field(field)?;
            set_nested_value(&mut params, key, parse_field_value(value));
        }
        for field in &self.raw_field {
            let (key, value) = split_field(field)?;
            set_nested_value(&mut params, key, Value::String(value.to_string()));
        }
        Ok(Value::Object(params))
    }

    fn print(&self, result: &ApiResult, global: &GlobalOptions) -> Result<()> {
        if self.include {
            let status = match result {
                ApiResult::Success { status, .. } => style(status.to_string()).green(),
                ApiResult::Failure { status, .. } => style(status.to_string()).red(),
            };
            println!("{} {}", style("HTTP").dim(), status);
        }

        if self.silent {
            return Ok(());
        }

        match result.body() {
            ResponseBody::Json(json) if global.json => println!("{}", json),
            ResponseBody::Json(json) => println!("{}", serde_json::to_string_pretty(json)?),
            ResponseBody::Text(text) => println!("{}", text),
            ResponseBody::Empty => {}
        }
        Ok(())
    }
}

/// JSON input becomes structured parameters; anything else is a raw body.
fn parse_input(content: String) -> Value {
    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(_) => Value::String(content),
    }
}

fn split_field(field: &str) -> Result<(&str, &str)> {
    match field.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Invalid field format: {}. Expected key=value", field),
    }
}

fn parse_field_value(value: &str) -> Value {
    match value {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(n) = value.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
            {
                Value::Number(n)
            } else if value.starts_with('[') || value.starts_with('{') {
                serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
            } else {
                Value::String(value.to_string())
            }
        }
    }
}

fn set_nested_value(obj: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            obj.insert(key.to_string(), value);
        }
        Some((first, rest)) => {
            let entry = obj
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(nested) = entry {
                set_nested_value(nested, rest, value);
            }
        }
    }
}
