//! clinquery config - Show effective configuration

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::emit_machine;
use crate::config::Config;
use crate::error::{CqError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Dotted key to print, e.g. ranking.high_threshold
    pub key: Option<String>,

    /// Also list the config files that were consulted
    #[arg(long)]
    pub sources: bool,
}

#[derive(Debug, Serialize)]
struct ConfigSource {
    layer: &'static str,
    path: String,
    exists: bool,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    if let Some(key) = &args.key {
        let value = config_value_at(&ctx.config, key)?;
        if ctx.machine() {
            return emit_machine(serde_json::json!({ "key": key, "value": value }), ctx.output_format);
        }
        println!("{}", format_value(&value));
        return Ok(());
    }

    let sources = if args.sources { sources(ctx) } else { Vec::new() };

    if ctx.machine() {
        return emit_machine(
            serde_json::json!({ "config": &ctx.config, "sources": sources }),
            ctx.output_format,
        );
    }

    let rendered = toml::to_string_pretty(&ctx.config)
        .map_err(|err| CqError::Config(format!("render config: {err}")))?;
    println!("{}", rendered.trim_end());

    if !sources.is_empty() {
        println!();
        for source in &sources {
            let marker = if source.exists { "loaded" } else { "absent" };
            println!("# {:<8} {} ({marker})", source.layer, source.path);
        }
    }
    Ok(())
}

fn sources(ctx: &AppContext) -> Vec<ConfigSource> {
    let source = |layer, path: std::path::PathBuf| ConfigSource {
        layer,
        exists: path.exists(),
        path: path.display().to_string(),
    };

    if let Some(explicit) = &ctx.explicit_config {
        return vec![source("explicit", explicit.clone())];
    }
    let mut out = Vec::new();
    if let Some(global) = Config::global_path() {
        out.push(source("global", global));
    }
    out.push(source("project", Config::project_path(&ctx.project_root)));
    out
}

fn config_value_at(config: &Config, key: &str) -> Result<toml::Value> {
    let doc = toml::Value::try_from(config)
        .map_err(|err| CqError::Config(format!("serialize config: {err}")))?;
    let mut current = &doc;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| CqError::Config(format!("unknown key: {key}")))?;
    }
    Ok(current.clone())
}

fn format_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_keys_resolve() {
        let config = Config::default();
        let value = config_value_at(&config, "display.max_tags").unwrap();
        assert_eq!(value.as_integer(), Some(2));
        assert_eq!(
            format_value(&config_value_at(&config, "output.format").unwrap()),
            "human"
        );
    }

    #[test]
    fn unknown_key_is_config_error() {
        let err = config_value_at(&Config::default(), "display.colour").unwrap_err();
        assert!(matches!(err, CqError::Config(_)));
    }
}
