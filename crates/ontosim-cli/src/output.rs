//! Output formats shared by every command.
//!
//! `--format` beats `--json`, which beats `OSIM_FORMAT`. Without any of
//! them a terminal gets pretty output and a pipe gets text.

use clap::ValueEnum;
use ontosim_core::{OboError, OntologyError};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Headed sections with aligned fields.
    Pretty,
    /// Tab-separated records.
    Text,
    Json,
}

impl OutputMode {
    pub fn resolve(flag: Option<Self>, json: bool) -> Self {
        let env = std::env::var("OSIM_FORMAT").ok();
        Self::pick(flag, json, env.as_deref(), io::stdout().is_terminal())
    }

    fn pick(flag: Option<Self>, json: bool, env: Option<&str>, tty: bool) -> Self {
        flag.or(json.then_some(Self::Json))
            .or_else(|| env.and_then(|name| <Self as ValueEnum>::from_str(name, true).ok()))
            .unwrap_or(if tty { Self::Pretty } else { Self::Text })
    }
}

pub fn heading(w: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(w, "{title}")?;
    rule(w)
}

pub fn rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", "-".repeat(60))
}

pub fn field(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

#[must_use]
pub fn score(value: f64) -> String {
    format!("{value:.6}")
}

/// Write `report` as JSON, or through the text or pretty renderer.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    report: &T,
    text: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, report)?;
            writeln!(out)?;
        }
        OutputMode::Text => text(report, &mut out)?,
        OutputMode::Pretty => pretty(report, &mut out)?,
    }
    Ok(())
}

/// A failure as shown on stderr.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// `O....` for ontology errors, a snake_case name otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    pub fn new(code: &str, message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: Some(suggestion.into()),
            error_code: Some(code.to_string()),
        }
    }
}

impl From<&anyhow::Error> for CliError {
    /// Takes the code of the first ontology or OBO error in the chain.
    fn from(err: &anyhow::Error) -> Self {
        let known = err.chain().find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<OntologyError>() {
                return Some((e.code().to_string(), e.hint().map(str::to_string)));
            }
            cause.downcast_ref::<OboError>().map(|_| {
                let hint = "check the OBO file near the reported line".to_string();
                ("obo_parse".to_string(), Some(hint))
            })
        });
        let (error_code, suggestion) = known.unzip();
        Self {
            message: format!("{err:#}"),
            suggestion: suggestion.flatten(),
            error_code,
        }
    }
}

pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let mut out = io::stderr().lock();
    if mode == OutputMode::Json {
        serde_json::to_writer_pretty(&mut out, &serde_json::json!({ "error": error }))?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(out, "error: {}", error.message)?;
    if let Some(suggestion) = &error.suggestion {
        writeln!(out, "  suggestion: {suggestion}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn explicit_format_beats_json_flag_and_env() {
        let mode = OutputMode::pick(Some(OutputMode::Text), true, Some("pretty"), true);
        assert_eq!(mode, OutputMode::Text);
        assert_eq!(OutputMode::pick(None, true, Some("text"), true), OutputMode::Json);
    }

    #[test]
    fn env_format_ignores_case_and_unknown_names() {
        assert_eq!(OutputMode::pick(None, false, Some("JSON"), false), OutputMode::Json);
        assert_eq!(OutputMode::pick(None, false, Some("yaml"), true), OutputMode::Pretty);
        assert_eq!(OutputMode::pick(None, false, None, false), OutputMode::Text);
    }

    #[test]
    fn ontology_errors_carry_code_and_hint() {
        let err = anyhow::Error::from(OntologyError::CycleDetected("GO:1".into()));
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("O2003"));
        assert!(cli.suggestion.is_some());
        assert!(cli.message.contains("GO:1"));
    }

    #[test]
    fn wrapped_errors_keep_their_code() {
        let err = Err::<(), _>(OntologyError::EmptyPolicy)
            .context("building graph from go.obo")
            .expect_err("error");
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("O1001"));
        assert!(cli.message.starts_with("building graph from go.obo"));
    }

    #[test]
    fn other_errors_have_no_code() {
        let cli = CliError::from(&anyhow::anyhow!("disk full"));
        assert_eq!(cli.message, "disk full");
        assert!(cli.error_code.is_none());
        let value = serde_json::to_value(&cli).expect("serialize");
        assert!(value.get("error_code").is_none());
    }

    #[test]
    fn json_error_shape() {
        let cli = CliError::new("x_code", "boom", "try again");
        let value = serde_json::to_value(&cli).expect("serialize");
        assert_eq!(value["message"], "boom");
        assert_eq!(value["error_code"], "x_code");
        assert_eq!(value["suggestion"], "try again");
    }

    #[test]
    fn fields_align_keys() {
        let mut buf = Vec::new();
        field(&mut buf, "depth", "3").expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "depth:         3\n");
    }
}
