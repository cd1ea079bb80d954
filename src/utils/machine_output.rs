use crate::error::Result;
use chrono::Utc;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-oriented text
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn is_machine(&self) -> bool {
        !matches!(self, OutputFormat::Table)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MachineEnvelope<T>
where
    T: Serialize,
{
    pub version: String,
    pub command: String,
    pub ok: bool,
    pub data: T,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub meta: MachineMeta,
}

#[derive(Debug, Serialize)]
pub struct MachineMeta {
    pub generated_at: String,
    pub host: Option<String>,
}

impl<T: Serialize> MachineEnvelope<T> {
    pub fn v1(command: &str, data: T, warnings: Vec<String>, errors: Vec<String>) -> Self {
        Self {
            version: "v1".to_string(),
            command: command.to_string(),
            ok: errors.is_empty(),
            data,
            warnings,
            errors,
            meta: MachineMeta {
                generated_at: Utc::now().to_rfc3339(),
                host: hostname::get()
                    .ok()
                    .map(|h| h.to_string_lossy().into_owned()),
            },
        }
    }

    /// Serialized envelope, or `None` for the human format.
    pub fn render(&self, format: OutputFormat) -> Result<Option<String>> {
        Ok(match format {
            OutputFormat::Json => Some(serde_json::to_string_pretty(self)?),
            OutputFormat::Yaml => Some(serde_yml::to_string(self)?),
            OutputFormat::Table => None,
        })
    }
}

pub fn emit_v1<T>(
    command: &str,
    data: T,
    warnings: Vec<String>,
    errors: Vec<String>,
    format: OutputFormat,
) -> Result<()>
where
    T: Serialize,
{
    let envelope = MachineEnvelope::v1(command, data, warnings, errors);
    if let Some(out) = envelope.render(format)? {
        println!("{}", out);
    }
    Ok(())
}
