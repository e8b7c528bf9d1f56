pub mod transform;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use crate::auth::hash_password;
use crate::normalize::slugify;

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Campus CMS operator tools")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print the URL slug for some text")]
    Slug { text: String },

    #[command(about = "Hash a password for the users table")]
    HashPassword { password: String },

    #[command(about = "Print the API representation of a raw row exported as JSON")]
    Transform {
        #[arg(value_enum)]
        kind: transform::EntityKind,
        /// File holding one row object or an array of rows
        file: std::path::PathBuf,
        /// Locale to extract; raw locale maps are printed when omitted
        #[arg(long)]
        locale: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Print a single value: bare in text mode, enveloped in JSON mode
fn output(format: OutputFormat, key: &str, value: Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "success": true, key: value }))?),
        OutputFormat::Text => match value {
            Value::String(s) => println!("{}", s),
            other => println!("{}", serde_json::to_string_pretty(&other)?),
        },
    }
    Ok(())
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Slug { text } => {
            let slug = slugify(&text);
            if slug.is_empty() {
                anyhow::bail!("'{}' has no characters usable in a slug", text);
            }
            output(format, "slug", Value::String(slug))
        }
        Commands::HashPassword { password } => {
            if password.is_empty() {
                anyhow::bail!("password must not be empty");
            }
            output(format, "hash", Value::String(hash_password(&password)?))
        }
        Commands::Transform { kind, file, locale } => {
            let raw = std::fs::read_to_string(&file)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {}", file.display(), e))?;
            let transformed = transform::transform_document(kind, &raw, locale.as_deref())?;
            output(format, "data", transformed)
        }
    }
}
