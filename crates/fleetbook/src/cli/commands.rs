//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::Field;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Field values for `add` and `edit`.
///
/// Omitted values are left as they are in the form: empty for `add`, the
/// stored value for `edit`.
#[derive(Debug, Args, Default)]
pub struct RecordArgs {
    /// License plate
    #[arg(long)]
    pub plate: Option<String>,

    /// Manufacturer
    #[arg(long)]
    pub brand: Option<String>,

    /// Paint color
    #[arg(long)]
    pub color: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Engine description, e.g. 1.8L
    #[arg(long)]
    pub engine: Option<String>,

    /// Model year
    #[arg(long)]
    pub year: Option<String>,

    /// Asking price
    #[arg(long)]
    pub price: Option<f64>,
}

impl RecordArgs {
    /// The values that were given, paired with their field.
    #[must_use]
    pub fn values(&self) -> Vec<(Field, String)> {
        let text = [
            (Field::Plate, &self.plate),
            (Field::Brand, &self.brand),
            (Field::Color, &self.color),
            (Field::Model, &self.model),
            (Field::Engine, &self.engine),
            (Field::Year, &self.year),
        ];

        let mut values: Vec<(Field, String)> = text
            .into_iter()
            .filter_map(|(field, value)| value.clone().map(|v| (field, v)))
            .collect();
        if let Some(price) = self.price {
            values.push((Field::Price, price.to_string()));
        }
        values
    }
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the vehicle to edit
    pub id: String,

    /// New field values
    #[command(flatten)]
    pub fields: RecordArgs,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Id of the vehicle to remove
    pub id: String,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per vehicle
    #[default]
    Plain,
    /// Aligned columns
    Table,
    /// JSON array
    Json,
}
