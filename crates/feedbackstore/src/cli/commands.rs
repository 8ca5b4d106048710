//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::message::MessagePayload;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Get command arguments.
#[derive(Debug, Args)]
pub struct GetCommand {
    /// Id of the message to show
    pub id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Contact email of the submitter
    #[arg(long)]
    pub email: String,

    /// First language tag
    #[arg(long)]
    pub language1: String,

    /// Second language tag
    #[arg(long)]
    pub language2: String,

    /// Feedback text
    #[arg(long)]
    pub comment: String,

    /// Link to an attachment
    #[arg(long = "attachment-url", value_name = "URL")]
    pub attachment_url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl AddCommand {
    /// The message payload described by these arguments.
    #[must_use]
    pub fn payload(&self) -> MessagePayload {
        MessagePayload {
            email: self.email.clone(),
            language1: self.language1.clone(),
            language2: self.language2.clone(),
            comment: self.comment.clone(),
            attachment_url: self.attachment_url.clone(),
        }
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the message to delete
    pub id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
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

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_add_command_payload() {
        let cmd = AddCommand {
            email: "e@x.org".to_string(),
            language1: "pt".to_string(),
            language2: "es".to_string(),
            comment: "obrigado".to_string(),
            attachment_url: "https://x.org/a.png".to_string(),
            format: OutputFormat::Json,
        };

        let payload = cmd.payload();
        assert_eq!(payload.language1, "pt");
        assert_eq!(payload.comment, "obrigado");
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
