//! `fbstore` - CLI for feedbackstore
//!
//! This binary drives the message store from the command line: listing,
//! showing, adding and deleting feedback messages.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use feedbackstore::cli::{Cli, Command, ConfigCommand, OutputFormat};
use feedbackstore::message::from_nanos;
use feedbackstore::{api, init_logging, Config, Message, MessageStore, Response, StoreLimits};

/// Longest comment shown in table output before truncation.
const TABLE_COMMENT_WIDTH: usize = 40;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    if let Some(database) = cli.database.clone() {
        config.storage.database_path = Some(database);
    }

    match cli.command {
        Command::List(cmd) => {
            let store = open_store(&config)?;
            emit(api::get_messages(&store), cmd.format, |messages, format| {
                if format == OutputFormat::Table {
                    print_table(messages);
                } else {
                    for (i, message) in messages.iter().enumerate() {
                        if i > 0 {
                            println!();
                        }
                        print_message(message);
                    }
                }
            })
        }
        Command::Get(cmd) => {
            let store = open_store(&config)?;
            emit(api::get_message(&store, &cmd.id), cmd.format, print_one)
        }
        Command::Add(cmd) => {
            let store = open_store(&config)?;
            emit(api::add_message(&store, cmd.payload()), cmd.format, print_one)
        }
        Command::Delete(cmd) => {
            let store = open_store(&config)?;
            emit(api::delete_message(&store, &cmd.id), cmd.format, print_one)
        }
        Command::Status(cmd) => {
            handle_status(&config, cmd.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<MessageStore> {
    let path = config.database_path();
    MessageStore::open_with_limits(&path, StoreLimits::from(&config.storage))
        .with_context(|| format!("opening message store at {}", path.display()))
}

/// Print a boundary response and map it to an exit code.
fn emit<T: Serialize>(
    response: Response<T>,
    format: OutputFormat,
    show: impl FnOnce(&T, OutputFormat),
) -> anyhow::Result<ExitCode> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(if response.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    match response {
        Response::Ok(value) => {
            show(&value, format);
            Ok(ExitCode::SUCCESS)
        }
        Response::Err(message) => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_one(message: &Message, format: OutputFormat) {
    if format == OutputFormat::Table {
        print_table(std::slice::from_ref(message));
    } else {
        print_message(message);
    }
}

fn print_message(message: &Message) {
    println!("ID:          {}", message.id);
    println!("Email:       {}", message.email);
    println!("Languages:   {} / {}", message.language1, message.language2);
    println!("Comment:     {}", message.comment);
    println!("Attachment:  {}", message.attachment_url);
    println!("Created:     {}", message.created_at_utc().to_rfc3339());
    match message.updated_at {
        Some(updated) => println!("Updated:     {}", from_nanos(updated).to_rfc3339()),
        None => println!("Updated:     -"),
    }
}

fn print_table(messages: &[Message]) {
    if messages.is_empty() {
        println!("No messages.");
        return;
    }

    println!(
        "{:<36}  {:<19}  {:<24}  {:<11}  COMMENT",
        "ID", "CREATED", "EMAIL", "LANGUAGES"
    );
    for message in messages {
        let languages = format!("{}/{}", message.language1, message.language2);
        println!(
            "{:<36}  {:<19}  {:<24}  {:<11}  {}",
            message.id,
            message.created_at_utc().format("%Y-%m-%d %H:%M:%S"),
            message.email,
            languages,
            truncate(&message.comment, TABLE_COMMENT_WIDTH),
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() <= width && first_line.len() == text.len() {
        return text.to_string();
    }
    let mut short: String = first_line.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let stats = store.stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": store.path(),
            "total_messages": stats.total_messages,
            "oldest_message": stats.oldest_message,
            "newest_message": stats.newest_message,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let show_time = |t: Option<chrono::DateTime<chrono::Utc>>| {
            t.map_or_else(|| "-".to_string(), |t| t.to_rfc3339())
        };
        println!("fbstore status");
        println!("--------------");
        println!("Database:      {}", store.path().display());
        println!("Messages:      {}", stats.total_messages);
        println!("Oldest:        {}", show_time(stats.oldest_message));
        println!("Newest:        {}", show_time(stats.newest_message));
        println!("Size (bytes):  {}", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let limit = |bytes: usize| {
                    if bytes == 0 {
                        "unlimited".to_string()
                    } else {
                        bytes.to_string()
                    }
                };
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Max key bytes:      {}", limit(config.storage.max_key_bytes));
                println!("  Max value bytes:    {}", limit(config.storage.max_value_bytes));
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
