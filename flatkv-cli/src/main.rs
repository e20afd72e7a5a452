use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flatkv_client::{Client, ClientConfig, Value, ENDPOINT_ENV_VAR};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod table;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Table format
    Table,
    /// Pretty JSON (default)
    Json,
    /// JSON Lines (one entry per line)
    Jsonl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Parser)]
#[command(name = "flatkv")]
#[command(about = "flatkv key-value store CLI", long_about = None)]
struct Cli {
    /// Store endpoint URL
    #[arg(long, global = true, env = ENDPOINT_ENV_VAR)]
    url: Option<String>,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a value
    Get {
        /// Key
        key: String,
        /// Print the stored text without decoding it
        #[arg(long)]
        raw: bool,
    },
    /// Set a value
    Set {
        /// Key
        key: String,
        /// Value as JSON
        value: String,
        /// Store the value as a plain string instead of parsing it as JSON
        #[arg(short, long)]
        string: bool,
    },
    /// Delete a key
    Delete {
        /// Key
        key: String,
    },
    /// List keys
    List {
        /// Only list keys starting with this prefix
        #[arg(default_value = "")]
        prefix: String,
    },
    /// Delete every key
    Empty,
    /// Print every key and value
    Dump {
        /// Output format (table, json, jsonl)
        #[arg(short, long, value_enum, default_value = "json")]
        output: OutputFormat,
    },
    /// Set every entry of a JSON object file
    Load {
        /// Path to a file holding a JSON object
        file: PathBuf,
    },
    /// Delete several keys at once
    DeleteMany {
        /// Keys
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Set a field of an object value
    UpdateObject {
        /// Key holding the object
        key: String,
        /// Field to set
        field: String,
        /// Field value as JSON
        value: String,
    },
    /// Append to an array value
    Push {
        /// Key holding the array
        key: String,
        /// Item as JSON
        item: String,
    },
    /// Remove an array element by position
    RemoveIndex {
        /// Key holding the array
        key: String,
        /// Zero-based position
        index: usize,
    },
    /// Remove the first array element whose field matches a value
    RemoveMatch {
        /// Key holding the array
        key: String,
        /// Field to compare
        field: String,
        /// Value to match, as JSON
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let url = cli
        .url
        .with_context(|| format!("No endpoint given; pass --url or set {}", ENDPOINT_ENV_VAR))?;
    let config = ClientConfig::new(url);
    debug!("Using endpoint {}", config.endpoint);
    let client = Client::new(config).context("Failed to create client")?;

    run(&client, cli.command).await
}

fn init_logging(format: LogFormat) {
    // Default to warn, override with RUST_LOG (e.g. RUST_LOG=flatkv_client=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(client: &Client, command: Commands) -> Result<()> {
    match command {
        Commands::Get { key, raw } => {
            if raw {
                let text = client.get_raw(&key).await.context("Failed to get value")?;
                println!("{}", text);
            } else {
                match client.get(&key).await.context("Failed to get value")? {
                    Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                    None => println!("null"),
                }
            }
        }

        Commands::Set { key, value, string } => {
            let value = if string {
                Value::String(value)
            } else {
                parse_json_arg(&value)?
            };
            client.set(&key, &value).await.context("Failed to set value")?;
        }

        Commands::Delete { key } => {
            client.delete(&key).await.context("Failed to delete key")?;
        }

        Commands::List { prefix } => {
            for key in client.list(&prefix).await.context("Failed to list keys")? {
                println!("{}", serde_json::to_string(&key)?);
            }
        }

        Commands::Empty => {
            client.empty().await.context("Failed to empty store")?;
        }

        Commands::Dump { output } => {
            let entries = client.get_all().await.context("Failed to read store")?;
            match output {
                OutputFormat::Table => println!("{}", table::format_entries_table(&entries)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
                OutputFormat::Jsonl => {
                    for (key, value) in &entries {
                        let line = serde_json::json!({ "key": key, "value": value });
                        println!("{}", serde_json::to_string(&line)?);
                    }
                }
            }
        }

        Commands::Load { file } => {
            let entries = read_object_file(&file)?;
            let count = entries.len();
            client.set_all(entries).await.context("Failed to load entries")?;
            debug!("Loaded {} entries from {}", count, file.display());
        }

        Commands::DeleteMany { keys } => {
            client
                .delete_multiple(keys)
                .await
                .context("Failed to delete keys")?;
        }

        Commands::UpdateObject { key, field, value } => {
            let value = parse_json_arg(&value)?;
            let object = client
                .update_object(&key, &field, &value)
                .await
                .context("Failed to update object")?;
            println!("{}", serde_json::to_string_pretty(&object)?);
        }

        Commands::Push { key, item } => {
            let item = parse_json_arg(&item)?;
            let items = client
                .push_array(&key, &item)
                .await
                .context("Failed to push to array")?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }

        Commands::RemoveIndex { key, index } => {
            let items = client
                .delete_array_item_by_index(&key, index)
                .await
                .context("Failed to remove array item")?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }

        Commands::RemoveMatch { key, field, value } => {
            let value = parse_json_arg(&value)?;
            let items = client
                .delete_array_item_by_value(&key, &field, &value)
                .await
                .context("Failed to remove array item")?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }

    Ok(())
}

fn parse_json_arg(input: &str) -> Result<Value> {
    serde_json::from_str(input)
        .with_context(|| format!("Invalid JSON {:?} (use --string to store plain text)", input))
}

fn read_object_file(path: &Path) -> Result<serde_json::Map<String, Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text).context("Invalid JSON")?;
    match value {
        Value::Object(entries) => Ok(entries),
        _ => anyhow::bail!("{} does not hold a JSON object", path.display()),
    }
}
