//! Command-line front end for Butler.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt};

use butler::app::domain::{CaseType, LogLevel, SettingValue, TextProcessingOptions};
use butler::app::services::log_view::{self, LogFilter};
use butler::app::services::rename::{self, FileInfo};
use butler::app::services::text_ops::TextOperation;
use butler::{Butler, Config};
use butler::app::infrastructure::tracing_layer::BufferLayer;

#[derive(Parser)]
#[command(name = "butler", about = "Text tools, logs and settings", version)]
struct Cli {
    /// Directory holding settings.json (can also be set via BUTLER_CONFIG_DIR)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Directory holding logs/ (can also be set via BUTLER_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep settings and logs in memory only
    #[arg(long, global = true)]
    detached: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform text read from a file or stdin
    Text {
        /// Read from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[command(subcommand)]
        op: TextCommand,
    },
    /// Preview new names for a list of files
    Rename {
        files: Vec<String>,
        #[command(flatten)]
        options: ProcessArgs,
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    Logs {
        #[command(subcommand)]
        action: LogsCommand,
    },
    /// Answer JSON requests, one per line, on stdin/stdout
    Serve,
}

#[derive(Subcommand)]
enum TextCommand {
    RemoveEmptyLines,
    RemoveDuplicateLines,
    RemoveLinesContaining { text: String },
    AddPrefix { prefix: String },
    AddSuffix { suffix: String },
    SortLines,
    Case { case: CaseType },
    AddLineBreaks,
    RemoveExtraLineBreaks,
    /// Apply prefix, suffix, case and numbering in one pass
    Process {
        #[command(flatten)]
        options: ProcessArgs,
    },
}

#[derive(Args)]
struct ProcessArgs {
    #[arg(long, default_value = "")]
    prefix: String,
    #[arg(long, default_value = "")]
    suffix: String,
    #[arg(long)]
    case: Option<CaseType>,
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    start_number: i64,
    /// Replace each name with this pattern, `{n}` becoming the running number
    #[arg(long, default_value = "")]
    pattern: String,
}

impl From<ProcessArgs> for TextProcessingOptions {
    fn from(args: ProcessArgs) -> Self {
        Self {
            prefix: args.prefix,
            suffix: args.suffix,
            case_type: args.case,
            start_number: args.start_number,
            rename_pattern: args.pattern,
            ..Default::default()
        }
    }
}

impl From<TextCommand> for TextOperation {
    fn from(command: TextCommand) -> Self {
        match command {
            TextCommand::RemoveEmptyLines => Self::RemoveEmptyLines,
            TextCommand::RemoveDuplicateLines => Self::RemoveDuplicateLines,
            TextCommand::RemoveLinesContaining { text } => Self::RemoveLinesContaining { text },
            TextCommand::AddPrefix { prefix } => Self::AddPrefix { prefix },
            TextCommand::AddSuffix { suffix } => Self::AddSuffix { suffix },
            TextCommand::SortLines => Self::SortLines,
            TextCommand::Case { case } => Self::ChangeCase { case },
            TextCommand::AddLineBreaks => Self::AddLineBreaks,
            TextCommand::RemoveExtraLineBreaks => Self::RemoveExtraLineBreaks,
            TextCommand::Process { options } => Self::Process { options: options.into() },
        }
    }
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the stored document, or a single key
    Get {
        key: Option<String>,
        /// Print every setting with defaults filled in
        #[arg(long)]
        typed: bool,
    },
    /// Store a value; `true`/`false` and integers keep their type
    Set { key: String, value: String },
    Reset,
}

#[derive(Subcommand)]
enum LogsCommand {
    /// Print buffered entries, newest first
    List {
        #[arg(short, long, default_value = "50")]
        count: usize,
        #[arg(short, long)]
        level: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },
    Count,
    Clear,
}

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    let mut text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
            text
        }
    };

    // The final newline of a file does not start another line.
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

fn serve(butler: &Butler) -> anyhow::Result<()> {
    butler.startup();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(out, "{}", butler.handle_json(&line))?;
        out.flush()?;
    }

    butler.shutdown();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if cli.config_dir.is_some() {
        config.config_dir = cli.config_dir;
    }
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir;
    }
    config.detached |= cli.detached;

    // The buffer layer needs the logger, so it is attached once Butler exists;
    // start-up warnings still reach stderr.
    let (buffer_layer, buffer_handle) = reload::Layer::new(None::<BufferLayer>);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("BUTLER_LOG")
                .unwrap_or_else(|_| "butler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(buffer_layer)
        .init();

    let butler = Butler::new(&config);
    buffer_handle
        .reload(Some(butler.buffer_layer()))
        .context("failed to attach the log buffer")?;

    match cli.command {
        Commands::Text { input, op } => {
            let text = read_input(input.as_ref())?;
            let operation = TextOperation::from(op);
            println!("{}", operation.apply(&text));
        }
        Commands::Rename { files, options, json } => {
            let files: Vec<FileInfo> = files.iter().map(|path| FileInfo::from_path(path)).collect();
            let previews = rename::preview(&files, &options.into());
            if json {
                println!("{}", serde_json::to_string_pretty(&previews)?);
            } else {
                println!("{}", rename::render_preview(&previews));
            }
        }
        Commands::Settings { action } => match action {
            SettingsCommand::Get { key: Some(key), .. } => {
                match butler.settings().read_settings().get(&key) {
                    Some(value) => println!("{}", value),
                    None => anyhow::bail!("setting '{}' is not set", key),
                }
            }
            SettingsCommand::Get { key: None, typed: true } => {
                let settings = butler.settings().typed_settings();
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            SettingsCommand::Get { key: None, typed: false } => {
                let doc = butler.settings().read_settings();
                println!("{}", serde_json::to_string_pretty(&doc)?);
            }
            SettingsCommand::Set { key, value } => {
                if !butler.settings().set_setting(&key, SettingValue::parse_loose(&value)) {
                    anyhow::bail!("failed to store setting '{}'", key);
                }
            }
            SettingsCommand::Reset => {
                if !butler.settings().reset_settings() {
                    anyhow::bail!("failed to reset settings");
                }
            }
        },
        Commands::Logs { action } => match action {
            LogsCommand::List { count, level, search, json } => {
                let filter = LogFilter {
                    level: level.as_deref().map(LogLevel::parse_lenient),
                    search,
                    limit: Some(count),
                    ..Default::default()
                };
                let logs = log_view::filter_logs(&butler.logger().get_all(), &filter);
                if json {
                    println!("{}", serde_json::to_string_pretty(&logs)?);
                } else {
                    for entry in &logs {
                        println!("{}", log_view::format_entry(entry));
                    }
                }
            }
            LogsCommand::Count => println!("{}", butler.logger().len()),
            LogsCommand::Clear => butler.logger().clear(),
        },
        Commands::Serve => serve(&butler)?,
    }

    Ok(())
}
