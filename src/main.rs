// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use enem_api::app_config::{self, Config};
use enem_api::display::QuestionView;
use enem_api::server::start_server;
use enem_api::{QuestionFilter, Repository};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the catalog over HTTP (default command)
    Serve(ServeArgs),

    /// Print a single question
    Show {
        /// Question id
        id: i64,
    },

    /// Print a random question matching the filters
    Random(FilterArgs),

    /// Write matching questions to a JSON file
    Export {
        /// Output file
        #[arg(short, long, default_value = "enem_questions_export.json")]
        output: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Generate shell completions for enem-api
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Interface to bind (overrides config and ENEM_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Exam year
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    year: Option<i64>,

    /// Discipline slug (e.g. 'matematica')
    #[arg(long)]
    discipline: Option<String>,

    /// Language slug (e.g. 'ingles')
    #[arg(long)]
    language: Option<String>,
}

impl From<FilterArgs> for QuestionFilter {
    fn from(args: FilterArgs) -> Self {
        QuestionFilter {
            year: args.year,
            discipline: args.discipline,
            language: args.language,
        }
    }
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Question store path (overrides config and ENEM_DATABASE_PATH)
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

/// enem-api - ENEM question catalog
///
/// Serves ENEM exam questions from a SQLite store over HTTP, and offers
/// a few commands to inspect the store from the terminal.
#[derive(Parser, Debug)]
#[command(name = "enem-api")]
#[command(version)]
#[command(about = "Read-only ENEM question catalog")]
#[command(long_about = "enem-api serves ENEM exam questions from a SQLite store over HTTP.

EXAMPLES:
    enem-api                                    # Serve using conf.json
    enem-api serve -p 8080                      # Serve on port 8080
    enem-api -d enem_questions.db show 2575     # Print question 2575
    enem-api random --year 2023 --discipline matematica
    enem-api export -o enem_2023.json --year 2023
    enem-api completions bash > enem-api.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't
    exist, a default one is created. PORT, ENEM_HOST and ENEM_DATABASE_PATH
    override the file; command-line flags override both.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalArgs,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "enem-api", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());

    let repository = Repository::open(&config.database.path)?;
    match repository.connection().stats() {
        Ok(stats) => info!("Question store ready. {}", stats),
        Err(e) => log::warn!("Could not read question store statistics: {}", e),
    }

    match cli.command {
        None | Some(Commands::Serve(_)) => {
            start_server(&config.server, Arc::new(repository)).await
        }
        Some(Commands::Show { id }) => {
            let question = repository
                .get_question_by_id(id)
                .await?
                .ok_or_else(|| anyhow!("Question with ID {} not found", id))?;
            print!("{}", QuestionView(&question));
            Ok(())
        }
        Some(Commands::Random(filter)) => {
            let filter: QuestionFilter = filter.into();
            let question = repository
                .get_random_question(&filter)
                .await?
                .ok_or_else(|| anyhow!("No questions found with the specified criteria"))?;
            print!("{}", QuestionView(&question));
            Ok(())
        }
        Some(Commands::Export { output, filter }) => {
            let filter: QuestionFilter = filter.into();
            export_questions(&repository, &filter, &output).await
        }
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

/// Load the config file, then apply environment and command-line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.global.config_path)?;
    config.apply_env_overrides();

    if let Some(database) = &cli.global.database {
        config.database.path = database.clone();
    }

    if let Some(log_level) = &cli.global.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Some(Commands::Serve(args)) = &cli.command {
        if let Some(host) = &args.host {
            config.server.host = host.clone();
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

async fn export_questions(
    repository: &Repository,
    filter: &QuestionFilter,
    output: &Path,
) -> Result<()> {
    let questions = repository.export_questions(filter).await?;

    let json = serde_json::to_string_pretty(&questions)
        .context("Failed to serialize questions to JSON")?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write export file: {:?}", output))?;

    info!("Exported {} questions to {:?}", questions.len(), output);
    Ok(())
}
