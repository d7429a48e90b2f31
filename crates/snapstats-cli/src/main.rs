use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use snapstats_browser::DEFAULT_DEBUGGING_PORT;
use snapstats_cli::commands::analyze::AnalyzeOptions;
use snapstats_cli::commands::config::ConfigAction;
use snapstats_cli::commands::export::ExportAs;
use snapstats_cli::{OutputFormat, commands};
use std::path::PathBuf;

const COMPLETION_HELP: &str = "\
SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    bash:  snapstats completion --shell bash >> ~/.bashrc
    zsh:   snapstats completion --shell zsh > ~/.zfunc/_snapstats
           (add `fpath=(~/.zfunc $fpath)` to ~/.zshrc before compinit)
    fish:  snapstats completion --shell fish > ~/.config/fish/completions/snapstats.fish";

#[derive(Parser)]
#[command(name = "snapstats")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A CLI tool for single-page web performance reports",
    long_about = "snapstats loads a page in headless Chrome, collects Core Web Vitals and \
                  resource timings, and turns them into a graded report with recommendations."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// History file (defaults to <data dir>/snapstats/history.json)
    #[arg(long, global = true, env = "SNAPSTATS_HISTORY_FILE", value_name = "FILE")]
    history_file: Option<PathBuf>,

    /// Settings file (defaults to <config dir>/snapstats/settings.json)
    #[arg(long, global = true, env = "SNAPSTATS_SETTINGS_FILE", value_name = "FILE")]
    settings_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a page in headless Chrome and report on its performance
    Analyze {
        /// Page to analyze; bare hosts get https://
        #[arg(value_name = "URL")]
        url: String,

        /// Path to the Chrome binary
        #[arg(long)]
        chrome_path: Option<PathBuf>,

        /// Chrome remote debugging port
        #[arg(long, default_value_t = DEFAULT_DEBUGGING_PORT)]
        port: u16,

        /// How long the in-page observers run, in milliseconds
        #[arg(long, default_value_t = 3000)]
        window_ms: u64,

        /// Give up on collection after this many seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Don't add this run to the history
        #[arg(long)]
        no_history: bool,

        /// Also save the raw sample as JSON
        #[arg(long, value_name = "FILE")]
        save_sample: Option<PathBuf>,

        /// Explain each metric
        #[arg(long)]
        explain: bool,
    },

    /// Build a report from a saved metrics sample
    Report {
        /// Path to the sample JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Add this run to the history
        #[arg(long)]
        record: bool,

        /// Explain each metric
        #[arg(long)]
        explain: bool,
    },

    /// Export the normalized metrics of a saved sample
    Export {
        /// Path to the sample JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Export format
        #[arg(long = "as", value_enum, default_value_t = ExportAs::Json)]
        export_as: ExportAs,

        /// Output file or directory (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the trend of recent runs
    History {
        /// Delete all recorded runs
        #[arg(long)]
        clear: bool,
    },

    /// Manage collection settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(after_help = COMPLETION_HELP)]
    Completion {
        /// Target shell
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    match cli.command {
        Commands::Analyze {
            url,
            chrome_path,
            port,
            window_ms,
            timeout_secs,
            headed,
            no_history,
            save_sample,
            explain,
        } => commands::analyze::execute(
            &url,
            AnalyzeOptions {
                chrome_path,
                port,
                window_ms,
                timeout_secs,
                headed,
                no_history,
                save_sample,
                explain,
            },
            cli.settings_file,
            cli.history_file,
            cli.format,
        ),
        Commands::Report {
            file,
            record,
            explain,
        } => commands::report::execute(&file, record, explain, cli.history_file, cli.format),
        Commands::Export {
            file,
            export_as,
            output,
        } => commands::export::execute(&file, export_as, output),
        Commands::History { clear } => {
            commands::history::execute(clear, cli.history_file, cli.format)
        }
        Commands::Config { action } => {
            commands::config::execute(action, cli.settings_file, cli.format)
        }
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("snapstats=debug,snapstats_core=debug,snapstats_browser=debug")
    } else {
        EnvFilter::new("snapstats=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
