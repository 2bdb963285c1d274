use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "voxdata", about = "Voice and text driven data analysis client", version)]
pub struct Cli {
    /// Backend base URL (overrides API_BASE_URL from config).
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Path of the session report (overrides REPORT_PATH from config).
    #[arg(long)]
    pub report: Option<String>,

    /// Skip confirmation prompts (execute generated code, delete history).
    #[arg(short = 'y', long)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Upload a dataset and show its metadata
    Upload {
        /// Path of the tabular data file to upload
        file: String,
    },
    /// Turn a natural-language command into analysis code and run it
    Ask {
        /// The command, e.g. "plot sales by month"
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },
    /// Record a spoken command, transcribe it, then generate and run code
    Voice,
    /// Execute analysis code directly, without generation
    Exec {
        /// The code to execute
        code: Option<String>,
        /// Read the code from a file instead
        #[arg(long)]
        file: Option<String>,
    },
    /// Show metadata of the dataset uploaded in this session
    Describe,
    /// Inspect or clear the server-side command history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum HistoryAction {
    /// List history entries, most recent first
    Show,
    /// Delete all history entries (asks for confirmation)
    Clear,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
