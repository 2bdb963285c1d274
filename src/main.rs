use std::env;

use voxdata::cli::{Cli, Command, HistoryAction};
use voxdata::config::Config;
use voxdata::{handlers, printer};

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // CLI overrides land in the environment before the config loads.
    if let Some(url) = &args.base_url {
        env::set_var("API_BASE_URL", url);
    }
    if let Some(report) = &args.report {
        env::set_var("REPORT_PATH", report);
    }
    let cfg = Config::load();

    let outcome = match args.command {
        Command::Upload { file } => handlers::upload::run(&cfg, &file).await,
        Command::Ask { command } => handlers::ask::run(&cfg, &command.join(" "), args.yes).await,
        Command::Voice => handlers::voice::run(&cfg, args.yes).await,
        Command::Exec { code, file } => handlers::exec::run(&cfg, code, file, args.yes).await,
        Command::Describe => handlers::describe::run(&cfg).await,
        Command::History { action } => match action {
            HistoryAction::Show => handlers::history::show(&cfg).await,
            HistoryAction::Clear => handlers::history::clear(&cfg, args.yes).await,
        },
    };

    if let Err(e) = outcome {
        printer::error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}
