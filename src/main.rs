//! `storypages`: render narrative game pages from the command line

use clap::Parser;

use storypages::cli::args::Cli;
use storypages::cli::commands;
use storypages::error::ExitCode;
use storypages::observability::init_logging;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::USAGE_ERROR
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    match commands::dispatch(cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
