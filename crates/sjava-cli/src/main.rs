use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap_verbosity_flag::Verbosity;

mod check;
mod error;

#[derive(Parser, Debug)]
#[command(name = "sjava")]
#[command(about = "Static checker for sJava programs", long_about = None)]
struct Args {
    /// Program to check
    #[arg(value_name = "FILE")]
    file: PathBuf,

    #[command(flatten)]
    verbose: Verbosity,
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match check::check_file(&args.file) {
        Ok(report) => {
            log::info!("{}: {}", args.file.display(), report);
            ExitCode::SUCCESS
        }
        Err(error) => {
            let code = error.exit_code();
            eprintln!("{:?}", miette::Report::new(error));
            ExitCode::from(code)
        }
    }
}
