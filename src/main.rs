use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Text,
}

mod commands;
mod output;

use commands::{config, rewrite, scan};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "import-rewriter")]
#[command(version = VERSION)]
#[command(about = "Migrate import statements after a module rename or repository split")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite imports of OLD to NEW under PATH, then list leftover references
    Rewrite(rewrite::RewriteArgs),
    /// Show where a module is imported and mentioned, without changing anything
    Scan(scan::ScanArgs),
    /// Manage default match mode, excluded directories and source extension
    Config(config::ConfigArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Rewrite(args) if !args.json => ResponseMode::Text,
        Commands::Scan(args) if !args.json => ResponseMode::Text,
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    match response_mode(&cli.command) {
        ResponseMode::Text => match commands::run_text(cli.command, &global) {
            Ok((content, exit_code)) => {
                if let Err(err) = output::print_text(&content) {
                    output::print_error_text(&err);
                    return std::process::ExitCode::from(exit_code_to_u8(1));
                }
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
            Err(err) => {
                output::print_error_text(&err);
                std::process::ExitCode::from(exit_code_to_u8(output::exit_code_for_error(
                    err.code,
                )))
            }
        },
        ResponseMode::Json => {
            let (json_result, exit_code) = commands::run_json(cli.command, &global);
            if output::print_json_result(json_result).is_err() {
                return std::process::ExitCode::from(exit_code_to_u8(1));
            }
            std::process::ExitCode::from(exit_code_to_u8(exit_code))
        }
    }
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
