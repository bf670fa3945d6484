//! Empaque CLI — Rust-native build-recipe orchestration.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "empaque",
    version,
    about = "Rust-native build-recipe orchestration — fetch, patch, build, and package native libraries"
)]
struct Cli {
    #[command(subcommand)]
    command: empaque::cli::Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = empaque::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
