use anyhow::Result;
use clap::{value_parser, Arg, Command};
use colored::*;

use vigil::commands;

fn build_cli() -> Command {
    Command::new("vigil")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Security and telemetry monitor for a small reverse-proxy deployment")
        .subcommand(
            Command::new("monitor")
                .about("Run the security dashboard")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("MS")
                        .help("Refresh interval in milliseconds")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("window")
                        .short('w')
                        .long("window")
                        .value_name("LINES")
                        .help("How many trailing log lines to scan per cycle")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Stream snapshots as JSON lines instead of the TUI")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .value_name("PATH")
                        .help("Write a JSON report of every completed cycle"),
                ),
        )
        .subcommand(
            Command::new("net")
                .about("Run the network dashboard (connections and traffic)")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("MS")
                        .help("Refresh interval in milliseconds")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("window")
                        .short('w')
                        .long("window")
                        .value_name("LINES")
                        .help("How many trailing log lines to scan per cycle")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .index(1),
                ),
        )
}

fn main() -> Result<()> {
    vigil::init_logging();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("monitor", sub_matches)) => commands::monitor::execute(sub_matches)?,
        Some(("net", sub_matches)) => commands::net::execute(sub_matches)?,
        Some(("completions", sub_matches)) => {
            commands::completions::execute(sub_matches, &mut build_cli())?;
        }
        _ => {
            println!(
                "{}",
                "No command given. Use 'vigil monitor' to start the dashboard.".yellow()
            );
            println!("Run 'vigil --help' for the full command list.");
        }
    }

    Ok(())
}
