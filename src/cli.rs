use std::collections::BTreeMap;

use clap::{Parser, Subcommand};

use crate::{
    parser::{token::Keyword, ParseOutput},
    pipeline,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse configuration files and print their syntax trees
    Parse {
        #[arg(required = true)]
        files: Vec<String>,
        /// Only print how many lines were parsed per stanza
        #[arg(long)]
        summary: bool,
    },
    /// Check that every line of the configuration files parses
    Check {
        #[arg(required = true)]
        files: Vec<String>,
    },
}

/// Run the command line interface
///
/// This CLI provides the following subcommands:
///  - `parse`: print the syntax tree or a summary of each file
///  - `check`: print diagnostics and fail if any line was skipped
pub fn cli() {
    match cli_inner() {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn cli_inner() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Parse { files, summary } => {
            let parsed = pipeline::run(files).map_err(|r| r.to_string())?;
            for (file, output) in parsed.files.iter().zip(&parsed.outputs) {
                if summary {
                    print_summary(&file.name, output);
                } else {
                    println!("{:#?}", output.configuration);
                }
            }
            if let Some(report) = parsed.report() {
                eprint!("{report}");
            }
        }
        Command::Check { files } => {
            let parsed = pipeline::run(files).map_err(|r| r.to_string())?;
            if let Some(report) = parsed.report() {
                return Err(format!(
                    "{report}{} line(s) could not be parsed",
                    report.skipped_lines()
                ));
            }
            println!("All ok!")
        }
    }
    Ok(())
}

fn print_summary(name: &str, output: &ParseOutput) {
    let mut modeled = BTreeMap::<Keyword, usize>::new();
    let mut unmodeled = BTreeMap::<Keyword, usize>::new();
    for line in &output.configuration.lines {
        let counts = if line.is_catch_all() {
            &mut unmodeled
        } else {
            &mut modeled
        };
        *counts.entry(line.stanza()).or_default() += 1;
    }

    println!("{name}:");
    for (stanza, n) in modeled {
        println!("  {:<20} {n}", stanza.as_str());
    }
    for (stanza, n) in unmodeled {
        println!("  {:<20} {n} (not modeled)", stanza.as_str());
    }
    println!("  {:<20} {}", "skipped", output.diagnostics.len());
}
