//! yamlite CLI tool for parsing YAML-lite configuration files.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;
use yamlite::{Loader, ParseOptions};

mod check;

#[derive(Debug, Parser)]
#[command(name = "yamlite")]
#[command(about = "YAML-lite configuration parser", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    coercion: CoercionArgs,

    #[command(subcommand)]
    command: Command,
}

/// Scalar coercion switches shared by all subcommands.
#[derive(Debug, Args)]
struct CoercionArgs {
    /// Keep numeric text as strings
    #[arg(long, global = true)]
    no_numbers: bool,

    /// Keep `true`/`false` as strings
    #[arg(long, global = true)]
    no_booleans: bool,

    /// Keep `null` as a string
    #[arg(long, global = true)]
    no_nulls: bool,
}

impl From<&CoercionArgs> for ParseOptions {
    fn from(args: &CoercionArgs) -> Self {
        ParseOptions::default()
            .with_numbers(!args.no_numbers)
            .with_booleans(!args.no_booleans)
            .with_nulls(!args.no_nulls)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a document and print it as JSON
    Parse(ParseArgs),
    /// Report dropped lines without printing the document
    Check(check::CheckArgs),
}

/// Parse a document and print it as JSON
#[derive(Debug, Args)]
struct ParseArgs {
    /// Input file (reads from stdin if omitted)
    input: Option<PathBuf>,

    /// Fail instead of printing a partial document
    #[arg(long)]
    strict: bool,

    /// Pretty print JSON
    #[arg(long)]
    pretty: bool,

    /// Print only the leading front matter block of the input
    #[arg(long)]
    front_matter: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read from stdin")?;
            Ok(text)
        }
    }
}

fn run_parse(args: ParseArgs, options: ParseOptions) -> Result<()> {
    let text = read_input(args.input.as_ref())?;
    let loader = match args.strict {
        true => Loader::strict(),
        false => Loader::lenient(),
    };
    let loader = loader.with_options(options);

    let value = if args.front_matter {
        loader.load_front_matter(&text)?.0
    } else {
        loader.load_str(&text)?
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{}", json);

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let options = ParseOptions::from(&cli.coercion);

    match cli.command {
        Command::Parse(args) => run_parse(args, options),
        Command::Check(args) => {
            let code = check::run(args, options)?;
            std::process::exit(code);
        }
    }
}
