//! CLI handler for the `check` command.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use yamlite::{Exception, ParseOptions, Reason};

/// Report dropped lines in YAML-lite files.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Input files to check (reads from stdin if none provided)
    #[arg(trailing_var_arg = true)]
    pub files: Vec<PathBuf>,

    /// Quiet mode: exit code only, no output
    #[arg(short, long)]
    pub quiet: bool,

    /// Force color output even when not a TTY
    #[arg(short = 'C', long = "color")]
    pub color: bool,

    /// Disable color output
    #[arg(short = 'M', long = "no-color")]
    pub no_color: bool,
}

/// Exit codes for the check command.
pub mod exit_codes {
    /// No exceptions.
    pub const SUCCESS: i32 = 0;
    /// At least one line was dropped.
    pub const INVALID: i32 = 1;
    /// I/O error (file not found, permission denied, etc.).
    pub const IO_ERROR: i32 = 2;
}

/// Optional ANSI styling for diagnostics on stderr.
#[derive(Debug, Clone, Copy)]
struct Palette {
    enabled: bool,
}

impl Palette {
    const BOLD_RED: &'static str = "\x1b[1;31m";
    const BOLD_BLUE: &'static str = "\x1b[1;34m";
    const YELLOW: &'static str = "\x1b[0;33m";

    fn paint(&self, style: &str, text: &str) -> String {
        if self.enabled {
            format!("{}{}\x1b[0m", style, text)
        } else {
            text.to_string()
        }
    }
}

/// Run the check command.
///
/// Every input is checked. The exit code is the worst outcome seen, with
/// I/O errors ranking above dropped lines.
pub fn run(args: CheckArgs, options: ParseOptions) -> Result<i32> {
    let palette = Palette {
        enabled: !args.no_color && (args.color || atty::is(atty::Stream::Stderr)),
    };

    if args.files.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read from stdin")?;
        return Ok(report(&input, "<stdin>", &args, palette, options));
    }

    let mut code = exit_codes::SUCCESS;
    for path in &args.files {
        let outcome = match fs::read_to_string(path) {
            Ok(input) => report(&input, &path.to_string_lossy(), &args, palette, options),
            Err(e) => {
                if !args.quiet {
                    eprintln!(
                        "{}: {}: {}",
                        palette.paint(Palette::BOLD_RED, "error"),
                        path.display(),
                        e
                    );
                }
                exit_codes::IO_ERROR
            }
        };
        code = code.max(outcome);
    }
    Ok(code)
}

/// Parse one input and print its exceptions.
fn report(
    input: &str,
    name: &str,
    args: &CheckArgs,
    palette: Palette,
    options: ParseOptions,
) -> i32 {
    let doc = yamlite::parse_with(input, &options);
    if !doc.has_errors() {
        return exit_codes::SUCCESS;
    }

    if !args.quiet {
        for exception in &doc.exceptions {
            eprintln!("{}", render(exception, name, palette));
        }
    }
    exit_codes::INVALID
}

/// One diagnostic line: `file:line: code: text (hint)`.
fn render(exception: &Exception, name: &str, palette: Palette) -> String {
    format!(
        "{}: {}: {} {}",
        palette.paint(Palette::BOLD_BLUE, &format!("{}:{}", name, exception.line)),
        palette.paint(Palette::BOLD_RED, exception.reason.code()),
        exception.text,
        palette.paint(Palette::YELLOW, &format!("({})", hint(exception.reason))),
    )
}

/// A short explanation for each reason.
fn hint(reason: Reason) -> &'static str {
    match reason {
        Reason::MissingKey => "expected `key: value` or `- value`",
        Reason::DuplicateKey => "key already defined at this indentation",
        Reason::InvalidIndentation => "indentation does not match any open block",
        Reason::KindMismatch => "cannot mix `- item` and `key:` lines in one block",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: Palette = Palette { enabled: false };

    fn quiet_args() -> CheckArgs {
        CheckArgs {
            files: vec![],
            quiet: true,
            color: false,
            no_color: true,
        }
    }

    #[test]
    fn test_report_exit_codes() {
        let args = quiet_args();
        let opts = ParseOptions::default();
        assert_eq!(report("a: 1\nb: 2", "t", &args, PLAIN, opts), exit_codes::SUCCESS);
        assert_eq!(report("a: 1\n  b: 2", "t", &args, PLAIN, opts), exit_codes::INVALID);
    }

    #[test]
    fn test_render_plain() {
        let doc = yamlite::parse("a: 1\na: 2");
        let exception = &doc.exceptions.entries()[0];
        assert_eq!(
            render(exception, "site.yml", PLAIN),
            "site.yml:2: duplicate-key: a: 2 (key already defined at this indentation)"
        );
    }

    #[test]
    fn test_render_colored() {
        let doc = yamlite::parse("words");
        let line = render(&doc.exceptions.entries()[0], "x", Palette { enabled: true });
        assert!(line.starts_with("\x1b[1;34mx:1\x1b[0m: \x1b[1;31mmissing-key\x1b[0m: words"));
    }

    #[test]
    fn test_run_reports_worst_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yml");
        let bad = dir.path().join("bad.yml");
        fs::write(&good, "a: 1\n").unwrap();
        fs::write(&bad, "- a\nb: 1\n").unwrap();

        let mut args = quiet_args();
        args.files = vec![good.clone(), bad];
        assert_eq!(run(args, ParseOptions::default()).unwrap(), exit_codes::INVALID);

        let mut args = quiet_args();
        args.files = vec![good, dir.path().join("missing.yml")];
        assert_eq!(run(args, ParseOptions::default()).unwrap(), exit_codes::IO_ERROR);
    }
}
