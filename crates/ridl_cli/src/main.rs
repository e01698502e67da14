//! ridl: The IDL front-end CLI.
//!
//! Usage:
//!   ridl [options] <file...>
//!
//! Parses each file and prints its syntax tree, its token stream, or nothing
//! at all with `--check`. Exit code 0 when every file parses, 1 when any file
//! fails, 2 on usage or configuration errors.

use clap::{ArgAction, Parser as ClapParser, ValueEnum};
use miette::{NamedSource, Report};
use rayon::prelude::*;
use ridl_ast::dump::dump_tree;
use ridl_ast::Ast;
use ridl_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use ridl_parser::{ParseError, Parser, ParserOptions};
use ridl_scanner::{CharSource, LexError, Scanner};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(ClapParser, Debug)]
#[command(name = "ridl", version, about = "ridl - A CORBA IDL parser written in Rust")]
struct Cli {
    /// IDL files to parse.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// How to print each parsed file. With several files, JSON documents are
    /// written one per line.
    #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    /// Print the token stream instead of parsing.
    #[arg(long, conflicts_with = "check")]
    tokens: bool,

    /// Parse only; print nothing on success.
    #[arg(long)]
    check: bool,

    /// Maximum declaration nesting depth.
    #[arg(long = "max-depth", value_name = "N")]
    max_depth: Option<usize>,

    /// Path to a JSON parser configuration (defaults to ./ridl.json if present).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Tree,
    Json,
}

/// What to do with each input file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Tokens,
    Check,
    Tree,
    Json { pretty: bool },
}

impl Mode {
    fn from_cli(cli: &Cli) -> Self {
        if cli.tokens {
            Mode::Tokens
        } else if cli.check {
            Mode::Check
        } else {
            match cli.format {
                OutputFormat::Tree => Mode::Tree,
                OutputFormat::Json => Mode::Json {
                    pretty: cli.files.len() == 1,
                },
            }
        }
    }
}

enum Outcome {
    Printed(String),
    Failed {
        diagnostic: Diagnostic,
        /// The file text, when it could be read.
        source: Option<String>,
    },
}

struct FileResult {
    name: String,
    outcome: Outcome,
}

const CONFIG_FILE_NAME: &str = "ridl.json";

/// Worker stack size; deeply nested input recurses once per level.
const PARSER_STACK_SIZE: usize = 64 * 1024 * 1024;

// ANSI color codes
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let exit_code = run(&cli);
    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env("RIDL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

fn run(cli: &Cli) -> i32 {
    let start = Instant::now();
    let use_color = atty_is_terminal();

    let options = match load_options(cli) {
        Ok(options) => options,
        Err(diagnostic) => {
            print_diagnostic(&diagnostic, use_color);
            return 2;
        }
    };
    debug!(max_depth = options.max_depth, "parser options");

    let pool = match rayon::ThreadPoolBuilder::new()
        .stack_size(PARSER_STACK_SIZE)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            print_error(&format!("Failed to start worker threads: {}", e));
            return 2;
        }
    };

    let mode = Mode::from_cli(cli);
    let results: Vec<FileResult> = pool.install(|| {
        cli.files
            .par_iter()
            .map(|path| process_file(path, mode, &options))
            .collect()
    });

    let show_headers = results.len() > 1 && mode == Mode::Tree;
    let mut failures = DiagnosticCollection::new();
    let mut sources: HashMap<String, String> = HashMap::new();
    for result in results {
        match result.outcome {
            Outcome::Printed(output) => {
                if output.is_empty() {
                    continue;
                }
                if show_headers {
                    println!("// {}", result.name);
                }
                print!("{}", output);
            }
            Outcome::Failed { diagnostic, source } => {
                if let Some(text) = source {
                    sources.insert(result.name.clone(), text);
                }
                failures.add(diagnostic.with_file(result.name));
            }
        }
    }

    failures.sort();
    for diagnostic in failures.diagnostics() {
        let source = diagnostic.file.as_ref().and_then(|file| sources.get(file));
        render_failure(diagnostic, source, use_color);
    }

    info!(
        files = cli.files.len(),
        failed = failures.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "done"
    );

    if !failures.is_empty() {
        let count = failures.len();
        if use_color {
            eprintln!(
                "\n{}Found {} error{}.{}",
                RED,
                count,
                if count == 1 { "" } else { "s" },
                RESET
            );
        } else {
            eprintln!("\nFound {} error{}.", count, if count == 1 { "" } else { "s" });
        }
        return 1;
    }

    0
}

/// Resolve parser options: the configuration file first, then flags.
fn load_options(cli: &Cli) -> Result<ParserOptions, Diagnostic> {
    let config = match &cli.config {
        Some(path) => Some(path.clone()),
        None => Some(PathBuf::from(CONFIG_FILE_NAME)).filter(|path| path.exists()),
    };

    let mut options = match config {
        Some(path) => read_options(&path)?,
        None => ParserOptions::default(),
    };
    if let Some(depth) = cli.max_depth {
        options = options.with_max_depth(depth);
    }
    Ok(options)
}

fn read_options(path: &Path) -> Result<ParserOptions, Diagnostic> {
    let shown = path.display().to_string();
    let fail = |reason: String| {
        Diagnostic::new(&messages::CANNOT_READ_CONFIGURATION_FILE_0_1, &[&shown, &reason])
    };
    let text = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
    debug!(config = %shown, "loaded configuration file");
    ParserOptions::from_json(&text).map_err(|e| fail(e.to_string()))
}

fn process_file(path: &Path, mode: Mode, options: &ParserOptions) -> FileResult {
    let name = path.display().to_string();
    debug!(file = %name, ?mode, "processing");

    let outcome = match std::fs::read(path) {
        Err(e) => Outcome::Failed {
            diagnostic: Diagnostic::new(&messages::CANNOT_READ_SOURCE_0, &[&e.to_string()]),
            source: None,
        },
        Ok(bytes) => match CharSource::from_bytes(&bytes) {
            Err(e) => Outcome::Failed {
                diagnostic: ParseError::Io(e).to_diagnostic(),
                source: None,
            },
            Ok(source) => run_mode(source, mode, options),
        },
    };

    if let Outcome::Failed { diagnostic, .. } = &outcome {
        debug!(file = %name, code = diagnostic.code, "failed");
    }
    FileResult { name, outcome }
}

fn run_mode(source: CharSource, mode: Mode, options: &ParserOptions) -> Outcome {
    let text = source.text().to_string();
    let rendered = match mode {
        Mode::Tokens => list_tokens(source).map_err(|e| e.to_diagnostic()),
        Mode::Check => parse_source(source, options).map(|_| String::new()),
        Mode::Tree => parse_source(source, options).map(|ast| dump_tree(&ast)),
        Mode::Json { pretty } => parse_source(source, options).and_then(|ast| to_json(&ast, pretty)),
    };
    match rendered {
        Ok(output) => Outcome::Printed(output),
        Err(diagnostic) => Outcome::Failed {
            diagnostic,
            source: Some(text),
        },
    }
}

fn parse_source(source: CharSource, options: &ParserOptions) -> Result<Ast, Diagnostic> {
    Parser::from_source(source, options.clone())
        .parse_unit()
        .map_err(|e| e.to_diagnostic())
}

fn to_json(ast: &Ast, pretty: bool) -> Result<String, Diagnostic> {
    let json = if pretty {
        serde_json::to_string_pretty(ast)
    } else {
        serde_json::to_string(ast)
    };
    json.map(|text| text + "\n")
        .map_err(|e| Diagnostic::new(&messages::CANNOT_SERIALIZE_TREE_0, &[&e.to_string()]))
}

/// One line per token: position, kind and source text.
fn list_tokens(source: CharSource) -> Result<String, LexError> {
    let mut scanner = Scanner::from_source(source);
    let mut listing = String::new();
    loop {
        let token = scanner.next_token()?;
        listing.push_str(&format!(
            "{}:{}\t{:?}\t{}\n",
            token.line, token.column, token.kind, token.text
        ));
        if token.is_eof() {
            return Ok(listing);
        }
    }
}

fn render_failure(diagnostic: &Diagnostic, source: Option<&String>, use_color: bool) {
    match (source, &diagnostic.file) {
        (Some(text), Some(file)) if diagnostic.span.is_some() => {
            let report = Report::new(diagnostic.clone())
                .with_source_code(NamedSource::new(file, text.clone()));
            eprintln!("{:?}", report);
        }
        _ => print_diagnostic(diagnostic, use_color),
    }
}

fn print_diagnostic(diag: &Diagnostic, use_color: bool) {
    if use_color {
        if let Some(ref file) = diag.file {
            eprint!("{}{}{}", CYAN, file, RESET);
            if let Some(pos) = diag.position {
                eprint!("{}:{}{}", GRAY, pos, RESET);
            }
            eprint!(": ");
        }
        eprintln!(
            "{}{}error{} {}IDL{}{}: {}",
            BOLD, RED, RESET, CYAN, diag.code, RESET, diag.message_text
        );
        if let Some(ref help) = diag.help {
            eprintln!("  {}help{}: {}", GRAY, RESET, help);
        }
    } else {
        eprintln!("{}", diag);
        if let Some(ref help) = diag.help {
            eprintln!("  help: {}", help);
        }
    }
}

fn print_error(msg: &str) {
    if atty_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn atty_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ridl-cli-{}-{}", process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("ridl").chain(args.iter().copied()))
    }

    // ========================================================================
    // Arguments
    // ========================================================================

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["ridl"]).is_err());
        assert!(Cli::try_parse_from(["ridl", "--tokens", "--check", "a.idl"]).is_err());
    }

    #[test]
    fn test_mode_from_flags() {
        assert_eq!(Mode::from_cli(&cli(&["a.idl"])), Mode::Tree);
        assert_eq!(Mode::from_cli(&cli(&["--tokens", "a.idl"])), Mode::Tokens);
        assert_eq!(Mode::from_cli(&cli(&["--check", "--format", "json", "a.idl"])), Mode::Check);
        assert_eq!(
            Mode::from_cli(&cli(&["--format", "json", "a.idl"])),
            Mode::Json { pretty: true }
        );
        assert_eq!(
            Mode::from_cli(&cli(&["--format", "json", "a.idl", "b.idl"])),
            Mode::Json { pretty: false }
        );
        assert_eq!(cli(&["-vv", "a.idl"]).verbose, 2);
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    #[test]
    fn test_config_file_then_flag_override() {
        let config = temp_file("depth.json", r#"{ "maxDepth": 8 }"#);
        let config_arg = config.display().to_string();

        let options = load_options(&cli(&["--config", &config_arg, "a.idl"])).unwrap();
        assert_eq!(options.max_depth, 8);

        let options = load_options(&cli(&["--config", &config_arg, "--max-depth", "3", "a.idl"])).unwrap();
        assert_eq!(options.max_depth, 3);

        std::fs::remove_file(config).ok();
    }

    #[test]
    fn test_bad_config_is_reported() {
        let config = temp_file("bad.json", r#"{ "depth": 8 }"#);
        let config_arg = config.display().to_string();
        let err = load_options(&cli(&["--config", &config_arg, "a.idl"])).unwrap_err();
        assert_eq!(err.code, 3001);
        assert!(err.message_text.contains(&config_arg));
        std::fs::remove_file(config).ok();
    }

    // ========================================================================
    // Per-file processing
    // ========================================================================

    #[test]
    fn test_tree_output() {
        let path = temp_file("ok.idl", "module M { const long X = 1; };\n");
        let result = process_file(&path, Mode::Tree, &ParserOptions::default());
        match result.outcome {
            Outcome::Printed(output) => {
                assert_eq!(output, "Specification\n  Module M\n    Const X: long = 1\n");
            }
            Outcome::Failed { diagnostic, .. } => panic!("unexpected failure: {}", diagnostic),
        }
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_json_output_parses_back() {
        let path = temp_file("json.idl", "interface I;");
        let result = process_file(&path, Mode::Json { pretty: false }, &ParserOptions::default());
        let Outcome::Printed(output) = result.outcome else {
            panic!("expected output");
        };
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value.is_object());
        assert_eq!(output.lines().count(), 1);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_syntax_error_keeps_source() {
        let path = temp_file("bad.idl", "module M { long x }");
        let result = process_file(&path, Mode::Check, &ParserOptions::default());
        match result.outcome {
            Outcome::Failed { diagnostic, source } => {
                assert_eq!(diagnostic.code, 2001);
                assert_eq!(source.as_deref(), Some("module M { long x }"));
            }
            Outcome::Printed(_) => panic!("expected a failure"),
        }
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("ridl-cli-does-not-exist.idl");
        let result = process_file(&path, Mode::Tree, &ParserOptions::default());
        match result.outcome {
            Outcome::Failed { diagnostic, source } => {
                assert_eq!(diagnostic.code, 1000);
                assert!(source.is_none());
            }
            Outcome::Printed(_) => panic!("expected a failure"),
        }
    }

    #[test]
    fn test_token_listing() {
        let listing = list_tokens(CharSource::new("module M")).unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1:1\tModuleKeyword\tmodule");
        assert_eq!(lines[1], "1:8\tIdentifier\tM");
        assert!(lines[2].starts_with("1:9\tEndOfFileToken"));
    }

    #[test]
    fn test_token_listing_stops_at_lexical_error() {
        let err = list_tokens(CharSource::new("module \"open")).unwrap_err();
        assert_eq!(err.to_diagnostic().code, 1002);
    }
}
