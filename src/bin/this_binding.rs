//! CLI for the this-binding interpreter.
//!
//! Usage:
//!   this-binding <file.js>          # Execute a script file
//!   this-binding -e "code"          # Evaluate code and print the last value
//!   this-binding --demo             # Run the bundled demonstration
//!   this-binding                    # Start REPL (interactive mode)

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use this_binding::demo::DEMO_SCRIPT;
use this_binding::parser::JsParser;
use this_binding::runner::api::{JsRunError, JsRunner};
use this_binding::runner::config::{EngineConfig, DEFAULT_MAX_CALL_DEPTH};
use this_binding::runner::ds::value::JsValue;

#[derive(Debug, Parser)]
#[command(name = "this-binding", version, about = "Run scripts and watch how `this` is resolved")]
struct Cli {
    /// Script file to execute
    file: Option<PathBuf>,

    /// Evaluate code and print the last value
    #[arg(short = 'e', long = "eval", value_name = "CODE", conflicts_with = "file")]
    eval: Option<String>,

    /// Run the bundled demonstration
    #[arg(long, conflicts_with_all = ["file", "eval"])]
    demo: bool,

    /// Plain calls bind `undefined` instead of the global object
    #[arg(long)]
    strict: bool,

    /// Log every receiver resolution to stderr
    #[arg(long)]
    trace_bindings: bool,

    /// Print the pest token tree instead of running
    #[arg(long)]
    tokens: bool,

    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.trace_bindings);

    let config = EngineConfig::new()
        .with_strict_mode(cli.strict)
        .with_echo_console(true)
        .with_max_call_depth(cli.max_call_depth);

    if cli.demo {
        run_source(DEMO_SCRIPT, config, cli.tokens, false);
    } else if let Some(code) = &cli.eval {
        run_source(code, config, cli.tokens, true);
    } else if let Some(path) = &cli.file {
        let source = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                process::exit(1);
            }
        };
        run_source(&source, config, cli.tokens, false);
    } else {
        run_repl(config);
    }
}

fn init_tracing(trace_bindings: bool) {
    let level = if trace_bindings {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_source(source: &str, config: EngineConfig, tokens: bool, print_value: bool) {
    if tokens {
        match JsParser::parse_to_token_tree(source) {
            Ok(tree) => println!("{}", tree),
            Err(e) => {
                eprintln!("Parse error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let mut runner = JsRunner::new(config);
    match runner.run_script(source) {
        Ok(value) => {
            if print_value && !matches!(value, JsValue::Undefined) {
                println!("{}", value);
            }
        }
        Err(e) => {
            report_error(&e);
            process::exit(1);
        }
    }
}

fn report_error(e: &JsRunError) {
    match e {
        JsRunError::Parse(_) => eprintln!("Parse error: {}", e),
        JsRunError::Runtime(_) => eprintln!("{}", e),
    }
}

fn run_repl(config: EngineConfig) {
    println!("this-binding v{}", env!("CARGO_PKG_VERSION"));
    println!("Type code and press Enter. Type .exit to quit.");
    println!();

    let mut runner = JsRunner::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }

        let input = input.trim();
        if input == ".exit" || input == ".quit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        match runner.run_script(input) {
            Ok(value) => {
                if !matches!(value, JsValue::Undefined) {
                    println!("{}", value);
                }
            }
            Err(e) => report_error(&e),
        }
    }

    println!("Goodbye!");
}
