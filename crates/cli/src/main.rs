//! upbox CLI: drive a host of upgradeable Boxes from the shell.
//!
//! Three modes:
//! - **Shell mode**: `upbox [flags] COMMAND` runs a single command and exits
//! - **REPL mode**: `upbox [flags]` opens an interactive prompt (if stdin is a TTY)
//! - **Pipe mode**: `echo "call get" | upbox` runs stdin line by line
//!
//! With `--state FILE` the host is restored from FILE on start and saved
//! back after every successful command, so shell invocations share state.

mod commands;
mod format;
mod parse;
mod repl;
mod state;
mod value;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;
use upbox_core::Address;
use upbox_engine::HostConfig;

use commands::build_cli;
use format::{format_error, format_output, OutputMode};
use parse::matches_to_command;
use state::{SessionState, DEFAULT_CALLER};
use value::{parse_address, parse_handle};

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(matches: &clap::ArgMatches) -> Result<HostConfig, String> {
    match matches.get_one::<String>("config") {
        Some(path) => HostConfig::from_file(path).map_err(|e| e.to_string()),
        None => Ok(HostConfig::default()),
    }
}

fn open_state(matches: &clap::ArgMatches) -> Result<SessionState, String> {
    let config = load_config(matches)?;
    let state_path = matches.get_one::<String>("state").map(PathBuf::from);
    let caller = match matches.get_one::<String>("as") {
        Some(raw) => parse_address(raw)?,
        None => Address::from_label(DEFAULT_CALLER),
    };

    let mut state = SessionState::open(config, state_path, caller)
        .map_err(|e| format!("Failed to open state: {}", e))?;
    if let Some(raw) = matches.get_one::<String>("handle") {
        let handle = parse_handle(raw)?;
        state.use_handle(handle).map_err(|e| e.to_string())?;
    }
    Ok(state)
}

fn run_shell_mode(matches: &clap::ArgMatches, state: &mut SessionState, mode: OutputMode) -> i32 {
    match matches_to_command(matches) {
        Ok(cmd) => match state.execute(cmd) {
            Ok(output) => {
                let formatted = format_output(&output, mode);
                if !formatted.is_empty() {
                    println!("{}", formatted);
                }
                0
            }
            Err(e) => {
                eprintln!("{}", format_error(&e, mode));
                1
            }
        },
        Err(e) => {
            eprintln!("(error) {}", e);
            1
        }
    }
}

fn main() {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let mut state = match open_state(&matches) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if matches.subcommand().is_some() {
        let exit_code = run_shell_mode(&matches, &mut state, output_mode);
        process::exit(exit_code);
    } else if std::io::stdin().is_terminal() {
        repl::run_repl(&mut state, output_mode);
    } else {
        let exit_code = repl::run_pipe(&mut state, output_mode);
        process::exit(exit_code);
    }
}
