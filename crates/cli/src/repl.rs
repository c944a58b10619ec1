//! Interactive REPL and pipe mode.

use std::io::BufRead;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::commands::build_repl_cmd;
use crate::format::{format_error, format_output, OutputMode};
use crate::parse::{check_meta_command, matches_to_command, MetaCommand};
use crate::state::SessionState;
use crate::value::{parse_address, parse_handle};

/// Outcome of one input line.
enum LineResult {
    Continue,
    Failed,
    Quit,
}

fn prompt(state: &SessionState) -> String {
    match state.handle() {
        Some(handle) => {
            let text = handle.to_string();
            format!("upbox:{}> ", &text[..8])
        }
        None => "upbox> ".to_string(),
    }
}

fn history_path() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME").map(|home| std::path::Path::new(&home).join(".upbox_history"))
}

fn print_help(command: Option<&str>) {
    let mut cmd = build_repl_cmd();
    let mut target = match command {
        Some(name) => match cmd.find_subcommand_mut(name) {
            Some(sub) => sub.clone(),
            None => {
                eprintln!("(error) Unknown command: {}", name);
                return;
            }
        },
        None => cmd,
    };
    println!("{}", target.render_help());
    if command.is_none() {
        println!("Meta-commands: use <handle>, as <caller>, help [command], clear, quit");
    }
}

fn handle_meta(meta: MetaCommand, state: &mut SessionState, mode: OutputMode) -> LineResult {
    match meta {
        MetaCommand::Quit => LineResult::Quit,
        MetaCommand::Clear => {
            print!("\x1B[2J\x1B[1;1H");
            LineResult::Continue
        }
        MetaCommand::Help { command } => {
            print_help(command.as_deref());
            LineResult::Continue
        }
        MetaCommand::Use { handle } => {
            match parse_handle(&handle)
                .map_err(|e| format!("(error) {}", e))
                .and_then(|h| state.use_handle(h).map_err(|e| format_error(&e, mode)))
            {
                Ok(()) => LineResult::Continue,
                Err(message) => {
                    eprintln!("{}", message);
                    LineResult::Failed
                }
            }
        }
        MetaCommand::As { caller } => match parse_address(&caller) {
            Ok(address) => {
                state.set_caller(address);
                println!("acting as {}", address);
                LineResult::Continue
            }
            Err(e) => {
                eprintln!("(error) {}", e);
                LineResult::Failed
            }
        },
    }
}

/// Process one line of input.
fn execute_line(line: &str, state: &mut SessionState, mode: OutputMode) -> LineResult {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return LineResult::Continue;
    }
    if let Some(meta) = check_meta_command(line) {
        return handle_meta(meta, state, mode);
    }

    let words = match shlex::split(line) {
        Some(words) => words,
        None => {
            eprintln!("(error) Unbalanced quotes");
            return LineResult::Failed;
        }
    };
    let matches = match build_repl_cmd().try_get_matches_from(words) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e.render().to_string().trim_end());
            return LineResult::Failed;
        }
    };

    match matches_to_command(&matches) {
        Ok(cmd) => match state.execute(cmd) {
            Ok(output) => {
                let formatted = format_output(&output, mode);
                if !formatted.is_empty() {
                    println!("{}", formatted);
                }
                LineResult::Continue
            }
            Err(e) => {
                eprintln!("{}", format_error(&e, mode));
                LineResult::Failed
            }
        },
        Err(e) => {
            eprintln!("(error) {}", e);
            LineResult::Failed
        }
    }
}

/// Run the interactive REPL until `quit` or end of input.
pub fn run_repl(state: &mut SessionState, mode: OutputMode) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("(error) Failed to start line editor: {}", e);
            return;
        }
    };
    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline(&prompt(state)) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                if let LineResult::Quit = execute_line(&line, state, mode) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("(error) {}", e);
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
}

/// Execute stdin line by line. Returns the process exit code.
pub fn run_pipe(state: &mut SessionState, mode: OutputMode) -> i32 {
    let stdin = std::io::stdin();
    let mut code = 0;
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("(error) {}", e);
                return 1;
            }
        };
        match execute_line(&line, state, mode) {
            LineResult::Continue => {}
            LineResult::Failed => code = 1,
            LineResult::Quit => break,
        }
    }
    code
}
