//! ArgMatches → Command conversion, plus REPL meta-commands.

use clap::ArgMatches;
use upbox_core::{Address, ObjectHandle, Value};
use upbox_engine::InitCall;
use upbox_executor::Command;

use crate::value::{parse_address, parse_handle, parse_value};

/// REPL meta-commands.
pub enum MetaCommand {
    /// Select an instance for subsequent commands
    Use { handle: String },
    /// Act as a different caller
    As { caller: String },
    /// Print help
    Help { command: Option<String> },
    /// Leave the REPL
    Quit,
    /// Clear the screen
    Clear,
}

/// Check for REPL meta-commands before delegating to clap.
///
/// Returns `Some(MetaCommand)` if the line is a meta-command, `None` otherwise.
pub fn check_meta_command(line: &str) -> Option<MetaCommand> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next()?;

    match cmd {
        "quit" | "exit" => Some(MetaCommand::Quit),
        "clear" => Some(MetaCommand::Clear),
        "help" => Some(MetaCommand::Help {
            command: parts.next().map(|s| s.to_string()),
        }),
        "use" => Some(MetaCommand::Use {
            handle: parts.next()?.to_string(),
        }),
        "as" => Some(MetaCommand::As {
            caller: parts.next()?.to_string(),
        }),
        _ => None,
    }
}

fn flag_handle(matches: &ArgMatches) -> Result<Option<ObjectHandle>, String> {
    matches
        .get_one::<String>("handle")
        .map(|raw| parse_handle(raw))
        .transpose()
}

fn flag_caller(matches: &ArgMatches) -> Result<Option<Address>, String> {
    matches
        .get_one::<String>("as")
        .map(|raw| parse_address(raw))
        .transpose()
}

fn values(matches: &ArgMatches) -> Result<Vec<Value>, String> {
    matches
        .get_many::<String>("args")
        .map(|raw| raw.map(|s| parse_value(s)).collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String, String> {
    matches
        .get_one::<String>(name)
        .ok_or_else(|| format!("missing <{}>", name))
}

/// Convert clap ArgMatches into a Command.
pub fn matches_to_command(matches: &ArgMatches) -> Result<Command, String> {
    let (sub_name, m) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;
    let handle = flag_handle(m)?;
    let caller = flag_caller(m)?;

    let cmd = match sub_name {
        "ping" => Command::Ping,
        "deploy" => {
            let init = m
                .get_one::<String>("init")
                .map(|op| values(m).map(|args| InitCall::new(op.clone(), args)))
                .transpose()?;
            let owner = match m.get_one::<String>("owner") {
                Some(raw) => Some(parse_address(raw)?),
                None => caller,
            };
            Command::Deploy {
                owner,
                module: required(m, "module")?.clone(),
                init,
            }
        }
        "call" => Command::Call {
            handle,
            caller,
            operation: required(m, "operation")?.clone(),
            args: values(m)?,
        },
        "upgrade" => Command::Upgrade {
            handle,
            caller,
            module: required(m, "module")?.clone(),
        },
        "transfer" => Command::TransferOwnership {
            handle,
            caller,
            new_owner: parse_address(required(m, "new_owner")?)?,
        },
        "pause" => Command::Pause { handle, caller },
        "unpause" => Command::Unpause { handle, caller },
        "owner" => Command::Owner { handle },
        "status" => Command::Status { handle },
        "events" => Command::Events {
            handle,
            since: m.get_one::<u64>("since").copied(),
        },
        "verify" => Command::VerifyEvents { handle },
        "history" => Command::History { handle },
        "ops" => Command::Operations { handle },
        "slot" => Command::Slot {
            handle,
            name: required(m, "name")?.clone(),
        },
        "instances" => Command::Instances,
        "modules" => Command::Modules,
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(cmd)
}
