//! Clap command tree, shared by shell mode and the REPL.

use clap::{Arg, ArgAction, Command};

fn handle_arg() -> Arg {
    Arg::new("handle")
        .long("handle")
        .value_name("HANDLE")
        .global(true)
        .help("Target instance (defaults to the selected one)")
}

fn caller_arg() -> Arg {
    Arg::new("as")
        .long("as")
        .value_name("CALLER")
        .global(true)
        .help("Calling identity: 0x-address or label")
}

fn args_arg() -> Arg {
    Arg::new("args")
        .num_args(0..)
        .allow_negative_numbers(true)
        .value_name("ARG")
        .help("Arguments: integers, true/false, 0x-addresses")
}

fn subcommands() -> Vec<Command> {
    vec![
        Command::new("ping").about("Check that the host responds"),
        Command::new("deploy")
            .about("Deploy a catalog module as a new instance")
            .arg(Arg::new("module").required(true).help("Catalog name, e.g. box-v1"))
            .arg(
                Arg::new("owner")
                    .long("owner")
                    .value_name("OWNER")
                    .help("Initial owner (defaults to the caller)"),
            )
            .arg(
                Arg::new("init")
                    .long("init")
                    .value_name("OPERATION")
                    .help("Initializer to run during deployment"),
            )
            .arg(args_arg()),
        Command::new("call")
            .about("Dispatch an operation on the selected instance")
            .arg(Arg::new("operation").required(true))
            .arg(args_arg()),
        Command::new("upgrade")
            .about("Replace the implementation with a catalog module")
            .arg(Arg::new("module").required(true)),
        Command::new("transfer")
            .about("Transfer ownership")
            .arg(Arg::new("new_owner").required(true).value_name("NEW_OWNER")),
        Command::new("pause").about("Close the pause gate"),
        Command::new("unpause").about("Open the pause gate"),
        Command::new("owner").about("Show the current owner"),
        Command::new("status").about("Show an instance summary"),
        Command::new("events").about("List committed events").arg(
            Arg::new("since")
                .long("since")
                .value_name("SEQUENCE")
                .value_parser(clap::value_parser!(u64)),
        ),
        Command::new("verify").about("Verify the event hash chain"),
        Command::new("history").about("Show the upgrade history"),
        Command::new("ops").about("List operations of the active implementation"),
        Command::new("slot")
            .about("Read a slot directly")
            .arg(Arg::new("name").required(true)),
        Command::new("instances").about("List deployed instances"),
        Command::new("modules").about("List deployable modules"),
    ]
}

/// Top-level CLI for shell mode
pub fn build_cli() -> Command {
    Command::new("upbox")
        .about("Upgradeable Box host")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("state")
                .long("state")
                .value_name("FILE")
                .help("Snapshot file to load on start and save after each command"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Host configuration (TOML)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print results as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity"),
        )
        .arg(handle_arg())
        .arg(caller_arg())
        .subcommands(subcommands())
}

/// Command tree for one REPL line (no binary name)
pub fn build_repl_cmd() -> Command {
    Command::new("repl")
        .no_binary_name(true)
        .disable_version_flag(true)
        .arg(handle_arg())
        .arg(caller_arg())
        .subcommands(subcommands())
}
