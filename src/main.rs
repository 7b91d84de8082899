use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::process::ExitCode;

// Use modules from the library
use dashstat::commands;
use dashstat::core::config::Config;
use dashstat::ui;

fn config_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file, or '-' to read stdin"),
        )
        .arg(
            Arg::new("set")
                .short('s')
                .long("set")
                .value_name("KEY=VALUE")
                .help("Set one configuration key (repeatable)")
                .action(ArgAction::Append),
        )
}

fn provider_arg() -> Arg {
    Arg::new("provider")
        .help("Provider type, e.g. radarr or adguard-home (see 'dashstat providers')")
        .required(true)
        .index(1)
}

fn db_arg() -> Arg {
    Arg::new("db")
        .long("db")
        .value_name("PATH")
        .help("Dashboard database (default: $DASHSTAT_DB_PATH, $DB_PATH or ./dashboard.db)")
}

fn widget_id_arg() -> Arg {
    Arg::new("id")
        .help("Widget id")
        .required(true)
        .index(1)
        .value_parser(clap::value_parser!(i64))
}

fn build_cli() -> Command {
    Command::new("dashstat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fetch normalized stats from self-hosted services for dashboard widgets")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("pretty")
                .short('p')
                .long("pretty")
                .help("Indent JSON output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log every sub-request to stderr")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("providers").about("List supported provider types"))
        .subcommand(config_args(
            Command::new("fetch")
                .about("Read stats from a provider using an ad-hoc configuration")
                .arg(provider_arg()),
        ))
        .subcommand(config_args(
            Command::new("test")
                .about("Test a provider configuration without saving it")
                .arg(provider_arg()),
        ))
        .subcommand(
            Command::new("widget")
                .about("Read stats for a stored widget")
                .arg(widget_id_arg())
                .arg(
                    Arg::new("expect")
                        .short('e')
                        .long("expect")
                        .value_name("PROVIDER")
                        .help("Fail unless the widget has this provider type"),
                )
                .arg(db_arg()),
        )
        .subcommand(
            Command::new("widget-config")
                .about("Show a stored widget's configuration with credentials removed")
                .arg(widget_id_arg())
                .arg(db_arg()),
        )
        .subcommand(
            Command::new("system")
                .about("Host metrics from the configured metrics agent, or the local machine")
                .arg(db_arg()),
        )
        .subcommand(config_args(
            Command::new("redact").about("Remove credential-like keys from a JSON configuration"),
        ))
}

fn run(matches: &ArgMatches) -> Result<bool> {
    let config = Config::load().unwrap_or_else(|e| {
        ui::warn(&format!("{:#}, using defaults", e));
        Config::default()
    });
    let pretty = matches.get_flag("pretty") || config.pretty;

    match matches.subcommand() {
        Some(("providers", _)) => commands::providers::execute(pretty)?,
        Some(("fetch", sub_matches)) => commands::fetch::execute(sub_matches, pretty)?,
        Some(("test", sub_matches)) => {
            return commands::connection_test::execute(sub_matches, pretty);
        }
        Some(("widget", sub_matches)) => commands::widget::execute(sub_matches, &config, pretty)?,
        Some(("widget-config", sub_matches)) => {
            commands::widget::execute_config(sub_matches, &config, pretty)?
        }
        Some(("system", sub_matches)) => {
            commands::widget::execute_system(sub_matches, &config, pretty)?
        }
        Some(("redact", sub_matches)) => commands::redact::execute(sub_matches, pretty)?,
        _ => {
            ui::info("Use 'dashstat --help' for more information.");
        }
    }

    Ok(true)
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    dashstat::init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            ui::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
