//! `smart-actions` command-line tool
//!
//! Inspects a permission-lookup response saved as JSON and answers checks
//! against it with the same normalization the library applies.

use anyhow::{anyhow, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use smart_actions::{JsonFileGrantSource, PermissionRegistry, RegistryConfig, StandardAction};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let grants = Arg::new("grants")
        .long("grants")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON array of {FormNameWithExt, Action} rows");

    Command::new("smart-actions")
        .version(smart_actions::VERSION)
        .about("Form/action permission gate")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML registry configuration"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v debug, -vv trace)"),
        )
        .subcommand(
            Command::new("check")
                .about("Check one form/action pair; exits 1 when denied")
                .arg(grants.clone())
                .arg(Arg::new("form").long("form").required(true).help("Form name"))
                .arg(
                    Arg::new("action")
                        .long("action")
                        .required(true)
                        .help("Action token"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List normalized forms and their actions")
                .arg(grants.clone())
                .arg(Arg::new("form").long("form").help("Only this form"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("standard")
                .about("Show the standard toolbar actions for a form")
                .arg(grants)
                .arg(Arg::new("form").long("form").required(true).help("Form name")),
        )
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a String> {
    args.get_one::<String>(name)
        .ok_or_else(|| anyhow!("missing --{name}"))
}

async fn load_registry(
    config: &RegistryConfig,
    args: &ArgMatches,
) -> anyhow::Result<PermissionRegistry> {
    let path = args
        .get_one::<PathBuf>("grants")
        .ok_or_else(|| anyhow!("missing --grants"))?;

    let registry = PermissionRegistry::with_config(config);
    registry
        .refresh(&JsonFileGrantSource::new(path))
        .await
        .with_context(|| format!("loading grants from {}", path.display()))?;
    Ok(registry)
}

/// Run a parsed command line, returning the process exit code
async fn run(matches: &ArgMatches, out: &mut impl Write) -> anyhow::Result<i32> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => RegistryConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => RegistryConfig::default(),
    };

    match matches.subcommand() {
        Some(("check", args)) => {
            let registry = load_registry(&config, args).await?;
            let form = required(args, "form")?;
            let action = required(args, "action")?;

            let allowed = registry.can(form, action);
            writeln!(out, "{}", if allowed { "allowed" } else { "denied" })?;
            Ok(i32::from(!allowed))
        }
        Some(("list", args)) => {
            let registry = load_registry(&config, args).await?;
            let forms = match args.get_one::<String>("form") {
                Some(form) => vec![smart_actions::FormKey::new(form)],
                None => registry.forms(),
            };

            let listing: BTreeMap<String, Vec<String>> = forms
                .into_iter()
                .map(|form| {
                    let actions = registry
                        .allowed_actions(form.as_str())
                        .into_iter()
                        .map(smart_actions::ActionKey::into_string)
                        .collect();
                    (form.into_string(), actions)
                })
                .collect();

            if args.get_flag("json") {
                writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
            } else {
                for (form, actions) in &listing {
                    writeln!(out, "{form}: {}", actions.join(", "))?;
                }
            }
            Ok(0)
        }
        Some(("standard", args)) => {
            let registry = load_registry(&config, args).await?;
            let view = registry.form(required(args, "form")?);

            writeln!(out, "Form: {}", view.form())?;
            for action in StandardAction::ALL {
                let mark = if view.can_standard(action) { "yes" } else { "no" };
                writeln!(out, "  {:<16} {mark}", action.token())?;
            }
            Ok(0)
        }
        _ => Err(anyhow!("no subcommand given")),
    }
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let mut stdout = std::io::stdout().lock();
    let code = match run(&matches, &mut stdout).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            2
        }
    };
    drop(stdout);

    std::process::exit(code);
}
