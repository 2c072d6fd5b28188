use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use simcrunner::args::{
    flatten_loose, Arg, ArgumentOwner, Arguments, FileExport, Profile, ProfileSet,
};
use simcrunner::config::Config;
use simcrunner::logging::init_tracing;
use simcrunner::runner::{HistoryRecord, Runner};

/// Compose simc arguments and run SimulationCraft.
#[derive(Debug, Parser)]
#[command(name = "simcrunner", version, about)]
struct Cli {
    /// Directory containing the simc executable (overrides config and SIMC_PATH)
    #[arg(long, value_name = "DIR")]
    simc_path: Option<PathBuf>,

    /// Config file (default: <config dir>/simcrunner/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where to save arguments if simc cannot be launched
    #[arg(long, value_name = "FILE")]
    recovery_file: Option<PathBuf>,

    /// Kill simc after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Profile file to simulate
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Do not append .simc to the profile path
    #[arg(long, requires = "profile")]
    no_suffix: bool,

    /// Export results as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Export results as HTML
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Profile set entry; repeat a name to append to the same set
    #[arg(long = "profileset", value_name = "NAME=TOKEN", value_parser = parse_profileset)]
    profilesets: Vec<(String, String)>,

    /// Write the run history as JSON
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Extra simc arguments, passed through in order
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn parse_profileset(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, token)) if !name.is_empty() => Ok((name.to_string(), token.to_string())),
        _ => Err(format!("expected NAME=TOKEN, got '{s}'")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let explicit = cli.simc_path.clone().or_else(|| config.simc.path.clone());
    let recovery_file = cli
        .recovery_file
        .clone()
        .unwrap_or_else(|| config.simc.recovery_file.clone());
    let mut runner = Runner::from_env(explicit)?.with_recovery_file(recovery_file);
    if let Some(limit) = cli.timeout.map(Duration::from_secs).or(config.simc.timeout()) {
        runner = runner.with_timeout(limit);
    }
    runner.set(build_arguments(&cli, &config)?);

    let code = report(runner.run());

    if let Some(path) = &cli.history {
        std::fs::write(path, runner.history_json()?)
            .with_context(|| format!("Failed to write history to '{}'", path.display()))?;
    }

    Ok(code)
}

/// Config arguments, trailing arguments, profile, profile sets, exports.
fn build_arguments(cli: &Cli, config: &Config) -> Result<Arguments> {
    let mut args = flatten_loose(&config.run.args);
    args.extend(cli.args.iter().map(|a| Arg::from(a.as_str())));

    if let Some(path) = &cli.profile {
        args.push(Profile::new(path, !cli.no_suffix));
    }

    let mut sets: Vec<ProfileSet> = Vec::new();
    for (name, token) in &cli.profilesets {
        let entry = Arguments::new().add(token.as_str());
        match sets.iter_mut().find(|s| s.name() == name) {
            Some(set) => {
                set.add(entry);
            }
            None => sets.push(ProfileSet::with_args(name.as_str(), entry)?),
        }
    }
    args.extend(sets.into_iter().map(Arg::from));

    if let Some(path) = &cli.json {
        args.push(FileExport::json(path)?);
    }
    if let Some(path) = &cli.html {
        args.push(FileExport::html(path)?);
    }

    Ok(args)
}

/// Forward captured simc output and map the outcome to an exit code.
fn report(record: &HistoryRecord) -> ExitCode {
    if let Some(out) = &record.output {
        print!("{out}");
    }
    if let Some(err) = &record.error {
        if err.ends_with('\n') {
            eprint!("{err}");
        } else {
            eprintln!("{err}");
        }
    }
    match record.return_code {
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::from(1),
    }
}
