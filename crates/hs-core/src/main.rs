//! hallscope - Juggler setting estimator
//!
//! The command-line entry point, handling:
//! - Catalog listing and validation
//! - Setting estimation from observed counters
//! - Net-medal forecasts over a future horizon
//! - The combined judge report

use clap::{Args, Parser, Subcommand};
use hs_common::{OutputFormat, Setting};
use hs_config::builtin::builtin_catalog;
use hs_config::validate::validate_catalog;
use hs_config::{Prior, SignalWeights};
use hs_core::config::{load_catalog, ConfigOptions, MachineSpec, ResolvedCatalog, SpecCatalog};
use hs_core::exit_codes::ExitCode;
use hs_core::forecast::{forecast_diff_medal, resolve_games_future, ForecastParams};
use hs_core::inference::{checked_estimate, EstimateOptions, Observation, SettingPosterior};
use hs_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use hs_core::output::{
    render, CheckReport, CheckResult, ErrorReport, EstimateReport, EstimateSection,
    ForecastReport, ForecastSection, JudgeReport, MachineEntry, MachinesReport, Report,
    ReportHeader, TopEntry,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// Default histogram bin width in medals.
const DEFAULT_HIST_BIN: i64 = 100;

/// hallscope - estimate a slot machine's setting from play counters
#[derive(Parser)]
#[command(name = "hallscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Catalog file (specs.json or specs.toml)
    #[arg(long, global = true)]
    specs: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human or jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the machines in the active catalog
    Machines,

    /// Estimate the setting from observed counters
    Estimate(EstimateArgs),

    /// Forecast net medals over a future horizon
    Forecast(JudgeArgs),

    /// Estimate and forecast in one report
    Judge(JudgeArgs),

    /// Load and validate the catalog
    Check,

    /// Print the JSON Schema of the catalog file
    Schema,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Machines => "machines",
            Commands::Estimate(_) => "estimate",
            Commands::Forecast(_) => "forecast",
            Commands::Judge(_) => "judge",
            Commands::Check => "check",
            Commands::Schema => "schema",
        }
    }
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct ObservationArgs {
    /// Machine name as listed by `hallscope machines`
    #[arg(long, short = 'm')]
    machine: String,

    /// Total games played
    #[arg(long, short = 'g')]
    games: u64,

    /// BIG count
    #[arg(long, default_value_t = 0)]
    big: u64,

    /// REG count
    #[arg(long, default_value_t = 0)]
    reg: u64,

    /// Grape count
    #[arg(long)]
    grape: Option<u64>,

    /// Suikas seen (with --suika-cz-hits)
    #[arg(long, requires = "suika_cz_hits")]
    suika_trials: Option<u64>,

    /// CZ wins from those suikas
    #[arg(long, requires = "suika_trials")]
    suika_cz_hits: Option<u64>,

    /// Extra minor-role count, as id=N (repeatable)
    #[arg(long = "extra", value_name = "ID=N", value_parser = parse_extra)]
    extras: Vec<(String, u64)>,

    /// Prior weights, e.g. 1=2,5=1,6=1 (unlisted settings get 0)
    #[arg(long)]
    prior: Option<Prior>,

    /// Restrict candidates, e.g. 1,5,6
    #[arg(long, value_delimiter = ',')]
    allow: Vec<Setting>,

    /// Signal weights, e.g. total=1,big=0.35,grape=0.85
    #[arg(long)]
    weights: Option<SignalWeights>,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    #[command(flatten)]
    observation: ObservationArgs,
}

#[derive(Args, Debug)]
struct ForecastOpts {
    /// Future horizon offered by the catalog (500, 1000 or 2000 built in)
    #[arg(long, conflicts_with = "games_future", value_parser = parse_horizon)]
    horizon: Option<u64>,

    /// Future games, any positive count
    #[arg(long)]
    games_future: Option<u64>,

    /// Number of simulations
    #[arg(long)]
    sims: Option<u32>,

    /// RNG seed for a reproducible forecast
    #[arg(long)]
    seed: Option<u64>,

    /// Average medals paid per BIG
    #[arg(long)]
    big_payout: Option<i64>,

    /// Average medals paid per REG
    #[arg(long)]
    reg_payout: Option<i64>,

    /// Medals wagered per game
    #[arg(long)]
    bet: Option<i64>,

    /// Histogram bin width in medals
    #[arg(long, default_value_t = DEFAULT_HIST_BIN)]
    hist_bin: i64,
}

#[derive(Args, Debug)]
struct JudgeArgs {
    #[command(flatten)]
    observation: ObservationArgs,

    #[command(flatten)]
    forecast: ForecastOpts,
}

fn parse_extra(s: &str) -> Result<(String, u64), String> {
    let (id, count) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=N, got '{s}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing extra id in '{s}'"));
    }
    let count = count
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid count for '{id}': {e}"))?;
    Ok((id.to_string(), count))
}

/// Spins, with an optional trailing `G` ("1000G").
fn parse_horizon(s: &str) -> Result<u64, String> {
    s.trim()
        .trim_end_matches(['G', 'g'])
        .parse()
        .map_err(|_| format!("invalid horizon: {s}"))
}

impl ObservationArgs {
    /// Counters as entered. Zero counts mean "not counted".
    fn observation(&self) -> Observation {
        let obs = self
            .extras
            .iter()
            .filter(|(_, n)| *n > 0)
            .fold(
                Observation::from_counters(self.games, self.big, self.reg, self.grape),
                |obs, (id, n)| obs.with_extra(id.clone(), *n),
            );
        match (self.suika_trials, self.suika_cz_hits) {
            (Some(trials), Some(hits)) if trials > 0 => obs.with_suika_cz(trials, hits),
            _ => obs,
        }
    }

    fn options(&self) -> EstimateOptions {
        let mut options = EstimateOptions::default();
        if let Some(prior) = &self.prior {
            options = options.with_prior(prior.clone());
        }
        if let Some(weights) = self.weights {
            options = options.with_weights(weights);
        }
        if !self.allow.is_empty() {
            options = options.with_allowed(self.allow.iter().copied());
        }
        options
    }
}

impl ForecastOpts {
    fn params(
        &self,
        catalog: &SpecCatalog,
        machine: &MachineSpec,
    ) -> Result<ForecastParams, hs_common::Error> {
        let games_future =
            resolve_games_future(&catalog.forecast, self.horizon, self.games_future)?;
        let payout = catalog.payout_for(machine);

        let mut params = ForecastParams::from_defaults(&catalog.forecast, games_future);
        params.avg_big_payout = self.big_payout.unwrap_or(payout.avg_big);
        params.avg_reg_payout = self.reg_payout.unwrap_or(payout.avg_reg);
        if let Some(bet) = self.bet {
            params.bet_per_game = bet;
        }
        if let Some(n) = self.sims {
            params = params.with_sims(n);
        }
        Ok(params)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also arrive here, on stdout.
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let run_id = generate_run_id();
    let command = cli.command.name();
    tracing::info!(run_id = %run_id, command, format = %cli.global.format, "hallscope starting");

    let result = match &cli.command {
        Commands::Machines => run_machines(&cli.global, &run_id),
        Commands::Estimate(args) => run_estimate(&cli.global, &run_id, args),
        Commands::Forecast(args) => run_forecast(&cli.global, &run_id, args),
        Commands::Judge(args) => run_judge(&cli.global, &run_id, args),
        Commands::Check => run_check(&cli.global, &run_id),
        Commands::Schema => run_schema(),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => output_error(&cli.global, &run_id, command, &err),
    };
    tracing::info!(run_id = %run_id, exit_code = %exit_code, "hallscope finished");
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

type CommandResult = Result<ExitCode, hs_common::Error>;

fn load(global: &GlobalOpts) -> Result<ResolvedCatalog, hs_common::Error> {
    let options = ConfigOptions {
        specs_path: global.specs.clone(),
    };
    Ok(load_catalog(&options)?)
}

fn emit<R: Report>(global: &GlobalOpts, report: &R) -> Result<(), hs_common::Error> {
    println!("{}", render(report, global.format)?);
    Ok(())
}

fn estimate(
    machine: &MachineSpec,
    args: &ObservationArgs,
) -> Result<(Observation, Vec<SettingPosterior>), hs_common::Error> {
    let obs = args.observation();
    let posterior = checked_estimate(&machine.settings, &obs, &args.options())?;
    Ok((obs, posterior))
}

fn simulate(
    resolved: &ResolvedCatalog,
    machine: &MachineSpec,
    posterior: &[SettingPosterior],
    opts: &ForecastOpts,
) -> Result<ForecastSection, hs_common::Error> {
    let params = opts.params(&resolved.catalog, machine)?;
    let summary = forecast_diff_medal(posterior, &machine.settings, &params, &mut opts.rng())?;
    Ok(ForecastSection::new(
        params,
        opts.seed,
        &summary,
        resolved.catalog.forecast.histogram_clip,
        opts.hist_bin,
    ))
}

fn run_machines(global: &GlobalOpts, run_id: &str) -> CommandResult {
    let resolved = load(global)?;
    let machines = resolved
        .catalog
        .machines
        .iter()
        .map(|spec| MachineEntry {
            spec: spec.clone(),
            effective_payout: resolved.catalog.payout_for(spec),
        })
        .collect();
    let report = MachinesReport {
        header: ReportHeader::new(run_id),
        catalog: resolved.snapshot(),
        machines,
    };
    emit(global, &report)?;
    Ok(ExitCode::Clean)
}

fn run_estimate(global: &GlobalOpts, run_id: &str, args: &EstimateArgs) -> CommandResult {
    let resolved = load(global)?;
    let machine = resolved.catalog.require_machine(&args.observation.machine)?;
    let (obs, posterior) = estimate(machine, &args.observation)?;

    let report = EstimateReport {
        header: ReportHeader::new(run_id),
        machine: machine.name.clone(),
        catalog: resolved.snapshot(),
        estimate: EstimateSection::new(obs, posterior),
    };
    emit(global, &report)?;
    Ok(ExitCode::Clean)
}

fn run_forecast(global: &GlobalOpts, run_id: &str, args: &JudgeArgs) -> CommandResult {
    let resolved = load(global)?;
    let machine = resolved.catalog.require_machine(&args.observation.machine)?;
    let (obs, posterior) = estimate(machine, &args.observation)?;
    let forecast = simulate(&resolved, machine, &posterior, &args.forecast)?;

    let report = ForecastReport {
        header: ReportHeader::new(run_id),
        machine: machine.name.clone(),
        catalog: resolved.snapshot(),
        observation: obs,
        setting_mix: posterior.iter().map(TopEntry::from).collect(),
        forecast,
    };
    emit(global, &report)?;
    Ok(ExitCode::Clean)
}

fn run_judge(global: &GlobalOpts, run_id: &str, args: &JudgeArgs) -> CommandResult {
    let resolved = load(global)?;
    let machine = resolved.catalog.require_machine(&args.observation.machine)?;
    let (obs, posterior) = estimate(machine, &args.observation)?;
    let forecast = simulate(&resolved, machine, &posterior, &args.forecast)?;

    let report = JudgeReport::new(
        ReportHeader::new(run_id),
        machine.name.clone(),
        resolved.snapshot(),
        EstimateSection::new(obs, posterior),
        forecast,
    );
    emit(global, &report)?;
    Ok(ExitCode::Clean)
}

fn run_check(global: &GlobalOpts, run_id: &str) -> CommandResult {
    let mut checks = Vec::new();
    let mut snapshot = None;

    match load(global) {
        Ok(resolved) => {
            let catalog = &resolved.catalog;
            checks.push(CheckResult::ok(
                "catalog",
                format!(
                    "{} machine(s), schema {}",
                    catalog.machines.len(),
                    catalog.schema_version
                ),
            ));
            checks.push(CheckResult::info(
                "source",
                match &resolved.path {
                    Some(path) => format!("{} ({})", path.display(), resolved.source),
                    None => resolved.source.to_string(),
                },
            ));
            checks.push(CheckResult::info(
                "forecast_defaults",
                format!(
                    "{} sims, bet {}, BIG {} / REG {}, horizons {:?}",
                    catalog.forecast.n_sims,
                    catalog.forecast.bet_per_game,
                    catalog.forecast.payout.avg_big,
                    catalog.forecast.payout.avg_reg,
                    catalog.forecast.horizons
                ),
            ));
            snapshot = Some(resolved.snapshot());
        }
        Err(err) => {
            tracing::warn!(error = %err, "catalog check failed");
            checks.push(CheckResult::error("catalog", err.to_string()));
        }
    }

    checks.push(match validate_catalog(&builtin_catalog()) {
        Ok(()) => CheckResult::ok("builtin", "built-in catalog is valid"),
        Err(err) => CheckResult::error("builtin", err.to_string()),
    });

    let report = CheckReport::new(ReportHeader::new(run_id), checks, snapshot);
    emit(global, &report)?;
    Ok(if report.all_ok() {
        ExitCode::Clean
    } else {
        ExitCode::ConfigError
    })
}

fn run_schema() -> CommandResult {
    let schema = schemars::schema_for!(SpecCatalog);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(ExitCode::Clean)
}

/// Report an error on stderr in the requested format.
fn output_error(
    global: &GlobalOpts,
    run_id: &str,
    command: &str,
    error: &hs_common::Error,
) -> ExitCode {
    tracing::debug!(code = error.code(), error = %error, command, "command failed");
    let report = ErrorReport::new(ReportHeader::new(run_id), error).with_command(command);
    match render(&report, global.format) {
        Ok(text) => eprintln!("{text}"),
        Err(_) => eprintln!("{}", report.summary()),
    }
    report.exit_code()
}
