//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_simulation_config;
use crate::domain::error::LevholdError;
use crate::domain::metrics::Summary;
use crate::domain::report::SimulationReport;
use crate::domain::simulation::{self, SimulationConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_OUTPUT: &str = "levhold_report.csv";

#[derive(Parser, Debug)]
#[command(name = "levhold", about = "Leveraged buy-and-hold position simulator")]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation and write the per-period report
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a simulation configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Where and what to load for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRequest {
    pub directory: PathBuf,
    pub code: String,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

pub fn init_logging(level: &str) {
    let level = level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            output,
            code,
            dry_run,
        } => {
            if dry_run {
                run_validate(&config, code.as_deref())
            } else {
                run_simulate(&config, output.as_deref(), code.as_deref())
            }
        }
        Command::Validate { config } => run_validate(&config, None),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        tracing::error!("{err}");
        ExitCode::from(&err)
    })
}

pub fn build_simulation_config(adapter: &dyn ConfigPort) -> Result<SimulationConfig, LevholdError> {
    let initial_investment = adapter.get_double("simulation", "initial_investment", f64::NAN);
    let leverage = adapter.get_double("simulation", "leverage", f64::NAN);
    SimulationConfig::new(initial_investment, leverage)
}

pub fn build_data_request(
    adapter: &dyn ConfigPort,
    code_override: Option<&str>,
) -> Result<DataRequest, LevholdError> {
    let directory = adapter
        .get_string("data", "directory")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| LevholdError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        })?;

    let code = match code_override {
        Some(c) => c.to_string(),
        None => adapter
            .get_string("data", "code")
            .ok_or_else(|| LevholdError::ConfigMissing {
                section: "data".into(),
                key: "code".into(),
            })?,
    };
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return Err(LevholdError::ConfigMissing {
            section: "data".into(),
            key: "code".into(),
        });
    }

    Ok(DataRequest {
        directory: PathBuf::from(directory.trim()),
        code,
        start_date: adapter.get_date("data", "start_date")?,
        end_date: adapter.get_date("data", "end_date")?,
    })
}

pub fn resolve_output(output_override: Option<&Path>, adapter: &dyn ConfigPort) -> PathBuf {
    if let Some(p) = output_override {
        return p.to_path_buf();
    }
    adapter
        .get_string("report", "output")
        .filter(|s| !s.trim().is_empty())
        .map(|s| PathBuf::from(s.trim()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

fn run_simulate(config_path: &Path, output: Option<&Path>, code: Option<&str>) -> ExitCode {
    tracing::info!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(exit) => return exit,
    };

    let (sim_config, request) = match prepare(&adapter, code) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("{e}");
            return (&e).into();
        }
    };

    let output = resolve_output(output, &adapter);
    let data_port = CsvPriceAdapter::new(request.directory.clone());
    let report_port = CsvReportAdapter::new();

    match run_simulation_pipeline(&data_port, &report_port, &sim_config, &request, &output) {
        Ok(summary) => {
            print_summary(&request.code, &summary);
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

fn prepare(
    adapter: &dyn ConfigPort,
    code: Option<&str>,
) -> Result<(SimulationConfig, DataRequest), LevholdError> {
    validate_simulation_config(adapter, code)?;
    let sim_config = build_simulation_config(adapter)?;
    let request = build_data_request(adapter, code)?;
    Ok((sim_config, request))
}

/// Load, simulate, report. Returns the run summary once the report is written.
pub fn run_simulation_pipeline(
    data_port: &dyn PriceDataPort,
    report_port: &dyn ReportPort,
    sim_config: &SimulationConfig,
    request: &DataRequest,
    output: &Path,
) -> Result<Summary, LevholdError> {
    let series = data_port.fetch_prices(&request.code, request.start_date, request.end_date)?;
    tracing::info!(
        code = %request.code,
        periods = series.len(),
        initial_investment = sim_config.initial_investment(),
        leverage = sim_config.leverage(),
        "Running simulation"
    );

    let state = simulation::run(sim_config, &series)?;
    if let Some(index) = state.wipeout() {
        let date = series.get(index).map(|b| b.date.to_string()).unwrap_or_default();
        tracing::warn!(period = index, %date, "position wiped out, remaining periods held flat");
    }

    let report = SimulationReport::build(&series, &state)?;
    let summary = Summary::compute(&report, &state);

    report_port.write(&report, &output.to_string_lossy())?;
    Ok(summary)
}

fn print_summary(code: &str, summary: &Summary) {
    eprintln!("\n=== {} Summary ===", code);
    eprintln!("Periods:            {}", summary.periods);
    eprintln!("Simulated:          {}", summary.simulated_periods);
    match summary.wipeout_index {
        Some(i) => eprintln!("Wipeout:            period {}", i),
        None => eprintln!("Wipeout:            none"),
    }
    eprintln!("Target Exposure:    {:.2}", summary.target_exposure);
    eprintln!("Rebalances:         {}", summary.rebalance_count);
    eprintln!("Cumulative PnL:     {:.2}", summary.final_cumulative_pnl);
    eprintln!("Capital Bucket:     {:.2}", summary.final_capital_balance);
    eprintln!("Turnover ($):       {:.2}", summary.total_turnover_dollars);
    eprintln!("Turnover (units):   {:.4}", summary.total_turnover_units);
}

fn run_validate(config_path: &Path, code: Option<&str>) -> ExitCode {
    tracing::info!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(exit) => return exit,
    };

    let (sim_config, request) = match prepare(&adapter, code) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("{e}");
            return (&e).into();
        }
    };

    eprintln!("\nSimulation:");
    eprintln!("  initial_investment: {}", sim_config.initial_investment());
    eprintln!("  leverage:           {}", sim_config.leverage());
    eprintln!("  target exposure:    {}", sim_config.target_exposure());
    eprintln!("  wipeout floor:      {}", sim_config.wipeout_floor());
    eprintln!("\nData:");
    eprintln!("  file: {}", request.directory.join(format!("{}.csv", request.code)).display());
    if let Some(d) = request.start_date {
        eprintln!("  start_date: {}", d);
    }
    if let Some(d) = request.end_date {
        eprintln!("  end_date:   {}", d);
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
