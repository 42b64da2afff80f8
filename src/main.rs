use clap::{Parser, Subcommand};
use monkeybars::{
    contract_file, scenarios, CheckerConfiguration, ContractChecker, Error, Expectation,
    FailurePolicy, HttpClient, ReqwestHttpClient,
};
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const EXIT_VIOLATED: u8 = 1;
const EXIT_ERROR: u8 = 2;

/// Checks a running naughty-or-nice service against its HTTP contract.
#[derive(Debug, Parser)]
#[command(name = "monkeybars", version)]
struct Cli {
    /// Emit logs as json lines.
    #[arg(long, global = true, env = "MONKEYBARS_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the contract scenarios in order and print a report.
    Check {
        #[arg(long, env = "MONKEYBARS_BASE_URL", default_value = "http://localhost:3000")]
        base_url: String,

        /// Markdown contract file to run instead of the built-in scenarios.
        #[arg(long)]
        contract: Option<PathBuf>,

        /// Stop at the first failed scenario.
        #[arg(long, env = "MONKEYBARS_FAIL_FAST")]
        fail_fast: bool,

        /// Extra request header sent with every scenario, as `NAME:VALUE`.
        #[arg(long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
    /// Write the built-in scenarios to a contract file.
    Export { path: PathBuf },
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().into(), value.trim().into()))
        }
        _ => Err(format!("expected NAME:VALUE, got \"{}\"", raw)),
    }
}

fn init_logging(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_scenarios(contract: Option<&PathBuf>) -> Result<Vec<Expectation>, Error> {
    match contract {
        Some(path) => Ok(contract_file::load_contract(path)?),
        None => Ok(scenarios::naughty_or_nice()),
    }
}

async fn check(
    base_url: String,
    contract: Option<PathBuf>,
    fail_fast: bool,
    headers: Vec<(String, String)>,
    http_client: Arc<dyn HttpClient + Send + Sync>,
) -> Result<u8, Error> {
    let scenarios = load_scenarios(contract.as_ref())?;

    let mut configuration = CheckerConfiguration::new();
    configuration.set_base_url(base_url);
    configuration.set_http_client(http_client);
    if fail_fast {
        configuration.set_failure_policy(FailurePolicy::FailFast);
    }
    for (name, value) in headers {
        configuration.add_default_header(name, value);
    }

    let report = ContractChecker::new(configuration)
        .run(&scenarios)
        .await?;
    println!("{}", report);

    Ok(if report.is_success() { 0 } else { EXIT_VIOLATED })
}

/// Runs `command` and maps the outcome to the process exit status: 0 when every
/// scenario passed, 1 when the contract was violated, 2 when the run couldn't happen.
async fn execute(command: Command, http_client: Arc<dyn HttpClient + Send + Sync>) -> u8 {
    let result = match command {
        Command::Check {
            base_url,
            contract,
            fail_fast,
            headers,
        } => check(base_url, contract, fail_fast, headers, http_client).await,
        Command::Export { path } => {
            contract_file::save_contract(&path, &scenarios::naughty_or_nice())
                .map(|_| 0)
                .map_err(Error::from)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "monkeybars failed");
            EXIT_ERROR
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    ExitCode::from(execute(cli.command, Arc::new(ReqwestHttpClient::default())).await)
}
