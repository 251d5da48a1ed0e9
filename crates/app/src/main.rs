mod console;

use std::fmt;
use std::sync::Arc;

use quiz_core::time::DEFAULT_TIME_LIMIT_SECS;
use services::bank::{SIMULATED_QUESTION_LATENCY, SIMULATED_SCORING_LATENCY};
use services::{
    BundledQuestionBank, FallbackQuizApi, HttpQuizApi, QuestionSource, QuizApiConfig, QuizSession,
    Scorer, SessionConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTimeLimit { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTimeLimit { raw } => {
                write!(f, "invalid time limit (expected whole seconds >= 1): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_time_limit(raw: &str) -> Result<u32, ArgsError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| ArgsError::InvalidTimeLimit {
            raw: raw.to_string(),
        })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [--time-limit <secs>] [--api-url <url>] [--offline] [--no-fallback] [--simulate-latency]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --time-limit {DEFAULT_TIME_LIMIT_SECS}");
    eprintln!("  built-in questions unless an API url is configured");
    eprintln!();
    eprintln!("Environment (.env is read if present):");
    eprintln!("  QUIZ_TIME_LIMIT, QUIZ_API_URL, QUIZ_API_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    time_limit_secs: u32,
    api_url: Option<String>,
    offline: bool,
    fallback: bool,
    simulate_latency: bool,
}

enum Parsed {
    Run(Args),
    Help,
}

impl Args {
    fn parse(
        args: impl IntoIterator<Item = String>,
        env_time_limit: Option<String>,
    ) -> Result<Parsed, ArgsError> {
        let mut parsed = Self {
            time_limit_secs: env_time_limit
                .as_deref()
                .map(parse_time_limit)
                .transpose()?
                .unwrap_or(DEFAULT_TIME_LIMIT_SECS),
            api_url: None,
            offline: false,
            fallback: true,
            simulate_latency: false,
        };

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--time-limit" => {
                    let value = require_value(&mut args, "--time-limit")?;
                    parsed.time_limit_secs = parse_time_limit(&value)?;
                }
                "--api-url" => parsed.api_url = Some(require_value(&mut args, "--api-url")?),
                "--offline" => parsed.offline = true,
                "--no-fallback" => parsed.fallback = false,
                "--simulate-latency" => parsed.simulate_latency = true,
                "--help" | "-h" => return Ok(Parsed::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Parsed::Run(parsed))
    }
}

struct Collaborators {
    source: Arc<dyn QuestionSource>,
    scorer: Arc<dyn Scorer>,
}

impl Collaborators {
    fn shared<T: QuestionSource + Scorer + 'static>(api: T) -> Self {
        let api = Arc::new(api);
        Self {
            source: api.clone(),
            scorer: api,
        }
    }
}

fn build_collaborators(args: &Args) -> Result<Collaborators, Box<dyn std::error::Error>> {
    let mut bank = BundledQuestionBank::full_stack()?;
    if args.simulate_latency {
        bank = bank.with_latency(SIMULATED_QUESTION_LATENCY, SIMULATED_SCORING_LATENCY);
    }
    if args.offline {
        info!("using the built-in question bank");
        return Ok(Collaborators::shared(bank));
    }

    let env_config = QuizApiConfig::from_env()?;
    let api_config = match (&args.api_url, env_config) {
        (Some(url), env_config) => {
            let config = QuizApiConfig::new(url)?;
            match env_config {
                Some(env_config) => config.with_timeout(env_config.timeout),
                None => config,
            }
        }
        (None, Some(env_config)) => env_config,
        (None, None) => {
            info!("no quiz API configured, using the built-in question bank");
            return Ok(Collaborators::shared(bank));
        }
    };

    info!(url = %api_config.base_url, fallback = args.fallback, "using the remote quiz API");
    let api = HttpQuizApi::new(api_config)?;
    if args.fallback {
        Ok(Collaborators::shared(FallbackQuizApi::new(api, bank)))
    } else {
        Ok(Collaborators::shared(api))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = match Args::parse(
        std::env::args().skip(1),
        std::env::var("QUIZ_TIME_LIMIT").ok(),
    ) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };

    let collaborators = build_collaborators(&args)?;
    let config = SessionConfig::new(args.time_limit_secs)?;
    let session = QuizSession::spawn(config, collaborators.source, collaborators.scorer);

    console::run_console(session).await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
