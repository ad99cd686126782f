//! Cardio risk engine command-line front end.
//!
//! Scores a patient, recommends an intervention, or simulates a what-if,
//! using the bundled logistic model unless another artifact is supplied.
//!
//! Usage:
//!   cargo run -p cardio-demo -- predict
//!   cargo run -p cardio-demo -- recommend --strategy compare
//!   cargo run -p cardio-demo -- simulate --action 2 --patient patient.json
//!   cargo run -p cardio-demo -- schema

mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use cardio_compare::InterventionRecommender;
use cardio_contracts::{
    error::{CardioError, CardioResult},
    patient::PatientFeatures,
};
use cardio_core::{predict_risk, simulate, traits::Recommender};
use cardio_guidelines::GuidelineRecommender;
use cardio_model::{ModelOracle, BUNDLED_MODEL};
use cardio_verify::PatientValidator;

/// Patient used when `--patient` is not given.
const EXAMPLE_PATIENT: &str = r#"{
    "age": 63, "sex": 1, "cp": 3, "trestbps": 145, "chol": 233, "fbs": 1,
    "restecg": 0, "thalach": 150, "exang": 0, "oldpeak": 2.3, "slope": 2,
    "ca": 0, "thal": 6
}"#;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Cardiovascular risk prediction and intervention planning.
#[derive(Parser)]
#[command(
    name = "cardio",
    about = "Cardiovascular risk prediction and intervention planning",
    long_about = "Scores a patient's cardiovascular risk, recommends an intervention tier,\n\
                  and simulates the expected effect of each intervention."
)]
struct Cli {
    /// Patient record as JSON. Defaults to a built-in example patient.
    #[arg(long, global = true)]
    patient: Option<PathBuf>,

    /// Model artifact JSON. Defaults to the bundled model.
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Expected SHA-256 (hex) of the model artifact.
    #[arg(long, global = true)]
    model_sha256: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score the patient's current risk.
    Predict,
    /// Recommend an intervention tier.
    Recommend {
        #[arg(long, value_enum, default_value_t = Strategy::Guideline)]
        strategy: Strategy,
        /// Guideline thresholds as TOML (guideline strategy only).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Saved recommender marker file to restore thresholds from.
        #[arg(long)]
        marker: Option<PathBuf>,
    },
    /// Simulate one intervention (0 = monitor only .. 4 = intensive treatment).
    Simulate {
        #[arg(long, allow_negative_numbers = true)]
        action: i64,
    },
    /// Compare all four active interventions side by side.
    Compare,
    /// Print the patient JSON Schema.
    Schema,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Risk bands plus risk-factor escalation.
    Guideline,
    /// Cost-benefit comparison table.
    Compare,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let request_id = Uuid::new_v4();
    info!(request_id = %request_id, "cardio request started");

    if let Err(e) = run(&cli) {
        eprintln!("cardio: {}", e);
        let code = if e.is_input_error() {
            2
        } else if e.is_service_unavailable() {
            3
        } else {
            1
        };
        std::process::exit(code);
    }
}

// ── Command dispatch ──────────────────────────────────────────────────────────

fn run(cli: &Cli) -> CardioResult<()> {
    let validator = PatientValidator::new();

    match &cli.command {
        Command::Predict => {
            let (patient, oracle) = load_inputs(cli, &validator)?;
            let result = predict_risk(&oracle, &patient)?;
            if cli.json {
                print_json(&result)
            } else {
                render::risk(&result);
                Ok(())
            }
        }
        Command::Recommend { strategy: Strategy::Guideline, config, marker } => {
            let (patient, oracle) = load_inputs(cli, &validator)?;
            let mut recommender = match config {
                Some(path) => GuidelineRecommender::from_file(path)?,
                None => GuidelineRecommender::default(),
            };
            if let Some(path) = marker {
                recommender.load(path)?;
            }
            let recommendation = recommender.recommend(&patient, &oracle)?;
            if cli.json {
                print_json(&recommendation)
            } else {
                render::recommendation(&recommendation);
                Ok(())
            }
        }
        Command::Recommend { strategy: Strategy::Compare, .. } | Command::Compare => {
            let (patient, oracle) = load_inputs(cli, &validator)?;
            let comparison = InterventionRecommender::new().recommend(&patient, &oracle)?;
            if cli.json {
                print_json(&comparison)
            } else {
                render::comparison(&comparison);
                Ok(())
            }
        }
        Command::Simulate { action } => {
            let action = validator.validate_action(*action)?;
            let (patient, oracle) = load_inputs(cli, &validator)?;
            let result = simulate(&oracle, &patient, action)?;
            if cli.json {
                print_json(&result)
            } else {
                render::simulation(&result);
                Ok(())
            }
        }
        Command::Schema => print_json(validator.schema()),
    }
}

// ── Inputs ────────────────────────────────────────────────────────────────────

fn load_inputs(cli: &Cli, validator: &PatientValidator) -> CardioResult<(PatientFeatures, ModelOracle)> {
    let patient = load_patient(validator, cli.patient.as_deref())?;
    let oracle = load_oracle(cli.model.as_deref(), cli.model_sha256.as_deref())?;
    Ok((patient, oracle))
}

fn load_patient(validator: &PatientValidator, path: Option<&Path>) -> CardioResult<PatientFeatures> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| CardioError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            validator.validate_str(&text)
        }
        None => validator.validate_str(EXAMPLE_PATIENT),
    }
}

fn load_oracle(path: Option<&Path>, sha256: Option<&str>) -> CardioResult<ModelOracle> {
    match path {
        Some(path) => ModelOracle::from_file(path, sha256),
        None => ModelOracle::from_json_str(BUNDLED_MODEL, sha256),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CardioResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CardioError::Io {
        path: "<stdout>".to_string(),
        reason: e.to_string(),
    })?;
    println!("{}", text);
    Ok(())
}
