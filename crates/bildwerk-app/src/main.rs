// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — image quality analysis and rule-based restoration.
//
// Entry point. Initialises logging, loads configuration, and dispatches the
// `restore`, `analyze`, and `health` subcommands.

mod services;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bildwerk_core::BildwerkConfig;
use bildwerk_core::error::BildwerkError;
use bildwerk_core::human_errors::humanize_error;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use services::data_dir;
use services::restore_service::{RestoreOutcome, RestoreService};

#[derive(Parser)]
#[command(name = "bildwerk")]
#[command(version, about = "Image quality analysis and restoration", long_about = None)]
struct Cli {
    /// Config file (JSON). Defaults to the data directory's config.json.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the OCR detection and recognition models
    #[arg(long, global = true, value_name = "DIR")]
    ocr_models: Option<PathBuf>,

    /// OpenCV Haar cascade used for face detection
    #[arg(long, global = true, value_name = "FILE")]
    face_cascade: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse and restore one or more images
    Restore {
        /// Input image files
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Print the quality report for an image without restoring it
    Analyze {
        /// Input image file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Report which capability providers are available
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match data_dir::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => return report_failure("config", &err),
    };
    if let Some(dir) = cli.ocr_models {
        config.ocr_model_dir = Some(dir);
    }
    if let Some(cascade) = cli.face_cascade {
        config.face_cascade_path = Some(cascade);
    }

    match cli.command {
        Commands::Restore { inputs, out } => {
            if let Some(out) = out {
                config.output_dir = out;
            }
            restore_all(config, inputs).await
        }
        Commands::Analyze { input } => analyze(config, input),
        Commands::Health => health(config),
    }
}

/// Restore every input as an independent request on the blocking pool.
async fn restore_all(config: BildwerkConfig, inputs: Vec<PathBuf>) -> ExitCode {
    info!(count = inputs.len(), out = %config.output_dir.display(), "Bildwerk restoring");
    let service = RestoreService::new(config);

    let handles: Vec<_> = inputs
        .into_iter()
        .map(|input| {
            let service = service.clone();
            let path = input.clone();
            (input, tokio::task::spawn_blocking(move || service.restore_file(&path)))
        })
        .collect();

    let mut failures = 0usize;
    for (input, handle) in handles {
        match handle.await {
            Ok(Ok(outcome)) => match render_outcome(&input, &outcome) {
                Ok(summary) => println!("{summary}"),
                Err(err) => {
                    report_failure(&input.display().to_string(), &err);
                    failures += 1;
                }
            },
            Ok(Err(err)) => {
                report_failure(&input.display().to_string(), &err);
                failures += 1;
            }
            Err(join_err) => {
                error!(input = %input.display(), error = %join_err, "Restore task panicked");
                failures += 1;
            }
        }
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Per-input summary: the input path, then the report, operation log, and
/// saved location.
fn render_outcome(input: &Path, outcome: &RestoreOutcome) -> Result<String, BildwerkError> {
    let report = serde_json::to_string(outcome.report())?;
    Ok(format!(
        "{}\n  report:  {report}\n  applied: {}\n  saved:   {}",
        input.display(),
        outcome.applied(),
        outcome.saved_path().display()
    ))
}

fn analyze(config: BildwerkConfig, input: PathBuf) -> ExitCode {
    let service = RestoreService::new(config);
    let result = service
        .analyze_file(&input)
        .and_then(|report| Ok(serde_json::to_string_pretty(&report)?));
    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => report_failure(&input.display().to_string(), &err),
    }
}

fn health(config: BildwerkConfig) -> ExitCode {
    let service = RestoreService::new(config);
    for status in service.registry().health() {
        match status.provider {
            Some(provider) => println!("{:<16} {provider}", status.slot),
            None => println!("{:<16} unavailable", status.slot),
        }
    }
    ExitCode::SUCCESS
}

/// Log the technical error and print the plain-English version.
fn report_failure(context: &str, err: &BildwerkError) -> ExitCode {
    error!(context, error = %err, "Request failed");
    let human = humanize_error(err);
    eprintln!("{context}: {human}");
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn restore_accepts_many_inputs_and_global_flags() {
        let cli = Cli::try_parse_from([
            "bildwerk",
            "restore",
            "a.jpg",
            "b.png",
            "--out",
            "restored",
            "--ocr-models",
            "/models",
            "--face-cascade",
            "/cascades/frontalface.xml",
        ])
        .expect("parse");

        assert_eq!(cli.ocr_models, Some(PathBuf::from("/models")));
        assert_eq!(cli.face_cascade, Some(PathBuf::from("/cascades/frontalface.xml")));
        match cli.command {
            Commands::Restore { inputs, out } => {
                assert_eq!(inputs, vec![PathBuf::from("a.jpg"), PathBuf::from("b.png")]);
                assert_eq!(out, Some(PathBuf::from("restored")));
            }
            _ => panic!("expected restore"),
        }
    }

    #[test]
    fn outcome_summary_lists_report_log_and_path() {
        use bildwerk_core::config::AnalysisConfig;
        use bildwerk_core::types::{
            Measurements, OperationLog, QualityReport, RequestId, RestorationRecord,
        };

        let measurements = Measurements {
            width: 40,
            height: 30,
            sharpness_score: 0.0,
            noise_estimate: 0.0,
            has_text: false,
            text_confidence: 0.0,
            face_count: 0,
        };
        let mut applied = OperationLog::new();
        applied.push("upscale_x4");
        applied.push("face_restore_skipped");
        let outcome = RestoreOutcome {
            record: RestorationRecord {
                id: RequestId::new(),
                processed_at: chrono::Utc::now(),
                source: "scan.jpg".to_string(),
                output_path: PathBuf::from("out/abc_scan.png"),
                report: QualityReport::assess(measurements, &AnalysisConfig::default()),
                applied,
            },
            record_path: PathBuf::from("out/abc_scan.json"),
        };

        let summary = render_outcome(Path::new("in/scan.jpg"), &outcome).expect("render");
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "in/scan.jpg");
        assert!(lines[1].starts_with("  report:  {"));
        assert!(lines[1].contains("\"need_upscale\":true"));
        assert_eq!(lines[2], "  applied: upscale_x4,face_restore_skipped");
        assert_eq!(lines[3], "  saved:   out/abc_scan.png");
    }

    #[test]
    fn restore_requires_an_input() {
        assert!(Cli::try_parse_from(["bildwerk", "restore"]).is_err());
    }
}
