// Command-line surface.
//
// With no subcommand the binary runs the TUI. Subcommands talk to the same
// service once and print plain text (or CSV) to stdout.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use moodlens_core::client::{self, AnalysisOutcome, Classifier};
use moodlens_core::emotion::icon_for;
use moodlens_core::protocol::{AnalysisRequest, BatchRequest, EmotionScore};
use moodlens_core::summary::{build_rows, Summary, EMPTY_PLACEHOLDER};
use tracing::info;

use crate::app::{failure_message, fetch_backend_status, EMPTY_INPUT_MESSAGE};
use crate::protocol::BackendStatus;
use crate::tui::widgets::results::bar_cells;

/// Bar width used for plain-text output.
const TEXT_BAR_WIDTH: usize = 20;

/// moodlens - detect emotions in text
#[derive(Debug, Parser)]
#[command(name = "moodlens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal client for an emotion classification service")]
pub struct Cli {
    /// Service base URL (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Detection threshold in [0, 1] (overrides config)
    #[arg(short, long, global = true)]
    pub threshold: Option<f64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a single text
    Predict {
        /// Text to analyze
        text: String,
    },
    /// Analyze every non-blank line of a file in one request
    Batch {
        /// File with one text per line
        file: PathBuf,
        /// Emit CSV (text,emotion,probability) instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Check whether the service is up and the model is loaded
    Health,
    /// List the labels the service can detect
    Emotions,
}

/// Execute one subcommand against `classifier`, writing to `out`.
pub async fn run_command<W: Write>(
    command: &Command,
    threshold: f64,
    classifier: &dyn Classifier,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::Predict { text } => predict(text, threshold, classifier, out).await,
        Command::Batch { file, csv } => batch(file, *csv, threshold, classifier, out).await,
        Command::Health => health(classifier, out).await,
        Command::Emotions => emotions(classifier, out).await,
    }
}

async fn predict<W: Write>(
    text: &str,
    threshold: f64,
    classifier: &dyn Classifier,
    out: &mut W,
) -> anyhow::Result<()> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        bail!(EMPTY_INPUT_MESSAGE);
    }

    let request = AnalysisRequest {
        text: trimmed.to_string(),
        threshold,
    };
    match client::analyze(classifier, &request).await {
        AnalysisOutcome::Success(response) => {
            info!("predict: {} emotions", response.emotions.len());
            write_scores(out, &response.emotions)?;
            Ok(())
        }
        AnalysisOutcome::Failure { detail } => {
            bail!(failure_message(&detail, classifier.base_url()))
        }
    }
}

async fn batch<W: Write>(
    file: &Path,
    csv: bool,
    threshold: f64,
    classifier: &dyn Classifier,
    out: &mut W,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let texts = batch_texts(&content);
    if texts.is_empty() {
        bail!("{} contains no text to analyze", file.display());
    }

    info!("batch: {} texts from {}", texts.len(), file.display());
    let request = BatchRequest { texts, threshold };
    let response = classifier
        .predict_batch(&request)
        .await
        .map_err(|e| anyhow::anyhow!(failure_message(&e.to_string(), classifier.base_url())))?;

    if csv {
        let mut writer = csv::Writer::from_writer(&mut *out);
        writer.write_record(["text", "emotion", "probability"])?;
        for item in &response.results {
            for score in &item.emotions {
                let probability = format!("{:.4}", score.probability);
                writer.write_record([
                    item.text.as_str(),
                    score.emotion.as_str(),
                    probability.as_str(),
                ])?;
            }
        }
        writer.flush()?;
        return Ok(());
    }

    for (i, item) in response.results.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "> {}", item.text)?;
        write_scores(out, &item.emotions)?;
    }
    Ok(())
}

async fn health<W: Write>(classifier: &dyn Classifier, out: &mut W) -> anyhow::Result<()> {
    match fetch_backend_status(classifier).await {
        BackendStatus::Online { model } => {
            writeln!(
                out,
                "online: {} (model: {})",
                classifier.base_url(),
                model.as_deref().unwrap_or("unknown")
            )?;
            Ok(())
        }
        BackendStatus::Offline { reason } => {
            bail!("offline: {} ({})", classifier.base_url(), reason)
        }
        BackendStatus::Unknown => bail!("health status unknown"),
    }
}

async fn emotions<W: Write>(classifier: &dyn Classifier, out: &mut W) -> anyhow::Result<()> {
    let catalog = classifier
        .emotions()
        .await
        .map_err(|e| anyhow::anyhow!(failure_message(&e.to_string(), classifier.base_url())))?;
    for label in &catalog.emotions {
        writeln!(out, "{} {}", icon_for(label), label)?;
    }
    writeln!(out, "{} emotions", catalog.count)?;
    Ok(())
}

/// Non-blank lines of a batch file, trimmed.
pub fn batch_texts(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rows then the summary line, or the placeholder when nothing was detected.
fn write_scores<W: Write>(out: &mut W, scores: &[EmotionScore]) -> std::io::Result<()> {
    let rows = build_rows(scores);
    if rows.is_empty() {
        writeln!(out, "{}", EMPTY_PLACEHOLDER)?;
    }
    for row in &rows {
        writeln!(
            out,
            "{} {:<15} {} {:>6}",
            row.icon,
            row.label,
            text_bar(row.bar_percent),
            row.value_text
        )?;
    }
    let summary = Summary::from_scores(scores);
    writeln!(
        out,
        "Detected: {}   Highest: {}   Average: {}",
        summary.count_text(),
        summary.max_text(),
        summary.avg_text()
    )
}

/// Plain-text bar, e.g. `"████████░░░░"`.
pub fn text_bar(percent: f64) -> String {
    let (filled, empty) = bar_cells(percent, TEXT_BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
