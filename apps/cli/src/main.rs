use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fckty_core::{
    AnalysisOutcome, AnalysisRequest, Analyzer, GeminiClient, NoembedClient, Phase,
    ProviderConfig, Workspace, format_report_readable, get_cache_dir, get_report_path,
    load_report, open_chat, run_analysis, save_report, settle,
};

mod chat_loop;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

#[derive(Parser)]
#[command(name = "fckty")]
#[command(about = "Fact-check a YouTube video with search-grounded AI, then ask follow-up questions")]
struct Cli {
    /// Video URL
    url: String,

    /// Transcript text to analyze instead of relying on search alone
    #[arg(short, long)]
    transcript: Option<PathBuf>,

    /// Comments text to base the discourse analysis on
    #[arg(short, long)]
    comments: Option<PathBuf>,

    /// Gemini model identifier
    #[arg(short, long)]
    model: Option<String>,

    /// Ignore a cached report and analyze again
    #[arg(short, long)]
    force: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Skip the follow-up chat
    #[arg(long)]
    no_chat: bool,
}

/// Where to write the report, if anywhere. Reports loaded from the cache
/// are already on disk.
fn save_target(report_path: Option<&Path>, from_cache: bool) -> Option<&Path> {
    report_path.filter(|_| !from_cache)
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

async fn build_request(cli: &Cli) -> Result<AnalysisRequest> {
    let mut request = AnalysisRequest::new(cli.url.trim());
    if let Some(path) = &cli.transcript {
        let text = fs::read_to_string(path)
            .await
            .with_context(|| format!("reading transcript {}", path.display()))?;
        request = request.with_transcript(text);
    }
    if let Some(path) = &cli.comments {
        let text = fs::read_to_string(path)
            .await
            .with_context(|| format!("reading comments {}", path.display()))?;
        request = request.with_comments(text);
    }
    Ok(request)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let mut config = ProviderConfig::default();
    if let Some(model) = &cli.model {
        config = config.with_model(model);
    }

    // Fail fast when no API key is configured
    let client = match GeminiClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let analyzer = Analyzer::new(
        Arc::new(client),
        Arc::new(NoembedClient::default()),
        config.model.clone(),
    );

    let request = build_request(&cli).await?;

    println!(
        "\n{}  {}\n",
        style("fckty").cyan().bold(),
        style("Fact Check The Narrative").dim()
    );
    println!("{}", style("─".repeat(60)).dim());

    // Manual-text requests are never cached
    let report_path = (!request.is_manual())
        .then(|| get_report_path(&get_cache_dir(&request.video_url), &config.model));

    let mut workspace = Workspace::new();
    let ticket = workspace.begin(request.clone());
    let step_start = Instant::now();

    let cached = match &report_path {
        Some(path) if !cli.force && path.exists() => Some(load_report(path).await?),
        _ => None,
    };

    let from_cache = cached.is_some();
    let outcome = match cached {
        Some(result) => {
            println!(
                "{} Analysis loaded ({}) {}",
                style("✓").green().bold(),
                config.name(),
                style("(cached)").dim()
            );
            let chat = if cli.no_chat {
                None
            } else {
                open_chat(&analyzer, &request, &result).await
            };
            Ok(AnalysisOutcome { result, chat })
        }
        None => {
            let spinner = create_spinner(
                "System is researching and verifying claims. This may take up to 30 seconds...",
            );
            let outcome = run_analysis(&analyzer, &request, !cli.no_chat).await;
            match &outcome {
                Ok(_) => spinner.finish_with_message(format!(
                    "{} Analysis complete ({}) {}",
                    style("✓").green().bold(),
                    config.name(),
                    style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
                )),
                Err(_) => spinner.finish_and_clear(),
            }
            outcome
        }
    };

    settle(&mut workspace, &ticket, outcome);

    let result = match workspace.phase() {
        Some(Phase::Ready { result, .. }) => result,
        Some(Phase::Failed { message }) => {
            eprintln!(
                "{} {}",
                style("Analysis Halted:").red().bold(),
                message
            );
            std::process::exit(1);
        }
        _ => anyhow::bail!("analysis did not finish"),
    };

    if let Some(path) = save_target(report_path.as_deref(), from_cache) {
        save_report(result, path).await?;
        println!("{} {}", style("Saved:").dim(), style(path.display()).cyan());
    }
    println!("{}", style("─".repeat(60)).dim());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", format_report_readable(result));
    }

    if !cli.no_chat {
        chat_loop::run(&mut workspace).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_reports_are_not_saved_again() {
        let path = Path::new("/cache/abc/report_gemini-2.5-flash.json");
        assert_eq!(save_target(Some(path), false), Some(path));
        assert_eq!(save_target(Some(path), true), None);
        assert_eq!(save_target(None, false), None);
    }
}
