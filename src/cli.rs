// Command-line front end
// Collects text, calls the scorer once per submission and renders the result

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::api::{analyze_sources, load_lexicon, InputSource};
use crate::models::SourcedReport;
use crate::services::config_store::{AppConfig, ConfigStore, OutputFormat};
use crate::services::report_formatter::{render_report, ReportStyle};

#[derive(Parser, Debug)]
#[command(
    name = "ai-text-detector",
    about = "Estimate how likely a text (max 1000 words) is AI-generated",
    version
)]
pub struct Cli {
    /// Directory holding config.json (defaults to the platform config dir)
    #[arg(long, global = true, env = "AI_DETECTOR_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze files, or stdin when no file is given
    Analyze(AnalyzeArgs),
    /// Inspect or change the stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Text, Markdown, .docx or .pdf files
    pub files: Vec<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Hide the per-metric progress bars
    #[arg(long)]
    pub no_bars: bool,

    /// Show each metric's weight and contribution
    #[arg(long)]
    pub weights: bool,

    /// Custom sentiment lexicon (JSON)
    #[arg(long)]
    pub lexicon: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Set one key: display.format, display.showBars, display.barWidth, lexicon.path
    Set { key: String, value: String },
    /// Restore defaults
    Reset,
}

pub fn config_store(cli: &Cli) -> anyhow::Result<ConfigStore> {
    let dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => ConfigStore::default_config_dir()
            .ok_or_else(|| anyhow!("Could not determine a config directory; pass --config-dir"))?,
    };
    Ok(ConfigStore::new(dir))
}

/// Flags win over stored settings
fn resolve_output(args: &AnalyzeArgs, config: &AppConfig) -> (OutputFormat, ReportStyle) {
    let format = if args.json {
        OutputFormat::Json
    } else {
        config.display.output_format()
    };
    let style = ReportStyle {
        show_bars: config.display.show_bars && !args.no_bars,
        bar_width: config.display.effective_bar_width(),
        show_weights: args.weights,
    };
    (format, style)
}

fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    Ok(input)
}

/// Render all reports; a single input prints bare, several get a header each
pub fn render_all(reports: &[SourcedReport], format: OutputFormat, style: &ReportStyle) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let json = if let [single] = reports {
                serde_json::to_string_pretty(&single.report)?
            } else {
                serde_json::to_string_pretty(reports)?
            };
            Ok(format!("{}\n", json))
        }
        OutputFormat::Text => {
            if let [single] = reports {
                return Ok(render_report(&single.report, style));
            }
            let sections: Vec<String> = reports
                .iter()
                .map(|r| format!("== {} ==\n{}", r.source, render_report(&r.report, style)))
                .collect();
            Ok(sections.join("\n"))
        }
    }
}

/// Returns whether every input was scored
pub async fn run_analyze(store: &ConfigStore, args: AnalyzeArgs) -> anyhow::Result<bool> {
    let config = store.load().map_err(|e| anyhow!(e))?;
    let (format, style) = resolve_output(&args, &config);

    let lexicon_path = args
        .lexicon
        .clone()
        .or_else(|| config.lexicon.path.as_ref().map(PathBuf::from));
    let lexicon = Arc::new(load_lexicon(lexicon_path.as_deref()).map_err(|e| anyhow!(e))?);

    let sources: Vec<InputSource> = if args.files.is_empty() {
        vec![InputSource::Inline {
            label: "<stdin>".to_string(),
            text: read_stdin()?,
        }]
    } else {
        args.files.iter().cloned().map(InputSource::File).collect()
    };
    info!(inputs = sources.len(), "analyze.start");

    let reports = analyze_sources(lexicon, sources).await;
    print!("{}", render_all(&reports, format, &style)?);

    Ok(reports.iter().all(|r| r.report.is_scored()))
}

pub fn run_config(store: &ConfigStore, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = store.load().map_err(|e| anyhow!(e))?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Path => println!("{}", store.config_file().display()),
        ConfigAction::Set { key, value } => {
            store.set_value(&key, &value).map_err(|e| anyhow!(e))?;
            info!(key = %key, value = %value, "config.updated");
            println!("{} = {}", key, value);
        }
        ConfigAction::Reset => {
            store.reset().map_err(|e| anyhow!(e))?;
            println!("Configuration reset to defaults");
        }
    }
    Ok(())
}
