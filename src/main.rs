mod chart;
mod config;
mod currency;
mod data;
mod model;
mod render;
mod report;
mod stats;

use crate::config::{BackendKind, Config};
use crate::data::Dataset;
use crate::render::{HtmlRender, Render, TextRender};
use crate::report::Report;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML file with presentation settings.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the summary of each source.
    Summary {
        #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,
    },

    /// Render the summaries and the daily comparison chart.
    Report {
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SummaryFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Html,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let cfg = match &args.config {
        Some(file) => Config::from_file(file).context("failed to construct cfg")?,
        None => Config::default(),
    };
    log::info!("{cfg:#?}");

    let dataset = Dataset::reference()?;

    match args.command {
        Command::Summary { format } => print_summaries(&cfg, &dataset, format)?,
        Command::Report { format, output } => write_report(cfg, &dataset, format, output)?,
    }

    Ok(())
}

fn print_summaries(cfg: &Config, dataset: &Dataset, format: SummaryFormat) -> Result<()> {
    let mut summaries = Vec::new();
    for (name, summary) in Report::summarize_all(dataset) {
        match summary {
            Ok(summary) => summaries.push(summary),
            Err(error) => log::error!("skipping {name:?}: {error}"),
        }
    }

    let mut stdout = io::stdout().lock();
    match format {
        SummaryFormat::Text => {
            let mut render = TextRender::new(&mut stdout, cfg.currency.clone(), None);
            for summary in &summaries {
                if let Err(error) = render.render(summary) {
                    log::error!("failed to render {:?}: {error:#}", summary.source_name);
                }
            }
            render.finish()?;
        }
        SummaryFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &summaries)
                .context("failed to serialize summaries")?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn write_report(
    cfg: Config,
    dataset: &Dataset,
    format: ReportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let out: Box<dyn Write> = match &output {
        Some(file) => {
            let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    let currency = cfg.currency.clone();
    let mut render: Box<dyn Render> = match format {
        ReportFormat::Text => {
            let backend = chart::backend(&cfg.chart, &currency, BackendKind::Ascii);
            Box::new(TextRender::new(out, currency, backend))
        }
        ReportFormat::Html => {
            let backend = chart::backend(&cfg.chart, &currency, BackendKind::Svg);
            Box::new(HtmlRender::new(out, currency, backend))
        }
    };

    let outcome = Report::new(cfg)
        .run(dataset, render.as_mut())
        .context("failed to run report")?;
    log::info!(
        "rendered {} summaries, skipped {:?}, failed {:?}, chart drawn: {}",
        outcome.rendered,
        outcome.skipped,
        outcome.failed,
        outcome.chart
    );

    if let Some(file) = output {
        log::info!("wrote {file:?}");
    }

    Ok(())
}
