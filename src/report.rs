use crate::chart::BarChart;
use crate::config::Config;
use crate::data::{Dataset, Source};
use crate::model::{InvalidInput, Series, Summary};
use crate::render::Render;
use crate::stats::summarize;
use anyhow::{Context, Result};

/// What a report run managed to render.
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub rendered: usize,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
    pub chart: bool,
}

/// Drives the per-source pipelines of a dataset through a renderer.
///
/// Each source is processed independently: a source that cannot be
/// summarized or rendered only loses its own stat block.
pub struct Report {
    cfg: Config,
}

impl Report {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    /// Summarize every source, keeping failures per source.
    pub fn summarize_all(dataset: &Dataset) -> Vec<(&str, Result<Summary, InvalidInput>)> {
        dataset
            .sources
            .iter()
            .map(|source| {
                let summary = source.to_series().and_then(|series| summarize(&series));
                (source.name.as_str(), summary)
            })
            .collect()
    }

    pub fn run(&self, dataset: &Dataset, render: &mut dyn Render) -> Result<Outcome> {
        let mut outcome = Outcome::default();

        for (name, summary) in Self::summarize_all(dataset) {
            match summary {
                Ok(summary) => {
                    log::debug!("{summary:?}");
                    match render.render(&summary) {
                        Ok(()) => outcome.rendered += 1,
                        Err(error) => {
                            log::error!("failed to render summary of {name:?}: {error:#}");
                            outcome.failed.push(name.to_string());
                        }
                    }
                }
                Err(error) => {
                    log::error!("skipping {name:?}: {error}");
                    outcome.skipped.push(name.to_string());
                }
            }
        }

        outcome.chart = self
            .render_chart(&dataset.sources, render)
            .context("failed to render chart")?;

        render.finish().context("failed to finish report")?;

        Ok(outcome)
    }

    fn render_chart(&self, sources: &[Source; 2], render: &mut dyn Render) -> Result<bool> {
        let series = match sources
            .iter()
            .map(|source| source.to_series().map_err(|error| (source, error)))
            .collect::<Result<Vec<Series>, _>>()
        {
            Ok(series) => series,
            Err((source, error)) => {
                log::error!("cannot chart {:?}: {error}", source.name);
                render.render_chart_error(&format!(
                    "the chart cannot be drawn, source {:?} is invalid: {error}",
                    source.name
                ))?;
                return Ok(false);
            }
        };

        let chart = BarChart::from_pair(
            [
                (&series[0], sources[0].label.as_str()),
                (&series[1], sources[1].label.as_str()),
            ],
            &self.cfg.chart.colors,
        );

        match render.render_chart(&chart) {
            Ok(drawn) => {
                if !drawn {
                    log::warn!("chart backend unavailable");
                }
                Ok(drawn)
            }
            Err(error) => {
                log::error!("{error:#}");
                render.render_chart_error("the chart could not be drawn, see the log for details")?;
                Ok(false)
            }
        }
    }
}
