use crate::chart::{BarChart, ChartBackend, escape};
use crate::config::CurrencyConfig;
use crate::currency::format_currency;
use crate::model::{Extremum, Summary};
use anyhow::{Context, Result};
use std::io::Write;

const CHART_UNAVAILABLE: &str = "chart backend is not available, the comparison chart cannot be drawn";

/// Presentation of summaries and of the comparison chart.
pub trait Render {
    /// Render the stat block of one source.
    fn render(&mut self, summary: &Summary) -> Result<()>;

    /// Render the comparison chart.
    ///
    /// Returns `false` if no chart backend is available, in which case a
    /// visible error is rendered instead.
    fn render_chart(&mut self, chart: &BarChart) -> Result<bool>;

    /// Show a visible error in place of the chart.
    fn render_chart_error(&mut self, msg: &str) -> Result<()>;

    /// Flush everything to the output sink.
    fn finish(&mut self) -> Result<()>;
}

fn draw(backend: &dyn ChartBackend, chart: &BarChart) -> Result<String> {
    let mut buf = Vec::new();
    backend.draw(chart, &mut buf).context("failed to draw chart")?;
    String::from_utf8(buf).context("chart output is not valid UTF-8")
}

struct StatLines {
    total: String,
    average: String,
    max: String,
    min_positive: String,
    zero_days: String,
}

impl StatLines {
    fn new(summary: &Summary, cur: &CurrencyConfig) -> Self {
        let extremum = |ext: &Extremum| {
            if ext.is_undefined() {
                "n/a".to_string()
            } else {
                format!("{} (day {})", format_currency(ext.value, cur), ext.day)
            }
        };
        Self {
            total: format_currency(summary.total, cur),
            average: format_currency(summary.average, cur),
            max: extremum(&summary.max),
            min_positive: extremum(&summary.min_positive),
            zero_days: format!("{} days", summary.zero_days),
        }
    }

    fn rows(&self) -> [(&'static str, &str); 5] {
        [
            ("Monthly total", self.total.as_str()),
            ("Daily average (non-zero days)", self.average.as_str()),
            ("Highest value", self.max.as_str()),
            ("Lowest positive value", self.min_positive.as_str()),
            ("Zero days", self.zero_days.as_str()),
        ]
    }
}

/// Plain text output.
pub struct TextRender<W: Write> {
    out: W,
    currency: CurrencyConfig,
    backend: Option<Box<dyn ChartBackend>>,
}

impl<W: Write> TextRender<W> {
    pub fn new(out: W, currency: CurrencyConfig, backend: Option<Box<dyn ChartBackend>>) -> Self {
        Self {
            out,
            currency,
            backend,
        }
    }
}

impl<W: Write> Render for TextRender<W> {
    fn render(&mut self, summary: &Summary) -> Result<()> {
        let lines = StatLines::new(summary, &self.currency);
        writeln!(self.out, "Data source: {}", summary.source_name)?;
        for (name, val) in lines.rows() {
            writeln!(self.out, "  {:<31}{val}", format!("{name}:"))?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn render_chart(&mut self, chart: &BarChart) -> Result<bool> {
        let Some(backend) = &self.backend else {
            self.render_chart_error(CHART_UNAVAILABLE)?;
            return Ok(false);
        };
        let drawing = draw(backend.as_ref(), chart)?;

        writeln!(self.out, "Daily comparison")?;
        writeln!(self.out)?;
        write!(self.out, "{drawing}")?;
        writeln!(self.out)?;
        Ok(true)
    }

    fn render_chart_error(&mut self, msg: &str) -> Result<()> {
        writeln!(self.out, "Daily comparison")?;
        writeln!(self.out, "ERROR: {msg}")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("failed to flush output")
    }
}

/// Standalone HTML page, written out by [`Render::finish`].
pub struct HtmlRender<W: Write> {
    out: W,
    currency: CurrencyConfig,
    backend: Option<Box<dyn ChartBackend>>,
    cards: String,
    chart_area: String,
}

const HTML_STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem; color: #222; }
#stats-container { display: flex; flex-wrap: wrap; gap: 1rem; }
.stat-card { border: 1px solid #ccc; border-radius: 6px; padding: 1rem; min-width: 18rem; }
.highlight { font-weight: bold; color: #0056b3; }
.chart-area { margin-top: 2rem; }
.error { color: red; font-weight: bold; }";

impl<W: Write> HtmlRender<W> {
    pub fn new(out: W, currency: CurrencyConfig, backend: Option<Box<dyn ChartBackend>>) -> Self {
        Self {
            out,
            currency,
            backend,
            cards: String::new(),
            chart_area: String::new(),
        }
    }
}

impl<W: Write> Render for HtmlRender<W> {
    fn render(&mut self, summary: &Summary) -> Result<()> {
        let lines = StatLines::new(summary, &self.currency);
        let mut card = format!(
            "<div class=\"stat-card\">\n<h3>Data source: {}</h3>\n",
            escape(&summary.source_name)
        );
        for (name, val) in lines.rows() {
            card.push_str(&format!(
                "<p>{}: <span class=\"highlight\">{}</span></p>\n",
                escape(name),
                escape(val)
            ));
        }
        card.push_str("</div>\n");
        self.cards.push_str(&card);
        Ok(())
    }

    fn render_chart(&mut self, chart: &BarChart) -> Result<bool> {
        let Some(backend) = &self.backend else {
            self.render_chart_error(CHART_UNAVAILABLE)?;
            return Ok(false);
        };
        let drawing = draw(backend.as_ref(), chart)?;

        self.chart_area = if backend.is_markup() {
            drawing
        } else {
            format!("<pre>{}</pre>\n", escape(&drawing))
        };
        Ok(true)
    }

    fn render_chart_error(&mut self, msg: &str) -> Result<()> {
        self.chart_area = format!("<p class=\"error\">ERROR: {}</p>\n", escape(msg));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        write!(
            self.out,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Daily revenue comparison</title>\n<style>\n{HTML_STYLE}\n</style>\n</head>\n\
             <body>\n<h1>Daily revenue comparison</h1>\n\
             <div id=\"stats-container\">\n{}</div>\n\
             <section class=\"chart-area\">\n<h2>Daily comparison</h2>\n{}</section>\n\
             </body>\n</html>\n",
            self.cards, self.chart_area
        )?;
        self.out.flush().context("failed to flush output")
    }
}
