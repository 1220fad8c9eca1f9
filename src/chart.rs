use crate::config::{BackendKind, ChartConfig, CurrencyConfig};
use crate::currency::format_currency;
use crate::model::Series;
use crate::stats::parse_numeric_or_zero;
use anyhow::{Result, bail};
use std::io::Write;

/// One dataset of a grouped bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSet {
    pub label: String,
    pub color: String,
    pub values: Vec<f64>,
}

/// Grouped bar chart with one group per day and one bar per dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub groups: Vec<String>,
    pub sets: [BarSet; 2],
}

impl BarChart {
    /// Build the comparison chart of two series.
    ///
    /// Groups follow the days of the first series; bars missing from the
    /// second series are zero.
    pub fn from_pair(pair: [(&Series, &str); 2], colors: &[String; 2]) -> Self {
        let groups: Vec<_> = pair[0]
            .0
            .obs
            .iter()
            .map(|obs| format!("Day {}", obs.day))
            .collect();

        let sets = [0, 1].map(|i_set| {
            let (series, label) = pair[i_set];
            let mut values: Vec<_> = series
                .obs
                .iter()
                .map(|obs| parse_numeric_or_zero(&obs.value))
                .collect();
            values.resize(groups.len(), 0.0);
            BarSet {
                label: label.to_string(),
                color: colors[i_set].clone(),
                values,
            }
        });

        Self { groups, sets }
    }

    /// Top of the y axis; the axis always begins at zero.
    pub fn y_max(&self) -> f64 {
        let max = self
            .sets
            .iter()
            .flat_map(|set| set.values.iter().copied())
            .filter(|val| val.is_finite())
            .fold(0.0, f64::max);
        if max > 0.0 { max } else { 1.0 }
    }
}

/// Capability to draw a [`BarChart`].
pub trait ChartBackend {
    fn draw(&self, chart: &BarChart, out: &mut dyn Write) -> Result<()>;

    /// Whether the output is markup that can be embedded in a page as is.
    fn is_markup(&self) -> bool {
        false
    }
}

/// Select the configured backend, falling back to `default` when unset.
///
/// Returns `None` when charts are disabled.
pub fn backend(
    cfg: &ChartConfig,
    currency: &CurrencyConfig,
    default: BackendKind,
) -> Option<Box<dyn ChartBackend>> {
    match cfg.backend.unwrap_or(default) {
        BackendKind::Ascii => Some(Box::new(AsciiChart {
            width: cfg.width,
            currency: currency.clone(),
        })),
        BackendKind::Svg => Some(Box::new(SvgChart {
            width: cfg.svg_width,
            height: cfg.svg_height,
            currency: currency.clone(),
        })),
        BackendKind::Disabled => None,
    }
}

/// Horizontal bars drawn with characters.
pub struct AsciiChart {
    pub width: usize,
    pub currency: CurrencyConfig,
}

const ASCII_MARKS: [char; 2] = ['#', '='];

fn bar_ratio(val: f64, y_max: f64) -> f64 {
    if val.is_finite() {
        (val.max(0.0) / y_max).min(1.0)
    } else {
        0.0
    }
}

impl ChartBackend for AsciiChart {
    fn draw(&self, chart: &BarChart, out: &mut dyn Write) -> Result<()> {
        if self.width == 0 {
            bail!("chart width must be positive");
        }
        let y_max = chart.y_max();

        let group_w = chart.groups.iter().map(|g| g.len()).max().unwrap_or(0);
        let label_w = chart.sets.iter().map(|s| s.label.len()).max().unwrap_or(0);

        for (set, mark) in chart.sets.iter().zip(ASCII_MARKS) {
            writeln!(out, "{mark} {}", set.label)?;
        }
        writeln!(out, "scale: 0 to {}", format_currency(y_max, &self.currency))?;
        writeln!(out)?;

        for (i_group, group) in chart.groups.iter().enumerate() {
            for (i_set, (set, mark)) in chart.sets.iter().zip(ASCII_MARKS).enumerate() {
                let val = set.values[i_group];
                let len = (bar_ratio(val, y_max) * self.width as f64).round() as usize;
                let head = if i_set == 0 { group.as_str() } else { "" };
                writeln!(
                    out,
                    "{head:<group_w$}  {:<label_w$} |{:<width$} {}",
                    set.label,
                    mark.to_string().repeat(len),
                    format_currency(val, &self.currency),
                    width = self.width,
                )?;
            }
        }
        Ok(())
    }
}

/// Inline SVG with axes, bars and legend.
pub struct SvgChart {
    pub width: u32,
    pub height: u32,
    pub currency: CurrencyConfig,
}

impl ChartBackend for SvgChart {
    fn draw(&self, chart: &BarChart, out: &mut dyn Write) -> Result<()> {
        const LEFT: f64 = 110.0;
        const RIGHT: f64 = 20.0;
        const TOP: f64 = 40.0;
        const BOTTOM: f64 = 50.0;
        const N_TICKS: usize = 4;

        let (width, height) = (self.width as f64, self.height as f64);
        let plot_w = width - LEFT - RIGHT;
        let plot_h = height - TOP - BOTTOM;
        if plot_w <= 0.0 || plot_h <= 0.0 {
            bail!("svg size {}x{} leaves no room to plot", self.width, self.height);
        }
        let y_max = chart.y_max();
        let base_y = TOP + plot_h;

        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" font-family="sans-serif" font-size="11">"#,
            self.width, self.height, self.width, self.height
        )?;

        for (i_set, set) in chart.sets.iter().enumerate() {
            let x = LEFT + i_set as f64 * 160.0;
            writeln!(
                out,
                r#"<rect x="{x:.1}" y="12" width="12" height="12" fill="{}"/><text x="{:.1}" y="22">{}</text>"#,
                escape(&set.color),
                x + 16.0,
                escape(&set.label)
            )?;
        }

        for i_tick in 0..=N_TICKS {
            let frac = i_tick as f64 / N_TICKS as f64;
            let y = base_y - frac * plot_h;
            writeln!(
                out,
                r##"<line x1="{LEFT:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#ddd"/><text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"##,
                LEFT + plot_w,
                LEFT - 6.0,
                y + 4.0,
                escape(&format_currency(frac * y_max, &self.currency))
            )?;
        }

        let n_groups = chart.groups.len().max(1) as f64;
        let group_w = plot_w / n_groups;
        let bar_w = group_w * 0.4;
        for (i_group, group) in chart.groups.iter().enumerate() {
            let group_x = LEFT + i_group as f64 * group_w;
            for (i_set, set) in chart.sets.iter().enumerate() {
                let val = set.values[i_group];
                let bar_h = bar_ratio(val, y_max) * plot_h;
                writeln!(
                    out,
                    r#"<rect x="{:.1}" y="{:.1}" width="{bar_w:.1}" height="{bar_h:.1}" fill="{}"><title>{}: {}</title></rect>"#,
                    group_x + group_w * 0.1 + i_set as f64 * bar_w,
                    base_y - bar_h,
                    escape(&set.color),
                    escape(&set.label),
                    escape(&format_currency(val, &self.currency))
                )?;
            }
            writeln!(
                out,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
                group_x + group_w / 2.0,
                base_y + 16.0,
                escape(group.trim_start_matches("Day "))
            )?;
        }

        writeln!(
            out,
            r##"<line x1="{LEFT:.1}" y1="{TOP:.1}" x2="{LEFT:.1}" y2="{base_y:.1}" stroke="#333"/><line x1="{LEFT:.1}" y1="{base_y:.1}" x2="{:.1}" y2="{base_y:.1}" stroke="#333"/>"##,
            LEFT + plot_w
        )?;
        writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">Day of month</text>"#,
            LEFT + plot_w / 2.0,
            height - 12.0
        )?;
        let y_mid = TOP + plot_h / 2.0;
        writeln!(
            out,
            r#"<text x="16" y="{y_mid:.1}" text-anchor="middle" transform="rotate(-90 16 {y_mid:.1})">Value ({})</text>"#,
            escape(&self.currency.symbol)
        )?;
        writeln!(out, "</svg>")?;
        Ok(())
    }

    fn is_markup(&self) -> bool {
        true
    }
}

/// Escape text for HTML and SVG content or attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
