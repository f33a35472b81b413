//! Remaining-balance chart: balance against day, with a zero reference line
//! marking payback completion.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::merchant_cash_advance::PaybackSchedule;
use crate::types::Money;

const BAR: char = '█';
const ZERO_LINE: char = '-';

/// Pixel geometry for the SVG rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub title: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            margin: 60,
            title: "Remaining Balance Over Time".into(),
        }
    }
}

/// One sampled point per column, picking evenly spaced schedule entries.
/// The first and last entries are always included.
fn sample(schedule: &PaybackSchedule, columns: usize) -> Vec<(u32, Money)> {
    let entries = schedule.entries();
    if entries.is_empty() || columns == 0 {
        return Vec::new();
    }
    if entries.len() <= columns || columns == 1 {
        let step = if columns == 1 { entries.len() } else { 1 };
        return entries
            .iter()
            .step_by(step)
            .map(|e| (e.day, e.remaining_balance))
            .collect();
    }

    let last = entries.len() - 1;
    (0..columns)
        .map(|c| {
            let e = &entries[c * last / (columns - 1)];
            (e.day, e.remaining_balance)
        })
        .collect()
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Render a bar chart of the schedule for a terminal.
///
/// `width` is the number of plot columns, `height` the number of rows above
/// the zero line. The returned text ends with the zero reference line and a
/// day axis.
pub fn render_balance_ascii(schedule: &PaybackSchedule, width: usize, height: usize) -> String {
    let points = sample(schedule, width);
    if points.is_empty() || height == 0 {
        return String::new();
    }

    let peak = to_f64(schedule.opening_balance()).max(f64::EPSILON);
    let label_width = format!("{}", schedule.opening_balance().normalize()).len();
    let bar_heights: Vec<usize> = points
        .iter()
        .map(|(_, b)| ((to_f64(*b) / peak) * height as f64).round() as usize)
        .collect();

    let mut out = String::new();
    for row in (0..height).rev() {
        let label = if row == height - 1 {
            schedule.opening_balance().normalize().to_string()
        } else {
            String::new()
        };
        let cells: String = bar_heights
            .iter()
            .map(|h| if *h > row { BAR } else { ' ' })
            .collect();
        let _ = writeln!(out, "{label:>label_width$} |{cells}");
    }

    let zero_line: String = std::iter::repeat(ZERO_LINE).take(points.len()).collect();
    let _ = writeln!(out, "{:>label_width$} +{zero_line}", 0);

    let last_day = points.last().map(|(d, _)| *d).unwrap_or(0).to_string();
    let gap = points.len().saturating_sub(1 + last_day.len());
    let _ = writeln!(out, "{:>label_width$}  0{}{last_day}", "", " ".repeat(gap));
    let _ = write!(out, "{:>label_width$}  Days", "");
    out
}

/// Render the schedule as a standalone SVG document.
pub fn render_balance_svg(schedule: &PaybackSchedule, opts: &ChartOptions) -> String {
    let w = f64::from(opts.width);
    let h = f64::from(opts.height);
    let m = f64::from(opts.margin);
    let plot_w = (w - 2.0 * m).max(1.0);
    let plot_h = (h - 2.0 * m).max(1.0);

    let peak = to_f64(schedule.opening_balance()).max(f64::EPSILON);
    let last_day = schedule
        .entries()
        .last()
        .map(|e| f64::from(e.day))
        .unwrap_or(0.0)
        .max(1.0);

    let x = |day: u32| m + f64::from(day) / last_day * plot_w;
    let y = |balance: f64| m + plot_h - balance / peak * plot_h;

    let points: Vec<String> = sample(schedule, opts.width as usize)
        .into_iter()
        .map(|(day, bal)| format!("{:.2},{:.2}", x(day), y(to_f64(bal))))
        .collect();

    let zero_y = y(0.0);
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        opts.width, opts.height, opts.width, opts.height
    );
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"  <text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="18">{}</text>"#,
        w / 2.0,
        m / 2.0,
        escape(&opts.title)
    );
    // axes
    let _ = writeln!(
        svg,
        r#"  <line x1="{m:.2}" y1="{m:.2}" x2="{m:.2}" y2="{:.2}" stroke="black"/>"#,
        m + plot_h
    );
    let _ = writeln!(
        svg,
        r#"  <line x1="{m:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="black"/>"#,
        m + plot_h,
        m + plot_w,
        m + plot_h
    );
    let _ = writeln!(
        svg,
        r#"  <polyline class="balance" fill="none" stroke="steelblue" stroke-width="2" points="{}"/>"#,
        points.join(" ")
    );
    let _ = writeln!(
        svg,
        r#"  <line class="zero" x1="{m:.2}" y1="{zero_y:.2}" x2="{:.2}" y2="{zero_y:.2}" stroke="red" stroke-dasharray="6,4"/>"#,
        m + plot_w
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="14">Days</text>"#,
        m + plot_w / 2.0,
        h - m / 4.0
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="14" transform="rotate(-90 {:.2} {:.2})">Remaining Balance ($)</text>"#,
        m / 3.0,
        m + plot_h / 2.0,
        m / 3.0,
        m + plot_h / 2.0
    );
    // legend
    let lx = m + plot_w - 170.0;
    let ly = m + 10.0;
    let _ = writeln!(
        svg,
        r#"  <line x1="{lx:.2}" y1="{ly:.2}" x2="{:.2}" y2="{ly:.2}" stroke="steelblue" stroke-width="2"/>"#,
        lx + 20.0
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{:.2}" y="{:.2}" font-size="12">Remaining Balance</text>"#,
        lx + 26.0,
        ly + 4.0
    );
    let _ = writeln!(
        svg,
        r#"  <line x1="{lx:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="red" stroke-dasharray="6,4"/>"#,
        ly + 18.0,
        lx + 20.0,
        ly + 18.0
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{:.2}" y="{:.2}" font-size="12">Payback Complete</text>"#,
        lx + 26.0,
        ly + 22.0
    );
    svg.push_str("</svg>\n");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
