//! Stdout renderings of the dashboard surfaces. Each redraw prints a fresh
//! block; state stays in memory so every print is a complete replacement.

use crate::charts::{ChartSink, Dataset};

use super::{Region, Surface};

/// Widest sparkline we print before dropping older points.
const SPARK_WIDTH: usize = 60;

/// Text surface that prints each region update as a labelled block.
#[derive(Debug, Default)]
pub struct TermSurface;

impl TermSurface {
    pub fn new() -> Self {
        Self
    }
}

impl Surface for TermSurface {
    fn set_block(&mut self, region: Region, text: String) {
        if text.is_empty() {
            println!("[{}] (empty)", region.as_str());
        } else if text.contains('\n') {
            println!("[{}]", region.as_str());
            for line in text.lines() {
                println!("  {line}");
            }
        } else {
            println!("[{}] {}", region.as_str(), text);
        }
    }
}

/// Line chart rendered as one sparkline per dataset.
#[derive(Debug)]
pub struct TermChart {
    title: &'static str,
    datasets: Vec<Dataset>,
}

impl TermChart {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            datasets: Vec::new(),
        }
    }

    fn render_text(&self) -> String {
        let mut out = format!("[{} chart]", self.title);
        for ds in &self.datasets {
            let line = if ds.data.is_empty() {
                "(no data)".to_owned()
            } else {
                let ys: Vec<f64> = ds.data.iter().map(|p| p.y).collect();
                let tail = &ys[ys.len().saturating_sub(SPARK_WIDTH)..];
                format!(
                    "{} ({} pts, last {})",
                    sparkline(tail),
                    ds.data.len(),
                    ys[ys.len() - 1],
                )
            };
            out.push_str(&format!("\n  {}: {}", ds.label, line));
        }
        out
    }
}

impl ChartSink for TermChart {
    fn update(&mut self, datasets: Vec<Dataset>) {
        self.datasets = datasets;
        println!("{}", self.render_text());
    }
}

/// Scale `ys` into the eight block-element levels. A flat series renders at
/// the lowest level.
fn sparkline(ys: &[f64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let (min, max) = ys.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), &y| (lo.min(y), hi.max(y)),
    );
    let span = max - min;

    ys.iter()
        .map(|&y| {
            let idx = if span > 0.0 {
                (((y - min) / span) * 7.0).round() as usize
            } else {
                0
            };
            BARS[idx.min(7)]
        })
        .collect()
}
