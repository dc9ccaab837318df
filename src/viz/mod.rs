//! Surrogate visualization
//!
//! Rendering is a pure side effect of the loop: a [`Visualizer`] sees the
//! history and posterior after every refit and never feeds anything back.

mod sparkline;

pub use sparkline::{sparkline, sparkline_range, SPARK_CHARS};

use std::io::{self, Write};

use crate::calibrate::DomainBounds;
use crate::design::DesignHistory;
use crate::Result;

const TRIAL_MARK: char = '•';
const CANDIDATE_MARK: char = '^';

/// Receives the surrogate state after every refit
pub trait Visualizer {
    /// Render the posterior over `grid` (physical units) together with the
    /// trials so far and the most recent candidate, if any
    fn render(
        &mut self,
        history: &DesignHistory,
        bounds: &DomainBounds,
        grid: &[f64],
        mean: &[f64],
        stddev: &[f64],
        candidate: Option<f64>,
    ) -> Result<()>;
}

/// Visualizer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVisualizer;

impl Visualizer for NullVisualizer {
    fn render(
        &mut self,
        _history: &DesignHistory,
        _bounds: &DomainBounds,
        _grid: &[f64],
        _mean: &[f64],
        _stddev: &[f64],
        _candidate: Option<f64>,
    ) -> Result<()> {
        Ok(())
    }
}

/// Sparkline rendering of the posterior band and trial locations
pub struct TerminalVisualizer<W: Write> {
    out: W,
    width: usize,
}

impl TerminalVisualizer<io::Stderr> {
    /// Render to standard error
    pub fn stderr(width: usize) -> Self {
        Self::new(io::stderr(), width)
    }
}

impl<W: Write> TerminalVisualizer<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width: width.max(2),
        }
    }

    /// Consume the visualizer, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Marker row with one column per grid cell
    fn marker_row(&self, history: &DesignHistory, bounds: &DomainBounds, candidate: Option<f64>) -> String {
        let mut row = vec![' '; self.width];
        let column = |x_physical: f64| {
            let u = bounds.to_normalized(x_physical).clamp(0.0, 1.0);
            (u * (self.width - 1) as f64).round() as usize
        };
        for trial in history.trials() {
            row[column(trial.x_physical)] = TRIAL_MARK;
        }
        if let Some(x) = candidate {
            row[column(x)] = CANDIDATE_MARK;
        }
        row.into_iter().collect()
    }
}

impl<W: Write> Visualizer for TerminalVisualizer<W> {
    fn render(
        &mut self,
        history: &DesignHistory,
        bounds: &DomainBounds,
        grid: &[f64],
        mean: &[f64],
        stddev: &[f64],
        candidate: Option<f64>,
    ) -> Result<()> {
        let upper: Vec<f64> = mean.iter().zip(stddev).map(|(m, s)| m + 2.0 * s).collect();
        let lower: Vec<f64> = mean.iter().zip(stddev).map(|(m, s)| m - 2.0 * s).collect();
        let min = lower.iter().copied().fold(f64::INFINITY, f64::min);
        let max = upper.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let markers = self.marker_row(history, bounds, candidate);
        let (first, last) = (
            grid.first().copied().unwrap_or(bounds.lower),
            grid.last().copied().unwrap_or(bounds.upper),
        );

        writeln!(self.out, "trials {:>3}  x in [{first:.4}, {last:.4}]", history.len())?;
        writeln!(self.out, "  +2σ  {}", sparkline_range(&upper, self.width, min, max))?;
        writeln!(self.out, "  mean {}", sparkline_range(mean, self.width, min, max))?;
        writeln!(self.out, "  -2σ  {}", sparkline_range(&lower, self.width, min, max))?;
        writeln!(self.out, "       {markers}")?;
        if let Some(x) = candidate {
            writeln!(self.out, "  next x = {x:.6}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
