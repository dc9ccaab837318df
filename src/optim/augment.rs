//! Operator-driven augmentation after the loop stops

use std::io::{self, BufRead, Write};

use super::runner::OptimizationLoop;
use crate::oracle::Oracle;
use crate::Result;

const CONTINUE_PROMPT: &str = "Do you want to add another query point? (y/n)";
const POINT_PROMPT: &str = "Which point do you want to add?";

/// Asks an operator for extra normalized query points
///
/// Input comes from any `BufRead`; the binary uses stdin. End of input is
/// treated as declining to continue.
pub struct InteractiveAugmenter<R, W> {
    input: R,
    output: W,
}

impl InteractiveAugmenter<io::StdinLock<'static>, io::Stdout> {
    /// Augmenter reading stdin and prompting on stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> InteractiveAugmenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the augmenter, returning the prompt writer
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        writeln!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Next operator-supplied point in [0, 1], or `None` once declined
    pub fn next_point(&mut self) -> Result<Option<f64>> {
        loop {
            let Some(answer) = self.ask(CONTINUE_PROMPT)? else {
                return Ok(None);
            };
            match answer.to_lowercase().as_str() {
                "y" | "yes" => break,
                "n" | "no" => return Ok(None),
                other => {
                    tracing::warn!(answer = other, "Please answer y or n");
                    writeln!(self.output, "Please answer y or n")?;
                }
            }
        }

        loop {
            let Some(answer) = self.ask(POINT_PROMPT)? else {
                return Ok(None);
            };
            match answer.parse::<f64>() {
                Ok(x) if (0.0..=1.0).contains(&x) => return Ok(Some(x)),
                _ => {
                    tracing::warn!(answer = %answer, "Rejected query point, expected a value in [0, 1]");
                    writeln!(self.output, "Please enter a normalized value in [0, 1]")?;
                }
            }
        }
    }

    /// Evaluate operator points until declined, returning how many were added
    pub fn run<O>(&mut self, session: &mut OptimizationLoop<'_>, oracle: &mut O) -> Result<usize>
    where
        O: Oracle + ?Sized,
    {
        let mut added = 0;
        while let Some(x) = self.next_point()? {
            let trial = session.add_trial(oracle, x)?;
            added += 1;
            tracing::info!(
                trial = session.history().len(),
                x = trial.x_physical,
                y = trial.y,
                best = session.history().best_value().unwrap_or(trial.y),
                "operator trial"
            );
        }
        Ok(added)
    }
}
