//! Unicode sparklines

/// Block characters from lowest to highest
pub const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Sparkline of `values` scaled to their own extent
///
/// Values are subsampled to at most `width` characters. A constant series
/// renders as a flat mid-height line.
pub fn sparkline(values: &[f64], width: usize) -> String {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let min = finite.clone().fold(f64::INFINITY, f64::min);
    let max = finite.fold(f64::NEG_INFINITY, f64::max);
    sparkline_range(values, width, min, max)
}

/// Sparkline of `values` on a fixed `[min, max]` scale
///
/// Values outside the range are clamped, non-finite values render as spaces.
pub fn sparkline_range(values: &[f64], width: usize, min: f64, max: f64) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let values = subsample(values, width);

    let range = max - min;
    if !range.is_finite() || range < f64::EPSILON {
        return values
            .iter()
            .map(|v| if v.is_finite() { SPARK_CHARS[4] } else { ' ' })
            .collect();
    }

    values
        .iter()
        .map(|v| {
            if !v.is_finite() {
                return ' ';
            }
            let normalized = (v.clamp(min, max) - min) / range;
            let idx = (normalized * 7.0).round() as usize;
            SPARK_CHARS[idx.min(7)]
        })
        .collect()
}

fn subsample(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width {
        return values.to_vec();
    }
    let step = values.len() as f64 / width as f64;
    (0..width)
        .map(|i| values[((i as f64 * step) as usize).min(values.len() - 1)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_empty() {
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn test_sparkline_zero_width() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0], 0), "");
    }

    #[test]
    fn test_sparkline_constant() {
        let result = sparkline(&[5.0, 5.0, 5.0, 5.0], 10);
        assert_eq!(result.chars().count(), 4);
        assert!(result.chars().all(|c| c == SPARK_CHARS[4]));
    }

    #[test]
    fn test_sparkline_ascending() {
        let values: Vec<f64> = (0..8).map(f64::from).collect();
        let chars: Vec<char> = sparkline(&values, 8).chars().collect();
        assert_eq!(chars[0], SPARK_CHARS[0]);
        assert_eq!(chars[7], SPARK_CHARS[7]);
    }

    #[test]
    fn test_sparkline_subsamples_to_width() {
        let values: Vec<f64> = (0..1000).map(|i| (i as f64 / 100.0).sin()).collect();
        assert_eq!(sparkline(&values, 60).chars().count(), 60);
    }

    #[test]
    fn test_sparkline_range_clamps() {
        let result = sparkline_range(&[-10.0, 0.5, 10.0], 3, 0.0, 1.0);
        let chars: Vec<char> = result.chars().collect();
        assert_eq!(chars[0], SPARK_CHARS[0]);
        assert_eq!(chars[2], SPARK_CHARS[7]);
    }

    #[test]
    fn test_non_finite_values_are_blank() {
        let result = sparkline(&[0.0, f64::NAN, 1.0], 3);
        assert_eq!(result.chars().nth(1), Some(' '));
    }
}
