// Bar Series Indicators
// ATR, exponentially weighted means and dispersion over OHLC series

use common::Bar;
use statrs::statistics::Statistics;

/// Average true range over the series
///
/// True range per bar is max(high - low, |high - prev_close|,
/// |low - prev_close|); the first bar has no predecessor and is skipped.
/// Callers must supply at least two bars.
pub fn average_true_range(bars: &[Bar]) -> f64 {
    let ranges: Vec<f64> = bars
        .windows(2)
        .map(|w| {
            let prev_close = w[0].close;
            let bar = &w[1];
            (bar.high - bar.low)
                .max((bar.high - prev_close).abs())
                .max((bar.low - prev_close).abs())
        })
        .collect();
    ranges.mean()
}

/// Exponentially weighted mean of the whole series
///
/// alpha = 2 / (span + 1); each observation is weighted (1 - alpha)^age and
/// the weights are normalized over every observation to date, so a series
/// shorter than the span is still fully seeded.
pub fn ema(values: &[f64], span: usize) -> f64 {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut num = 0.0;
    let mut den = 0.0;
    for &v in values {
        num = (1.0 - alpha) * num + v;
        den = (1.0 - alpha) * den + 1.0;
    }
    num / den
}

/// Population coefficient of variation (std dev / mean)
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let mean = values.mean();
    if mean == 0.0 {
        return 0.0;
    }
    values.population_std_dev() / mean
}

/// Position of the last close inside the full high/low band
///
/// 0.0 sits on the series low, 1.0 on the series high. `None` when the
/// band has zero width (degenerate range).
pub fn range_position(bars: &[Bar]) -> Option<f64> {
    let last_close = bars.last()?.close;
    let high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let band = high - low;
    if band <= 0.0 {
        return None;
    }
    Some((last_close - low) / band)
}
