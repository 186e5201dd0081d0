use chrono::NaiveDate;
use metrics_core::num::{safe_div, safe_f64};
use metrics_core::DailyBar;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Closes with absent values dropped, oldest first.
fn chronological_closes(bars: &[DailyBar]) -> Vec<f64> {
    bars.iter().rev().filter_map(|b| safe_f64(b.close)).collect()
}

/// Simple average of the most recent `period` closes. Requires every close
/// in that window to be present.
pub fn moving_average(bars: &[DailyBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }

    let closes: Vec<f64> = bars[..period].iter().filter_map(|b| safe_f64(b.close)).collect();
    if closes.len() != period {
        return None;
    }

    Some(closes.iter().sum::<f64>() / period as f64)
}

/// Relative Strength Index over a simple (non-smoothed) average of gains
/// and losses. 100 when the window has no losses.
pub fn rsi(bars: &[DailyBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }

    let window: Vec<&DailyBar> = bars[..period + 1].iter().rev().collect();
    let mut gains = Vec::with_capacity(period);
    let mut losses = Vec::with_capacity(period);

    for pair in window.windows(2) {
        let (Some(prev), Some(curr)) = (safe_f64(pair[0].close), safe_f64(pair[1].close)) else {
            continue;
        };
        let change = curr - prev;
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    if gains.len() < period {
        return None;
    }

    let avg_gain = gains[gains.len() - period..].iter().sum::<f64>() / period as f64;
    let avg_loss = losses[losses.len() - period..].iter().sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Exponential moving average seeded with the first value, multiplier
/// 2/(period+1). One entry per input value.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.is_empty() {
        return vec![];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    result.push(values[0]);

    for i in 1..values.len() {
        let prev = result[i - 1];
        result.push((values[i] - prev) * multiplier + prev);
    }

    result
}

/// MACD summary for the latest bar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSummary {
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
    pub crossover_date: Option<NaiveDate>,
}

/// MACD over the full chronological close series. Line values before
/// index slow-1 are warm-up padding kept at zero; the signal EMA runs
/// over the non-zero line values only.
pub fn macd(bars: &[DailyBar], fast: usize, slow: usize, signal_period: usize) -> MacdSummary {
    if fast == 0 || slow == 0 || signal_period == 0 || fast >= slow {
        return MacdSummary::default();
    }

    let closes = chronological_closes(bars);
    if closes.len() < slow {
        return MacdSummary::default();
    }

    let ema_fast = ema(&closes, fast);
    let ema_slow = ema(&closes, slow);

    let macd_line: Vec<f64> = (0..closes.len())
        .map(|i| if i + 1 < slow { 0.0 } else { ema_fast[i] - ema_slow[i] })
        .collect();

    let macd_values: Vec<f64> = macd_line.into_iter().filter(|v| *v != 0.0).collect();
    if macd_values.is_empty() {
        // Constant series: the line is flat zero and the signal EMA has
        // nothing to run over.
        return MacdSummary {
            macd: Some(0.0),
            ..MacdSummary::default()
        };
    }

    let signal_line = ema(&macd_values, signal_period);
    let n = macd_values.len();
    let macd_latest = macd_values[n - 1];
    let signal_latest = signal_line[n - 1];
    let histogram = macd_latest - signal_latest;

    let crossed = n >= 2 && {
        let prev = macd_values[n - 2] - signal_line[n - 2];
        (prev <= 0.0 && histogram > 0.0) || (prev >= 0.0 && histogram < 0.0)
    };

    MacdSummary {
        macd: Some(macd_latest),
        signal: Some(signal_latest),
        histogram: Some(histogram),
        crossover_date: if crossed { bars.first().map(|b| b.date) } else { None },
    }
}

/// Stochastic summary for the latest bar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StochasticSummary {
    pub percent_k: Option<f64>,
    pub percent_d: Option<f64>,
}

fn window_extremes(window: &[DailyBar]) -> Option<(f64, f64)> {
    let highest = window
        .iter()
        .filter_map(|b| safe_f64(b.high))
        .fold(f64::NEG_INFINITY, f64::max);
    let lowest = window
        .iter()
        .filter_map(|b| safe_f64(b.low))
        .fold(f64::INFINITY, f64::min);

    (highest.is_finite() && lowest.is_finite()).then_some((highest, lowest))
}

/// %K for one window, `window[0]` being its most recent bar. The
/// degenerate zero-range outcome is caller-chosen: 50 for the reported
/// %K, skip for %D sampling.
fn window_percent_k(window: &[DailyBar], zero_range: Option<f64>) -> Option<f64> {
    let close = safe_f64(window.first()?.close)?;
    let (highest, lowest) = window_extremes(window)?;
    if highest == lowest {
        return zero_range;
    }
    Some((close - lowest) / (highest - lowest) * 100.0)
}

/// Stochastic oscillator: %K over the most recent `k_period` bars, %D the
/// mean of %K across the `d_period` most recent rolling windows.
pub fn stochastic(bars: &[DailyBar], k_period: usize, d_period: usize) -> StochasticSummary {
    if k_period == 0 || bars.len() < k_period {
        return StochasticSummary::default();
    }

    let Some(percent_k) = window_percent_k(&bars[..k_period], Some(50.0)) else {
        return StochasticSummary::default();
    };

    let mut samples = Vec::with_capacity(d_period);
    for offset in 0..d_period {
        let Some(window) = bars.get(offset..offset + k_period) else {
            break;
        };
        if let Some(k) = window_percent_k(window, None) {
            samples.push(k);
        }
    }

    let percent_d = if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    };

    StochasticSummary {
        percent_k: Some(percent_k),
        percent_d,
    }
}

/// Average True Range as a percentage of the latest close. Requires
/// `period+1` most-recent bars with complete high/low/close triples.
pub fn atr(bars: &[DailyBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }

    // Oldest-first tuples of the period+1 most recent complete bars.
    let mut window = Vec::with_capacity(period + 1);
    for bar in bars[..period + 1].iter().rev() {
        let high = safe_f64(bar.high)?;
        let low = safe_f64(bar.low)?;
        let close = safe_f64(bar.close)?;
        window.push((high, low, close));
    }

    let mut sum = 0.0;
    for i in 1..window.len() {
        let (high, low, _) = window[i];
        let (_, _, prev_close) = window[i - 1];
        let tr = (high - low).max((high - prev_close).abs()).max((low - prev_close).abs());
        sum += tr;
    }

    let atr = sum / period as f64;
    let latest_close = window[period].2;
    safe_div(Some(atr), Some(latest_close)).map(|v| v * 100.0)
}

/// Direction of the recent OBV slope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObvTrend {
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
    #[serde(rename = "sideways")]
    Sideways,
    #[default]
    #[serde(rename = "insufficient data")]
    InsufficientData,
}

impl ObvTrend {
    pub fn as_label(&self) -> &'static str {
        match self {
            ObvTrend::Up => "up",
            ObvTrend::Down => "down",
            ObvTrend::Sideways => "sideways",
            ObvTrend::InsufficientData => "insufficient data",
        }
    }
}

/// On-Balance Volume summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObvSummary {
    pub obv: Option<f64>,
    pub obv_trend: ObvTrend,
}

/// OBV points oldest-first: signed volume accumulated on close-to-close
/// moves, carried unchanged across gaps in close or volume.
fn obv_series(bars: &[DailyBar]) -> Vec<f64> {
    if bars.is_empty() {
        return vec![];
    }

    let chronological: Vec<&DailyBar> = bars.iter().rev().collect();
    let mut values = Vec::with_capacity(chronological.len());
    values.push(0.0);

    for i in 1..chronological.len() {
        let prev_obv = values[i - 1];
        let step = match (
            safe_f64(chronological[i - 1].close),
            safe_f64(chronological[i].close),
            chronological[i].volume,
        ) {
            (Some(prev), Some(curr), Some(vol)) if curr > prev => vol as f64,
            (Some(prev), Some(curr), Some(vol)) if curr < prev => -(vol as f64),
            _ => 0.0,
        };
        values.push(prev_obv + step);
    }

    values
}

fn classify_trend(series: &[f64]) -> ObvTrend {
    let count = series.len().min(10);
    if count < 2 {
        return ObvTrend::InsufficientData;
    }

    let tail = &series[series.len() - count..];
    let slope = (tail[count - 1] - tail[0]) / (count - 1) as f64;
    if slope > 0.0 {
        ObvTrend::Up
    } else if slope < 0.0 {
        ObvTrend::Down
    } else {
        ObvTrend::Sideways
    }
}

/// On-Balance Volume with trend classification from the slope of the last
/// min(10, len) OBV points.
pub fn obv(bars: &[DailyBar]) -> ObvSummary {
    let series = obv_series(bars);
    ObvSummary {
        obv: series.last().copied(),
        obv_trend: classify_trend(&series),
    }
}

/// Annualized historical volatility as a percentage: sample standard
/// deviation of day-over-day returns across up to `days` recent bars.
pub fn volatility(bars: &[DailyBar], days: usize) -> Option<f64> {
    if days == 0 || bars.len() < 3 {
        return None;
    }

    let window = &bars[..bars.len().min(days)];
    let chronological: Vec<&DailyBar> = window.iter().rev().collect();

    let mut returns = Vec::with_capacity(chronological.len().saturating_sub(1));
    for pair in chronological.windows(2) {
        let (Some(prev), Some(curr)) = (safe_f64(pair[0].close), safe_f64(pair[1].close)) else {
            continue;
        };
        if prev == 0.0 {
            continue;
        }
        returns.push((curr - prev) / prev);
    }

    if returns.len() < 2 {
        return None;
    }

    let std_dev = returns.std_dev();
    Some(std_dev * (252.0_f64).sqrt() * 100.0)
}
