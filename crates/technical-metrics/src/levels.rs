use metrics_core::num::safe_f64;
use metrics_core::DailyBar;
use serde::{Deserialize, Serialize};

/// How many recent bars the level scan looks at
pub const LEVEL_WINDOW: usize = 60;

/// Confidence grade for detected levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelConfidence {
    High,
    Moderate,
    #[default]
    Low,
}

impl LevelConfidence {
    pub fn as_label(&self) -> &'static str {
        match self {
            LevelConfidence::High => "High",
            LevelConfidence::Moderate => "Moderate",
            LevelConfidence::Low => "Low",
        }
    }
}

/// Support/resistance summary over the recent window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub confidence: LevelConfidence,
}

/// A value at index `i` that strictly beats all four values two positions
/// either side. Any absent value in the neighborhood disqualifies it.
fn strict_extremum(
    window: &[DailyBar],
    i: usize,
    field: impl Fn(&DailyBar) -> Option<f64>,
    beats: impl Fn(f64, f64) -> bool,
) -> Option<f64> {
    let center = safe_f64(field(&window[i]))?;
    for offset in [i - 2, i - 1, i + 1, i + 2] {
        let neighbor = safe_f64(field(&window[offset]))?;
        if !beats(center, neighbor) {
            return None;
        }
    }
    Some(center)
}

fn grade(bar_count: usize, highs: usize, lows: usize) -> LevelConfidence {
    if highs >= 3 && lows >= 3 {
        LevelConfidence::High
    } else if bar_count < 20 || highs < 2 || lows < 2 {
        LevelConfidence::Low
    } else {
        LevelConfidence::Moderate
    }
}

/// Local extrema over the most recent 60 bars, scanned by position in
/// their descending order. Resistance is the lowest local high above the
/// latest close, support the highest local low below it.
pub fn support_resistance(bars: &[DailyBar]) -> LevelSummary {
    let window = &bars[..bars.len().min(LEVEL_WINDOW)];

    let mut local_highs: Vec<f64> = Vec::new();
    let mut local_lows: Vec<f64> = Vec::new();

    if window.len() >= 5 {
        for i in 2..window.len() - 2 {
            if let Some(high) = strict_extremum(window, i, |b| b.high, |c, n| c > n) {
                local_highs.push(high);
            }
            if let Some(low) = strict_extremum(window, i, |b| b.low, |c, n| c < n) {
                local_lows.push(low);
            }
        }
    }

    let confidence = grade(window.len(), local_highs.len(), local_lows.len());

    let Some(current) = window.first().and_then(|b| safe_f64(b.close)) else {
        return LevelSummary {
            support: None,
            resistance: None,
            confidence,
        };
    };

    let resistance = local_highs.iter().copied().filter(|h| *h > current).reduce(f64::min);
    let support = local_lows.iter().copied().filter(|l| *l < current).reduce(f64::max);

    LevelSummary {
        support,
        resistance,
        confidence,
    }
}
