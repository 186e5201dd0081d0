use std::collections::BTreeMap;

use metrics_core::DailyBar;
use serde::{Deserialize, Serialize};

use crate::indicators::{
    atr, macd, moving_average, obv, rsi, stochastic, volatility, MacdSummary, ObvSummary,
    StochasticSummary,
};
use crate::levels::{support_resistance, LevelSummary};

pub const MA_PERIODS: [usize; 2] = [50, 200];
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const STOCHASTIC_K: usize = 14;
pub const STOCHASTIC_D: usize = 3;
pub const ATR_PERIOD: usize = 14;
pub const VOLATILITY_DAYS: usize = 252;

/// Fixed-key composite of every indicator for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub moving_averages: BTreeMap<String, Option<f64>>,
    pub rsi: Option<f64>,
    pub macd: MacdSummary,
    pub stochastic: StochasticSummary,
    pub atr: Option<f64>,
    pub obv: ObvSummary,
    pub volatility: Option<f64>,
    pub support_resistance: LevelSummary,
}

/// Every indicator at default parameters, over bars sorted
/// most-recent-first. Each slot degrades to absent independently.
pub fn technical_snapshot(bars: &[DailyBar]) -> TechnicalSnapshot {
    let mut moving_averages = BTreeMap::new();
    for period in MA_PERIODS {
        moving_averages.insert(format!("MA_{period}"), moving_average(bars, period));
    }

    TechnicalSnapshot {
        moving_averages,
        rsi: rsi(bars, RSI_PERIOD),
        macd: macd(bars, MACD_FAST, MACD_SLOW, MACD_SIGNAL),
        stochastic: stochastic(bars, STOCHASTIC_K, STOCHASTIC_D),
        atr: atr(bars, ATR_PERIOD),
        obv: obv(bars),
        volatility: volatility(bars, VOLATILITY_DAYS),
        support_resistance: support_resistance(bars),
    }
}
