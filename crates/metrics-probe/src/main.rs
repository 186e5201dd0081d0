//! metrics-probe: Seed an in-memory store with a deterministic synthetic
//! symbol, run the metrics engine over it, and print the categorized result
//! as pretty JSON.
//!
//! Usage:
//!   cargo run -p metrics-probe
//!   cargo run -p metrics-probe -- --symbol DEMO --bars 120
//!   cargo run -p metrics-probe -- --period 2023-12-31

use chrono::NaiveDate;
use metrics_core::format::{format_currency, format_large_number, format_percentage};
use metrics_core::{
    BalanceSheetPeriod, CashFlowPeriod, CompanySnapshot, DailyBar, IncomeStatementPeriod,
    PriceSnapshot,
};
use metrics_orchestrator::MetricsEngine;
use symbol_data::MemoryStore;

const DEFAULT_BARS: usize = 252;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "metrics_probe=info,metrics_orchestrator=info,symbol_data=debug".into()
            }),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: metrics-probe [--symbol SYM] [--bars N] [--period YYYY-MM-DD]");
        eprintln!("");
        eprintln!("Options:");
        eprintln!("  --symbol SYM         Symbol to seed and derive (default: DEMO)");
        eprintln!("  --bars N             Synthetic daily bars to seed (default: {})", DEFAULT_BARS);
        eprintln!("  --period YYYY-MM-DD  Statement period to resolve (default: latest)");
        return Ok(());
    }

    let symbol = args
        .iter()
        .position(|a| a == "--symbol")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
        .unwrap_or("DEMO")
        .to_string();

    let bar_count: usize = args
        .iter()
        .position(|a| a == "--bars")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_BARS);

    let period = args
        .iter()
        .position(|a| a == "--period")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok());

    tracing::info!("Seeding {} with {} synthetic bars", symbol, bar_count);

    let store = seed_store(&symbol, bar_count);
    let engine = MetricsEngine::new(store);
    let result = engine.categorized(&symbol, period)?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    let currency = result.company_info.currency.as_deref().unwrap_or("USD");
    let price = result
        .price_data
        .current_price
        .map(|p| format_currency(p, currency))
        .unwrap_or_else(|| "n/a".to_string());
    let cap = result
        .company_info
        .market_cap
        .map(format_large_number)
        .unwrap_or_else(|| "n/a".to_string());
    let vol = result
        .technical_indicators
        .volatility
        .map(|v| format_percentage(v, 1))
        .unwrap_or_else(|| "n/a".to_string());
    tracing::info!("{} last {}, market cap {}, volatility {}", result.symbol, price, cap, vol);

    let levels = &result.technical_indicators.support_resistance;
    let support = levels
        .support
        .map(|v| format_currency(v, currency))
        .unwrap_or_else(|| "n/a".to_string());
    let resistance = levels
        .resistance
        .map(|v| format_currency(v, currency))
        .unwrap_or_else(|| "n/a".to_string());
    tracing::info!(
        "OBV trend {}; support {} / resistance {} ({} confidence)",
        result.technical_indicators.obv.obv_trend.as_label(),
        support,
        resistance,
        levels.confidence.as_label()
    );

    Ok(())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Trending price path with a repeating wobble so the level scan has real
/// local highs and lows to find.
fn synthetic_bars(symbol: &str, count: usize) -> Vec<DailyBar> {
    let end = date(2024, 12, 31);
    (0..count)
        .map(|i| {
            let drift = i as f64 * 0.15;
            let wobble = ((i % 9) as f64 - 4.0) * 1.3;
            let close = 100.0 + drift + wobble;
            DailyBar {
                symbol: symbol.to_string(),
                date: end - chrono::Duration::days((count - 1 - i) as i64),
                open: Some(close - 0.1),
                high: Some(close + 0.6),
                low: Some(close - 0.6),
                close: Some(close),
                volume: Some(1_000_000 + (i % 5) as i64 * 50_000),
            }
        })
        .collect()
}

fn seed_store(symbol: &str, bar_count: usize) -> MemoryStore {
    let mut store = MemoryStore::new();

    let bars = synthetic_bars(symbol, bar_count);
    let last_close = bars.last().and_then(|b| b.close).unwrap_or(100.0);
    let prev_close = bars
        .iter()
        .rev()
        .nth(1)
        .and_then(|b| b.close)
        .unwrap_or(last_close);
    let change = last_close - prev_close;

    store.insert_price_snapshot(PriceSnapshot {
        symbol: symbol.to_string(),
        company_name: Some("Demo Manufacturing Co".to_string()),
        current_price: Some(last_close),
        previous_close: Some(prev_close),
        change: Some(change),
        percent_change: Some(change / prev_close * 100.0),
    });

    let shares: i64 = 48_000_000;
    let market_cap = (last_close * shares as f64) as i64;
    let total_debt: i64 = 1_900_000_000;
    let total_cash: i64 = 800_000_000;
    store.insert_company_snapshot(CompanySnapshot {
        symbol: symbol.to_string(),
        name: Some("Demo Manufacturing Co".to_string()),
        currency: Some("USD".to_string()),
        sector: Some("Industrials".to_string()),
        industry: Some("Specialty Machinery".to_string()),
        current_price: Some(last_close),
        previous_close: Some(prev_close),
        open: Some(prev_close + 0.2),
        day_low: Some(last_close - 0.6),
        day_high: Some(last_close + 0.6),
        volume: Some(1_150_000),
        trailing_eps: Some(2.48),
        forward_eps: Some(2.75),
        trailing_pe: Some(last_close / 2.48),
        forward_pe: Some(last_close / 2.75),
        dividend_rate: Some(1.16),
        dividend_yield: Some(0.0112),
        book_value: Some(50.1),
        price_to_book: Some(last_close / 50.1),
        price_to_sales: Some(3.1),
        market_cap: Some(market_cap),
        enterprise_value: Some(market_cap + total_debt - total_cash),
        beta: Some(1.08),
        trailing_peg_ratio: Some(1.6),
        return_on_equity: Some(0.258),
        return_on_assets: Some(0.094),
        profit_margin: Some(0.148),
        operating_margin: Some(0.214),
        revenue_per_share: Some(87.5),
        revenue_growth: Some(0.136),
        earnings_growth: Some(0.121),
        total_debt: Some(total_debt),
        total_cash: Some(total_cash),
        shares_outstanding: Some(shares),
    });

    // Three annual periods so the two-period ratios resolve and --period
    // has something older to point at.
    for (on, scale) in [
        (date(2024, 12, 31), 1.0),
        (date(2023, 12, 31), 0.88),
        (date(2022, 12, 31), 0.79),
    ] {
        store.insert_balance_sheet(BalanceSheetPeriod {
            symbol: symbol.to_string(),
            date: on,
            total_assets: Some(5_600_000_000.0 * scale),
            total_debt: Some(1_900_000_000.0 * scale),
            stockholders_equity: Some(2_400_000_000.0 * scale),
            cash_and_equivalents: Some(800_000_000.0 * scale),
        });
        store.insert_income_statement(IncomeStatementPeriod {
            symbol: symbol.to_string(),
            date: on,
            total_revenue: Some(4_200_000_000.0 * scale),
            gross_profit: Some(1_600_000_000.0 * scale),
            operating_income: Some(900_000_000.0 * scale),
            net_income: Some(620_000_000.0 * scale),
            basic_eps: Some(2.48 * scale),
            diluted_eps: Some(2.41 * scale),
        });
        store.insert_cash_flow(CashFlowPeriod {
            symbol: symbol.to_string(),
            date: on,
            operating_cash_flow: Some(810_000_000.0 * scale),
            capital_expenditure: Some(-220_000_000.0 * scale),
            free_cash_flow: Some(590_000_000.0 * scale),
            cash_dividends_paid: Some(-150_000_000.0 * scale),
        });
    }

    store.insert_bars(bars);
    store
}
