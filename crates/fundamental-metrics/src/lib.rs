//! Fundamental ratios over one symbol's financial statements and company
//! snapshot. Every ratio resolves its inputs for an explicit period date or
//! the latest available period, and comes back absent rather than failing
//! when a field is missing or a denominator is zero.

use chrono::NaiveDate;
use metrics_core::num::{safe_div, safe_f64};
use metrics_core::periods::{previous, select};
use metrics_core::{StoreError, SymbolStore};
use serde::{Deserialize, Serialize};
use symbol_data::SymbolData;

/// All fundamental ratios for one symbol and period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    pub debt_to_equity: Option<f64>,
    pub debt_ratio: Option<f64>,
    pub gross_margin: Option<f64>,
    pub earnings_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub asset_turnover: Option<f64>,
    pub equity_multiplier: Option<f64>,
}

fn average(current: Option<f64>, prior: Option<f64>) -> Option<f64> {
    match (safe_f64(current), safe_f64(prior)) {
        (Some(a), Some(b)) => Some((a + b) / 2.0),
        _ => None,
    }
}

/// Ratio calculator borrowing a per-request data context. `Err` means the
/// backing store failed; `Ok(None)` means the ratio is not computable from
/// the data on hand.
pub struct RatioEngine<'a, S: SymbolStore> {
    data: &'a SymbolData<'a, S>,
}

impl<'a, S: SymbolStore> RatioEngine<'a, S> {
    pub fn new(data: &'a SymbolData<'a, S>) -> Self {
        Self { data }
    }

    pub fn debt_to_equity(&self, period: Option<NaiveDate>) -> Result<Option<f64>, StoreError> {
        let sheet = self.data.balance_sheet_view(period)?;
        Ok(safe_div(sheet.total_debt, sheet.stockholders_equity))
    }

    pub fn debt_ratio(&self, period: Option<NaiveDate>) -> Result<Option<f64>, StoreError> {
        let sheet = self.data.balance_sheet_view(period)?;
        Ok(safe_div(sheet.total_debt, sheet.total_assets))
    }

    pub fn gross_margin(&self, period: Option<NaiveDate>) -> Result<Option<f64>, StoreError> {
        let income = self.data.income_view(period)?;
        Ok(safe_div(income.gross_profit, income.total_revenue).map(|v| v * 100.0))
    }

    /// Inverse of the trailing P/E as a percentage. Non-positive P/E has no
    /// meaningful yield and comes back absent.
    pub fn earnings_yield(&self) -> Result<Option<f64>, StoreError> {
        let Some(info) = self.data.company_snapshot()? else {
            return Ok(None);
        };
        Ok(safe_f64(info.trailing_pe)
            .filter(|pe| *pe > 0.0)
            .map(|pe| 100.0 / pe))
    }

    /// Dividends paid (as a magnitude, the statement reports an outflow)
    /// over net income for the period, as a percentage.
    pub fn payout_ratio(&self, period: Option<NaiveDate>) -> Result<Option<f64>, StoreError> {
        let dividends = self.data.cash_flow_view(period)?.cash_dividends_paid;
        let net_income = self.data.income_view(period)?.net_income;
        Ok(safe_div(dividends.map(f64::abs), net_income).map(|v| v * 100.0))
    }

    /// Revenue for the period over average total assets across that period
    /// and the one before it. Needs two distinct balance sheet periods.
    pub fn asset_turnover(&self, period: Option<NaiveDate>) -> Result<Option<f64>, StoreError> {
        let sheets = self.data.balance_sheets()?;
        let Some(current) = select(sheets, period) else {
            return Ok(None);
        };
        let Some(prior) = previous(sheets, current.date) else {
            return Ok(None);
        };
        let avg_assets = average(current.total_assets, prior.total_assets);
        let revenue = self.data.income_view(period)?.total_revenue;
        Ok(safe_div(revenue, avg_assets))
    }

    /// Average total assets over average stockholders' equity, both taken
    /// across the period and the one before it.
    pub fn equity_multiplier(&self, period: Option<NaiveDate>) -> Result<Option<f64>, StoreError> {
        let sheets = self.data.balance_sheets()?;
        let Some(current) = select(sheets, period) else {
            return Ok(None);
        };
        let Some(prior) = previous(sheets, current.date) else {
            return Ok(None);
        };
        let avg_assets = average(current.total_assets, prior.total_assets);
        let avg_equity = average(current.stockholders_equity, prior.stockholders_equity);
        Ok(safe_div(avg_assets, avg_equity))
    }

    /// Every ratio for one period in a single pass. The underlying fetches
    /// are memoized, so this costs one store round trip per collection.
    pub fn all_ratios(&self, period: Option<NaiveDate>) -> Result<RatioSet, StoreError> {
        Ok(RatioSet {
            debt_to_equity: self.debt_to_equity(period)?,
            debt_ratio: self.debt_ratio(period)?,
            gross_margin: self.gross_margin(period)?,
            earnings_yield: self.earnings_yield()?,
            payout_ratio: self.payout_ratio(period)?,
            asset_turnover: self.asset_turnover(period)?,
            equity_multiplier: self.equity_multiplier(period)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_core::{
        BalanceSheetPeriod, CashFlowPeriod, CompanySnapshot, IncomeStatementPeriod,
    };
    use symbol_data::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sheet(
        on: NaiveDate,
        assets: Option<f64>,
        debt: Option<f64>,
        equity: Option<f64>,
    ) -> BalanceSheetPeriod {
        BalanceSheetPeriod {
            symbol: "TEST".to_string(),
            date: on,
            total_assets: assets,
            total_debt: debt,
            stockholders_equity: equity,
            cash_and_equivalents: None,
        }
    }

    fn income(
        on: NaiveDate,
        revenue: Option<f64>,
        gross: Option<f64>,
        net: Option<f64>,
    ) -> IncomeStatementPeriod {
        IncomeStatementPeriod {
            symbol: "TEST".to_string(),
            date: on,
            total_revenue: revenue,
            gross_profit: gross,
            operating_income: None,
            net_income: net,
            basic_eps: None,
            diluted_eps: None,
        }
    }

    fn flow(on: NaiveDate, dividends: Option<f64>) -> CashFlowPeriod {
        CashFlowPeriod {
            symbol: "TEST".to_string(),
            date: on,
            operating_cash_flow: None,
            capital_expenditure: None,
            free_cash_flow: None,
            cash_dividends_paid: dividends,
        }
    }

    #[test]
    fn debt_to_equity_from_latest_sheet() {
        let mut store = MemoryStore::new();
        store.insert_balance_sheet(sheet(
            date(2024, 12, 31),
            Some(200_000.0),
            Some(100_000.0),
            Some(50_000.0),
        ));
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        assert_eq!(engine.debt_to_equity(None).unwrap(), Some(2.0));
    }

    #[test]
    fn debt_to_equity_absent_without_equity() {
        let mut store = MemoryStore::new();
        store.insert_balance_sheet(sheet(date(2024, 12, 31), Some(200_000.0), Some(100_000.0), None));
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        assert_eq!(engine.debt_to_equity(None).unwrap(), None);
    }

    #[test]
    fn debt_ratio_round_trips_against_assets() {
        let mut store = MemoryStore::new();
        store.insert_balance_sheet(sheet(
            date(2024, 12, 31),
            Some(200_000.0),
            Some(75_000.0),
            Some(50_000.0),
        ));
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        let ratio = engine.debt_ratio(None).unwrap().unwrap();
        assert!((ratio * 200_000.0 - 75_000.0).abs() < 1e-6);
    }

    #[test]
    fn gross_margin_is_a_percentage() {
        let mut store = MemoryStore::new();
        store.insert_income_statement(income(
            date(2024, 12, 31),
            Some(100_000.0),
            Some(25_000.0),
            Some(10_000.0),
        ));
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        assert_eq!(engine.gross_margin(None).unwrap(), Some(25.0));
    }

    #[test]
    fn gross_margin_absent_on_zero_revenue() {
        let mut store = MemoryStore::new();
        store.insert_income_statement(income(date(2024, 12, 31), Some(0.0), Some(25_000.0), None));
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        assert_eq!(engine.gross_margin(None).unwrap(), None);
    }

    #[test]
    fn earnings_yield_inverts_positive_pe() {
        let mut store = MemoryStore::new();
        store.insert_company_snapshot(CompanySnapshot {
            symbol: "TEST".to_string(),
            trailing_pe: Some(25.0),
            ..Default::default()
        });
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        assert_eq!(engine.earnings_yield().unwrap(), Some(4.0));
    }

    #[test]
    fn earnings_yield_rejects_non_positive_pe() {
        let mut store = MemoryStore::new();
        store.insert_company_snapshot(CompanySnapshot {
            symbol: "TEST".to_string(),
            trailing_pe: Some(-5.0),
            ..Default::default()
        });
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);
        assert_eq!(engine.earnings_yield().unwrap(), None);

        let empty = MemoryStore::new();
        let data = SymbolData::new(&empty, "TEST");
        let engine = RatioEngine::new(&data);
        assert_eq!(engine.earnings_yield().unwrap(), None);
    }

    #[test]
    fn payout_ratio_uses_dividend_magnitude() {
        let mut store = MemoryStore::new();
        store.insert_cash_flow(flow(date(2024, 12, 31), Some(-2_500.0)));
        store.insert_income_statement(income(
            date(2024, 12, 31),
            Some(100_000.0),
            None,
            Some(10_000.0),
        ));
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        assert_eq!(engine.payout_ratio(None).unwrap(), Some(25.0));
    }

    #[test]
    fn payout_ratio_absent_on_zero_net_income() {
        let mut store = MemoryStore::new();
        store.insert_cash_flow(flow(date(2024, 12, 31), Some(-500.0)));
        store.insert_income_statement(income(date(2024, 12, 31), None, None, Some(0.0)));
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        assert_eq!(engine.payout_ratio(None).unwrap(), None);
    }

    #[test]
    fn asset_turnover_needs_a_prior_period() {
        let mut store = MemoryStore::new();
        store.insert_balance_sheet(sheet(
            date(2024, 12, 31),
            Some(120_000.0),
            None,
            Some(60_000.0),
        ));
        store.insert_income_statement(income(date(2024, 12, 31), Some(150_000.0), None, None));
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        assert_eq!(engine.asset_turnover(None).unwrap(), None);
    }

    #[test]
    fn asset_turnover_averages_assets() {
        let mut store = MemoryStore::new();
        store.insert_balance_sheet(sheet(
            date(2024, 12, 31),
            Some(120_000.0),
            None,
            Some(60_000.0),
        ));
        store.insert_balance_sheet(sheet(
            date(2023, 12, 31),
            Some(80_000.0),
            None,
            Some(40_000.0),
        ));
        store.insert_income_statement(income(date(2024, 12, 31), Some(150_000.0), None, None));
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        // 150_000 / avg(120_000, 80_000)
        assert_eq!(engine.asset_turnover(None).unwrap(), Some(1.5));
    }

    #[test]
    fn equity_multiplier_averages_both_legs() {
        let mut store = MemoryStore::new();
        store.insert_balance_sheet(sheet(
            date(2024, 12, 31),
            Some(120_000.0),
            None,
            Some(60_000.0),
        ));
        store.insert_balance_sheet(sheet(
            date(2023, 12, 31),
            Some(80_000.0),
            None,
            Some(40_000.0),
        ));
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        // avg(120_000, 80_000) / avg(60_000, 40_000)
        assert_eq!(engine.equity_multiplier(None).unwrap(), Some(2.0));
    }

    #[test]
    fn explicit_period_pins_every_statement() {
        let mut store = MemoryStore::new();
        store.insert_balance_sheet(sheet(
            date(2024, 12, 31),
            None,
            Some(100_000.0),
            Some(50_000.0),
        ));
        store.insert_balance_sheet(sheet(
            date(2023, 12, 31),
            None,
            Some(30_000.0),
            Some(60_000.0),
        ));
        store.insert_income_statement(income(
            date(2024, 12, 31),
            Some(100_000.0),
            Some(25_000.0),
            None,
        ));
        store.insert_income_statement(income(
            date(2023, 12, 31),
            Some(100_000.0),
            Some(75_000.0),
            None,
        ));
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        let older = Some(date(2023, 12, 31));
        assert_eq!(engine.debt_to_equity(older).unwrap(), Some(0.5));
        assert_eq!(engine.gross_margin(older).unwrap(), Some(75.0));

        // A date that matches no reporting period resolves nothing.
        let missing = Some(date(2024, 6, 30));
        assert_eq!(engine.debt_to_equity(missing).unwrap(), None);
    }

    #[test]
    fn all_ratios_fills_every_field() {
        let mut store = MemoryStore::new();
        store.insert_balance_sheet(sheet(
            date(2024, 12, 31),
            Some(120_000.0),
            Some(100_000.0),
            Some(60_000.0),
        ));
        store.insert_balance_sheet(sheet(
            date(2023, 12, 31),
            Some(80_000.0),
            Some(30_000.0),
            Some(40_000.0),
        ));
        store.insert_income_statement(income(
            date(2024, 12, 31),
            Some(150_000.0),
            Some(37_500.0),
            Some(10_000.0),
        ));
        store.insert_cash_flow(flow(date(2024, 12, 31), Some(-2_500.0)));
        store.insert_company_snapshot(CompanySnapshot {
            symbol: "TEST".to_string(),
            trailing_pe: Some(25.0),
            ..Default::default()
        });
        let data = SymbolData::new(&store, "TEST");
        let engine = RatioEngine::new(&data);

        let ratios = engine.all_ratios(None).unwrap();
        assert!(ratios.debt_to_equity.is_some());
        assert!(ratios.debt_ratio.is_some());
        assert_eq!(ratios.gross_margin, Some(25.0));
        assert_eq!(ratios.earnings_yield, Some(4.0));
        assert_eq!(ratios.payout_ratio, Some(25.0));
        assert_eq!(ratios.asset_turnover, Some(1.5));
        assert_eq!(ratios.equity_multiplier, Some(2.0));
    }

    #[test]
    fn all_ratios_is_default_for_unknown_symbol() {
        let store = MemoryStore::new();
        let data = SymbolData::new(&store, "NOPE");
        let engine = RatioEngine::new(&data);

        assert_eq!(engine.all_ratios(None).unwrap(), RatioSet::default());
    }
}
