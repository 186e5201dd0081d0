//! Per-request data access for one symbol: lazy, memoized retrieval of the
//! five raw collections plus daily bars, and flat converted views over
//! each. A context lives for one logical request and is not shared across
//! requests.

use std::cell::OnceCell;

use chrono::NaiveDate;
use metrics_core::num::{safe_f64, safe_from_i64, safe_pct};
use metrics_core::periods::select;
use metrics_core::{
    BalanceSheetPeriod, BalanceSheetView, CashFlowPeriod, CashFlowView, CompanySnapshot,
    CompanyView, DailyBar, IncomeStatementPeriod, IncomeView, PriceSnapshot, PriceView,
    StoreError, SymbolStore,
};

pub mod memory;

pub use memory::MemoryStore;

/// Short-lived accessor for one symbol. Each raw collection is fetched from
/// the store at most once, on first access; the outcome (including a
/// failure) is cached for the lifetime of the context.
pub struct SymbolData<'a, S: SymbolStore> {
    store: &'a S,
    symbol: String,
    price: OnceCell<Result<Option<PriceSnapshot>, StoreError>>,
    company: OnceCell<Result<Option<CompanySnapshot>, StoreError>>,
    balance_sheets: OnceCell<Result<Vec<BalanceSheetPeriod>, StoreError>>,
    income_statements: OnceCell<Result<Vec<IncomeStatementPeriod>, StoreError>>,
    cash_flows: OnceCell<Result<Vec<CashFlowPeriod>, StoreError>>,
    bars: OnceCell<Result<Vec<DailyBar>, StoreError>>,
}

fn cached<'c, T>(
    cell: &'c OnceCell<Result<T, StoreError>>,
    fetch: impl FnOnce() -> Result<T, StoreError>,
) -> Result<&'c T, StoreError> {
    cell.get_or_init(fetch).as_ref().map_err(|e| e.clone())
}

impl<'a, S: SymbolStore> SymbolData<'a, S> {
    pub fn new(store: &'a S, symbol: &str) -> Self {
        Self {
            store,
            symbol: symbol.to_uppercase(),
            price: OnceCell::new(),
            company: OnceCell::new(),
            balance_sheets: OnceCell::new(),
            income_statements: OnceCell::new(),
            cash_flows: OnceCell::new(),
            bars: OnceCell::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn price_snapshot(&self) -> Result<Option<&PriceSnapshot>, StoreError> {
        cached(&self.price, || {
            tracing::debug!("Fetching price snapshot for {}", self.symbol);
            self.store.price_snapshot(&self.symbol)
        })
        .map(|snap| snap.as_ref())
    }

    pub fn company_snapshot(&self) -> Result<Option<&CompanySnapshot>, StoreError> {
        cached(&self.company, || {
            tracing::debug!("Fetching company snapshot for {}", self.symbol);
            self.store.company_snapshot(&self.symbol)
        })
        .map(|snap| snap.as_ref())
    }

    pub fn balance_sheets(&self) -> Result<&[BalanceSheetPeriod], StoreError> {
        cached(&self.balance_sheets, || {
            let rows = self.store.balance_sheets(&self.symbol)?;
            tracing::debug!("Fetched {} balance sheet rows for {}", rows.len(), self.symbol);
            Ok(rows)
        })
        .map(Vec::as_slice)
    }

    pub fn income_statements(&self) -> Result<&[IncomeStatementPeriod], StoreError> {
        cached(&self.income_statements, || {
            let rows = self.store.income_statements(&self.symbol)?;
            tracing::debug!("Fetched {} income statement rows for {}", rows.len(), self.symbol);
            Ok(rows)
        })
        .map(Vec::as_slice)
    }

    pub fn cash_flows(&self) -> Result<&[CashFlowPeriod], StoreError> {
        cached(&self.cash_flows, || {
            let rows = self.store.cash_flows(&self.symbol)?;
            tracing::debug!("Fetched {} cash flow rows for {}", rows.len(), self.symbol);
            Ok(rows)
        })
        .map(Vec::as_slice)
    }

    /// Daily bars sorted most-recent-first, the canonical order every
    /// indicator expects.
    pub fn daily_bars(&self) -> Result<&[DailyBar], StoreError> {
        cached(&self.bars, || {
            let mut bars = self.store.daily_bars(&self.symbol)?;
            bars.sort_by(|a, b| b.date.cmp(&a.date));
            tracing::debug!("Fetched {} daily bars for {}", bars.len(), self.symbol);
            Ok(bars)
        })
        .map(Vec::as_slice)
    }

    /// Most recent `limit` bars, or all of them when no limit is given.
    pub fn recent_bars(&self, limit: Option<usize>) -> Result<&[DailyBar], StoreError> {
        let bars = self.daily_bars()?;
        match limit {
            Some(n) => Ok(&bars[..bars.len().min(n)]),
            None => Ok(bars),
        }
    }

    pub fn price_view(&self) -> Result<PriceView, StoreError> {
        let Some(snap) = self.price_snapshot()? else {
            return Ok(PriceView::default());
        };
        Ok(PriceView {
            company_name: snap.company_name.clone(),
            current_price: safe_f64(snap.current_price),
            previous_close: safe_f64(snap.previous_close),
            change: safe_f64(snap.change),
            percent_change: safe_f64(snap.percent_change),
        })
    }

    pub fn company_view(&self) -> Result<CompanyView, StoreError> {
        let Some(info) = self.company_snapshot()? else {
            return Ok(CompanyView::default());
        };
        Ok(CompanyView {
            name: info.name.clone(),
            currency: info.currency.clone(),
            sector: info.sector.clone(),
            industry: info.industry.clone(),
            current_price: safe_f64(info.current_price),
            previous_close: safe_f64(info.previous_close),
            open: safe_f64(info.open),
            day_low: safe_f64(info.day_low),
            day_high: safe_f64(info.day_high),
            volume: info.volume,
            trailing_eps: safe_f64(info.trailing_eps),
            forward_eps: safe_f64(info.forward_eps),
            trailing_pe: safe_f64(info.trailing_pe),
            forward_pe: safe_f64(info.forward_pe),
            dividend_rate: safe_f64(info.dividend_rate),
            dividend_yield: safe_pct(info.dividend_yield),
            book_value: safe_f64(info.book_value),
            price_to_book: safe_f64(info.price_to_book),
            price_to_sales: safe_f64(info.price_to_sales),
            market_cap: safe_from_i64(info.market_cap),
            enterprise_value: safe_from_i64(info.enterprise_value),
            beta: safe_f64(info.beta),
            trailing_peg_ratio: safe_f64(info.trailing_peg_ratio),
            return_on_equity: safe_pct(info.return_on_equity),
            return_on_assets: safe_pct(info.return_on_assets),
            profit_margin: safe_pct(info.profit_margin),
            operating_margin: safe_pct(info.operating_margin),
            revenue_per_share: safe_f64(info.revenue_per_share),
            revenue_growth: safe_pct(info.revenue_growth),
            earnings_growth: safe_pct(info.earnings_growth),
            total_debt: safe_from_i64(info.total_debt),
            total_cash: safe_from_i64(info.total_cash),
            shares_outstanding: safe_from_i64(info.shares_outstanding),
        })
    }

    /// Balance sheet view for an exact period date, or the latest period
    /// when `period` is `None`. No matching row yields the all-absent view.
    pub fn balance_sheet_view(
        &self,
        period: Option<NaiveDate>,
    ) -> Result<BalanceSheetView, StoreError> {
        let rows = self.balance_sheets()?;
        let Some(row) = select(rows, period) else {
            return Ok(BalanceSheetView::default());
        };
        Ok(BalanceSheetView {
            date: Some(row.date),
            total_assets: safe_f64(row.total_assets),
            total_debt: safe_f64(row.total_debt),
            stockholders_equity: safe_f64(row.stockholders_equity),
            cash_and_equivalents: safe_f64(row.cash_and_equivalents),
        })
    }

    pub fn income_view(&self, period: Option<NaiveDate>) -> Result<IncomeView, StoreError> {
        let rows = self.income_statements()?;
        let Some(row) = select(rows, period) else {
            return Ok(IncomeView::default());
        };
        Ok(IncomeView {
            date: Some(row.date),
            total_revenue: safe_f64(row.total_revenue),
            gross_profit: safe_f64(row.gross_profit),
            operating_income: safe_f64(row.operating_income),
            net_income: safe_f64(row.net_income),
            basic_eps: safe_f64(row.basic_eps),
            diluted_eps: safe_f64(row.diluted_eps),
        })
    }

    pub fn cash_flow_view(&self, period: Option<NaiveDate>) -> Result<CashFlowView, StoreError> {
        let rows = self.cash_flows()?;
        let Some(row) = select(rows, period) else {
            return Ok(CashFlowView::default());
        };
        Ok(CashFlowView {
            date: Some(row.date),
            operating_cash_flow: safe_f64(row.operating_cash_flow),
            capital_expenditure: safe_f64(row.capital_expenditure),
            free_cash_flow: safe_f64(row.free_cash_flow),
            cash_dividends_paid: safe_f64(row.cash_dividends_paid),
        })
    }
}
