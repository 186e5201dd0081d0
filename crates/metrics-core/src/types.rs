use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV observation for a symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
}

/// Balance sheet row for one reporting period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetPeriod {
    pub symbol: String,
    pub date: NaiveDate,
    pub total_assets: Option<f64>,
    pub total_debt: Option<f64>,
    pub stockholders_equity: Option<f64>,
    pub cash_and_equivalents: Option<f64>,
}

/// Income statement row for one reporting period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementPeriod {
    pub symbol: String,
    pub date: NaiveDate,
    pub total_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub basic_eps: Option<f64>,
    pub diluted_eps: Option<f64>,
}

/// Cash flow row for one reporting period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowPeriod {
    pub symbol: String,
    pub date: NaiveDate,
    pub operating_cash_flow: Option<f64>,
    pub capital_expenditure: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub cash_dividends_paid: Option<f64>,
}

/// Point-in-time company and valuation snapshot; at most one per symbol.
/// Count-like fields stay integral here and are widened in the view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub symbol: String,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub day_low: Option<f64>,
    pub day_high: Option<f64>,
    pub volume: Option<i64>,
    pub trailing_eps: Option<f64>,
    pub forward_eps: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub dividend_rate: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub book_value: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub market_cap: Option<i64>,
    pub enterprise_value: Option<i64>,
    pub beta: Option<f64>,
    pub trailing_peg_ratio: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub revenue_per_share: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub total_debt: Option<i64>,
    pub total_cash: Option<i64>,
    pub shares_outstanding: Option<i64>,
}

/// Latest quote snapshot, refreshed by the ingestion collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub symbol: String,
    pub company_name: Option<String>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub change: Option<f64>,
    pub percent_change: Option<f64>,
}

/// Flat projection of the latest quote snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceView {
    pub company_name: Option<String>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub change: Option<f64>,
    pub percent_change: Option<f64>,
}

/// Flat projection of the company snapshot. Fractional fields
/// (margins, yields, growth) are scaled to percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyView {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub day_low: Option<f64>,
    pub day_high: Option<f64>,
    pub volume: Option<i64>,
    pub trailing_eps: Option<f64>,
    pub forward_eps: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub dividend_rate: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub book_value: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub market_cap: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub beta: Option<f64>,
    pub trailing_peg_ratio: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub revenue_per_share: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub total_debt: Option<f64>,
    pub total_cash: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

/// Balance sheet fields for one resolved period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetView {
    pub date: Option<NaiveDate>,
    pub total_assets: Option<f64>,
    pub total_debt: Option<f64>,
    pub stockholders_equity: Option<f64>,
    pub cash_and_equivalents: Option<f64>,
}

/// Income statement fields for one resolved period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeView {
    pub date: Option<NaiveDate>,
    pub total_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub basic_eps: Option<f64>,
    pub diluted_eps: Option<f64>,
}

/// Cash flow fields for one resolved period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowView {
    pub date: Option<NaiveDate>,
    pub operating_cash_flow: Option<f64>,
    pub capital_expenditure: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub cash_dividends_paid: Option<f64>,
}
