//! Composition layer over the calculators: one call per symbol assembles
//! every derived metric into a fixed categorized shape for presentation.
//! No computation of its own.

use chrono::NaiveDate;
use fundamental_metrics::RatioEngine;
use metrics_core::{BalanceSheetView, CashFlowView, IncomeView, PriceView, StoreError, SymbolStore};
use serde::{Deserialize, Serialize};
use symbol_data::SymbolData;
use technical_metrics::{technical_snapshot, TechnicalSnapshot};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationRatios {
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub trailing_peg_ratio: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub earnings_yield: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EarningsData {
    pub trailing_eps: Option<f64>,
    pub forward_eps: Option<f64>,
    pub revenue_per_share: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityRatios {
    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub gross_margin: Option<f64>,
    pub asset_turnover: Option<f64>,
    pub equity_multiplier: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStrength {
    pub total_debt: Option<f64>,
    pub total_cash: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub debt_ratio: Option<f64>,
    pub beta: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DividendData {
    pub dividend_rate: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthRates {
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
}

/// The three statement views resolved for the requested period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub balance_sheet: BalanceSheetView,
    pub income_statement: IncomeView,
    pub cash_flow: CashFlowView,
}

/// Everything the engine derives for one symbol, grouped by category.
/// Absent data leaves fields null; the shape itself never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedMetrics {
    pub symbol: String,
    pub period: Option<NaiveDate>,
    pub price_data: PriceView,
    pub company_info: CompanyInfo,
    pub valuation_ratios: ValuationRatios,
    pub earnings_data: EarningsData,
    pub profitability_ratios: ProfitabilityRatios,
    pub financial_strength: FinancialStrength,
    pub dividend_data: DividendData,
    pub growth_rates: GrowthRates,
    pub technical_indicators: TechnicalSnapshot,
    pub financial_statements: FinancialStatements,
}

/// Facade owning the backing store. Every request gets a fresh per-symbol
/// data context, so nothing carries over between calls.
pub struct MetricsEngine<S: SymbolStore> {
    store: S,
}

impl<S: SymbolStore> MetricsEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Derive the full categorized result for one symbol. Statement-scoped
    /// ratios and views resolve against `period`, or the latest reporting
    /// period when it is `None`.
    pub fn categorized(
        &self,
        symbol: &str,
        period: Option<NaiveDate>,
    ) -> Result<CategorizedMetrics, StoreError> {
        let data = SymbolData::new(&self.store, symbol);
        tracing::info!("Deriving categorized metrics for {}", data.symbol());

        let ratios = RatioEngine::new(&data).all_ratios(period)?;
        let price_data = data.price_view()?;
        let company = data.company_view()?;
        let bars = data.daily_bars()?;
        let technical_indicators = technical_snapshot(bars);

        tracing::info!("Derived metrics for {} from {} bars", data.symbol(), bars.len());

        Ok(CategorizedMetrics {
            symbol: data.symbol().to_string(),
            period,
            price_data,
            company_info: CompanyInfo {
                name: company.name,
                sector: company.sector,
                industry: company.industry,
                currency: company.currency,
                market_cap: company.market_cap,
                shares_outstanding: company.shares_outstanding,
            },
            valuation_ratios: ValuationRatios {
                trailing_pe: company.trailing_pe,
                forward_pe: company.forward_pe,
                price_to_book: company.price_to_book,
                price_to_sales: company.price_to_sales,
                trailing_peg_ratio: company.trailing_peg_ratio,
                enterprise_value: company.enterprise_value,
                earnings_yield: ratios.earnings_yield,
            },
            earnings_data: EarningsData {
                trailing_eps: company.trailing_eps,
                forward_eps: company.forward_eps,
                revenue_per_share: company.revenue_per_share,
            },
            profitability_ratios: ProfitabilityRatios {
                profit_margin: company.profit_margin,
                operating_margin: company.operating_margin,
                return_on_equity: company.return_on_equity,
                return_on_assets: company.return_on_assets,
                gross_margin: ratios.gross_margin,
                asset_turnover: ratios.asset_turnover,
                equity_multiplier: ratios.equity_multiplier,
            },
            financial_strength: FinancialStrength {
                total_debt: company.total_debt,
                total_cash: company.total_cash,
                debt_to_equity: ratios.debt_to_equity,
                debt_ratio: ratios.debt_ratio,
                beta: company.beta,
            },
            dividend_data: DividendData {
                dividend_rate: company.dividend_rate,
                dividend_yield: company.dividend_yield,
                payout_ratio: ratios.payout_ratio,
            },
            growth_rates: GrowthRates {
                revenue_growth: company.revenue_growth,
                earnings_growth: company.earnings_growth,
            },
            technical_indicators,
            financial_statements: FinancialStatements {
                balance_sheet: data.balance_sheet_view(period)?,
                income_statement: data.income_view(period)?,
                cash_flow: data.cash_flow_view(period)?,
            },
        })
    }
}
