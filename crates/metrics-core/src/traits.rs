use crate::error::StoreError;
use crate::types::{
    BalanceSheetPeriod, CashFlowPeriod, CompanySnapshot, DailyBar, IncomeStatementPeriod,
    PriceSnapshot,
};

/// Read seam to the persistence collaborator. One method per raw
/// collection; implementations answer unknown symbols with empty
/// collections, reserving `Err` for backend failure.
pub trait SymbolStore {
    fn price_snapshot(&self, symbol: &str) -> Result<Option<PriceSnapshot>, StoreError>;
    fn company_snapshot(&self, symbol: &str) -> Result<Option<CompanySnapshot>, StoreError>;
    fn balance_sheets(&self, symbol: &str) -> Result<Vec<BalanceSheetPeriod>, StoreError>;
    fn income_statements(&self, symbol: &str) -> Result<Vec<IncomeStatementPeriod>, StoreError>;
    fn cash_flows(&self, symbol: &str) -> Result<Vec<CashFlowPeriod>, StoreError>;
    fn daily_bars(&self, symbol: &str) -> Result<Vec<DailyBar>, StoreError>;
}
