//! HashMap-backed store used by tests and the probe binary in place of the
//! persistence collaborator.

use std::collections::HashMap;

use metrics_core::{
    BalanceSheetPeriod, CashFlowPeriod, CompanySnapshot, DailyBar, IncomeStatementPeriod,
    PriceSnapshot, StoreError, SymbolStore,
};

/// In-memory `SymbolStore`. Symbols are uppercased on both write and read;
/// lookups never fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    prices: HashMap<String, PriceSnapshot>,
    companies: HashMap<String, CompanySnapshot>,
    balance_sheets: HashMap<String, Vec<BalanceSheetPeriod>>,
    income_statements: HashMap<String, Vec<IncomeStatementPeriod>>,
    cash_flows: HashMap<String, Vec<CashFlowPeriod>>,
    bars: HashMap<String, Vec<DailyBar>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_price_snapshot(&mut self, snap: PriceSnapshot) {
        self.prices.insert(snap.symbol.to_uppercase(), snap);
    }

    pub fn insert_company_snapshot(&mut self, snap: CompanySnapshot) {
        self.companies.insert(snap.symbol.to_uppercase(), snap);
    }

    pub fn insert_balance_sheet(&mut self, row: BalanceSheetPeriod) {
        self.balance_sheets
            .entry(row.symbol.to_uppercase())
            .or_default()
            .push(row);
    }

    pub fn insert_income_statement(&mut self, row: IncomeStatementPeriod) {
        self.income_statements
            .entry(row.symbol.to_uppercase())
            .or_default()
            .push(row);
    }

    pub fn insert_cash_flow(&mut self, row: CashFlowPeriod) {
        self.cash_flows
            .entry(row.symbol.to_uppercase())
            .or_default()
            .push(row);
    }

    pub fn insert_bar(&mut self, bar: DailyBar) {
        self.bars.entry(bar.symbol.to_uppercase()).or_default().push(bar);
    }

    pub fn insert_bars(&mut self, bars: Vec<DailyBar>) {
        for bar in bars {
            self.insert_bar(bar);
        }
    }
}

impl SymbolStore for MemoryStore {
    fn price_snapshot(&self, symbol: &str) -> Result<Option<PriceSnapshot>, StoreError> {
        Ok(self.prices.get(&symbol.to_uppercase()).cloned())
    }

    fn company_snapshot(&self, symbol: &str) -> Result<Option<CompanySnapshot>, StoreError> {
        Ok(self.companies.get(&symbol.to_uppercase()).cloned())
    }

    fn balance_sheets(&self, symbol: &str) -> Result<Vec<BalanceSheetPeriod>, StoreError> {
        Ok(self
            .balance_sheets
            .get(&symbol.to_uppercase())
            .cloned()
            .unwrap_or_default())
    }

    fn income_statements(&self, symbol: &str) -> Result<Vec<IncomeStatementPeriod>, StoreError> {
        Ok(self
            .income_statements
            .get(&symbol.to_uppercase())
            .cloned()
            .unwrap_or_default())
    }

    fn cash_flows(&self, symbol: &str) -> Result<Vec<CashFlowPeriod>, StoreError> {
        Ok(self.cash_flows.get(&symbol.to_uppercase()).cloned().unwrap_or_default())
    }

    fn daily_bars(&self, symbol: &str) -> Result<Vec<DailyBar>, StoreError> {
        Ok(self.bars.get(&symbol.to_uppercase()).cloned().unwrap_or_default())
    }
}
