//! Data models for the Payroll Engine.
//!
//! The `models` module defines the serialisable inputs and outputs of
//! every calculator.  They are plain value types: created from a form
//! or a JSON request, handed to a calculation, and discarded once the
//! result has been rendered.  Field names are camelCase on the wire so
//! that browser clients can post their form state unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Statutory wage region.  Each region has its own minimum wage,
/// which floors and caps the insurance contribution base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WageRegion {
    I,
    II,
    III,
    IV,
}

impl WageRegion {
    pub const ALL: [WageRegion; 4] =
        [WageRegion::I, WageRegion::II, WageRegion::III, WageRegion::IV];
}

/// Input to the gross-to-net calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollInput {
    /// Monthly salary before any deduction.
    pub gross_salary: Decimal,
    /// Number of registered dependents.
    #[serde(default)]
    pub dependent_count: u32,
    pub region: WageRegion,
    /// Salary declared for insurance purposes.  When absent the gross
    /// salary is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_base: Option<Decimal>,
}

/// Employee-side insurance contributions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributions {
    pub social: Decimal,
    pub health: Decimal,
    pub unemployment: Decimal,
}

impl Contributions {
    pub fn total(&self) -> Decimal {
        self.social + self.health + self.unemployment
    }
}

/// Contributions paid by the employer on top of the gross salary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerCost {
    pub social_insurance: Decimal,
    pub health_insurance: Decimal,
    pub unemployment_insurance: Decimal,
    /// Gross salary plus every employer contribution.
    pub total_cost: Decimal,
}

/// Result of a gross-to-net calculation.
///
/// `net = gross - socialInsurance - healthInsurance -
/// unemploymentInsurance - tax` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollResult {
    pub gross: Decimal,
    pub insurance_base_used: Decimal,
    pub social_insurance: Decimal,
    pub health_insurance: Decimal,
    pub unemployment_insurance: Decimal,
    pub personal_deduction: Decimal,
    pub dependent_deduction: Decimal,
    pub taxable_income: Decimal,
    pub tax: Decimal,
    /// Zero-based index of the tax bracket applied; `None` when there
    /// is no taxable income.
    pub tax_bracket: Option<usize>,
    pub net: Decimal,
    pub employer: EmployerCost,
}

impl PayrollResult {
    pub fn total_insurance(&self) -> Decimal {
        self.social_insurance + self.health_insurance + self.unemployment_insurance
    }
}

/// Input to the net-to-gross search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetToGrossInput {
    pub target_net: Decimal,
    #[serde(default)]
    pub dependent_count: u32,
    pub region: WageRegion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_base: Option<Decimal>,
}

/// How often contributions are made (and interest compounded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionFrequency {
    Yearly,
    Quarterly,
    Monthly,
}

impl ContributionFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            ContributionFrequency::Yearly => 1,
            ContributionFrequency::Quarterly => 4,
            ContributionFrequency::Monthly => 12,
        }
    }
}

/// Input to the compound growth projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureValueInput {
    pub principal: Decimal,
    /// Amount added at the end of every period.
    #[serde(default)]
    pub contribution: Decimal,
    pub annual_rate_percent: Decimal,
    pub years: u32,
    pub frequency: ContributionFrequency,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureValueResult {
    pub future_value: Decimal,
    pub total_contributed: Decimal,
    pub interest_earned: Decimal,
}

/// Input to the savings plan: how much must be set aside each period
/// to reach `target_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalInput {
    pub target_amount: Decimal,
    #[serde(default)]
    pub initial_amount: Decimal,
    pub years: u32,
    pub annual_rate_percent: Decimal,
    pub contribution_frequency: ContributionFrequency,
}

/// Balance at the end of one year of a savings plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearBalance {
    pub year: u32,
    pub balance: Decimal,
    pub cumulative_contribution: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlanResult {
    pub required_periodic_payment: Decimal,
    pub year_by_year_breakdown: Vec<YearBalance>,
}

/// Which salary ceiling caps the insurable salary for unemployment
/// benefits: the state base salary (public sector) or the regional
/// minimum wage (private sector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SalarySchedule {
    StateBased,
    RegionBased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnemploymentInput {
    /// Average monthly insured salary over the last six months.
    pub six_month_average_salary: Decimal,
    pub contribution_months: u32,
    pub salary_schedule: SalarySchedule,
    pub region: WageRegion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnemploymentResult {
    pub monthly_allowance: Decimal,
    pub benefit_months: u32,
    pub applied_salary: Decimal,
    pub max_insurable_salary: Decimal,
    pub total_allowance: Decimal,
}

/// One employee in a payroll batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEmployee {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub payroll: PayrollInput,
}

/// A set of employees paid together for one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollBatch {
    /// Free-form period label, e.g. `"2026-07"`.
    #[serde(default)]
    pub period: Option<String>,
    pub employees: Vec<BatchEmployee>,
}

/// Outcome for one employee of a batch: either `result` or `error`
/// is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchLine {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PayrollResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTotals {
    pub gross: Decimal,
    pub employee_insurance: Decimal,
    pub tax: Decimal,
    pub net: Decimal,
    pub employer_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub period: Option<String>,
    pub regime: String,
    pub lines: Vec<BatchLine>,
    pub totals: BatchTotals,
}
