//! Versioned statutory tables.
//!
//! A [`Statute`] gathers every regime-dependent constant the
//! calculators read: regional minimum wages, the state base salary,
//! family deductions, contribution rates and the tax brackets.  Two
//! statutes are built in; more can be loaded from JSON files so that a
//! new decree does not need a rebuild.

use crate::error::CalcError;
use crate::models::WageRegion;
use crate::tax::{standard_brackets, validate_brackets, TaxBracket};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Monthly minimum wage of each wage region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalMinimumWage {
    #[serde(rename = "I")]
    pub region_i: Decimal,
    #[serde(rename = "II")]
    pub region_ii: Decimal,
    #[serde(rename = "III")]
    pub region_iii: Decimal,
    #[serde(rename = "IV")]
    pub region_iv: Decimal,
}

impl RegionalMinimumWage {
    pub fn get(&self, region: WageRegion) -> Decimal {
        match region {
            WageRegion::I => self.region_i,
            WageRegion::II => self.region_ii,
            WageRegion::III => self.region_iii,
            WageRegion::IV => self.region_iv,
        }
    }
}

/// Social, health and unemployment insurance rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionRates {
    pub social: Decimal,
    pub health: Decimal,
    pub unemployment: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statute {
    /// Regime name, e.g. `"2024"`.
    pub version: String,
    pub regional_minimum_wage: RegionalMinimumWage,
    /// State base salary used for public-sector caps.
    pub base_salary: Decimal,
    pub personal_deduction: Decimal,
    pub dependent_deduction: Decimal,
    /// Insurable salary is capped at this multiple of the minimum wage.
    pub insurance_cap_multiplier: Decimal,
    pub employee_rates: ContributionRates,
    pub employer_rates: ContributionRates,
    pub brackets: Vec<TaxBracket>,
}

fn employee_rates() -> ContributionRates {
    ContributionRates { social: dec!(0.08), health: dec!(0.015), unemployment: dec!(0.01) }
}

/// Employer social insurance includes the occupational accident fund.
fn employer_rates() -> ContributionRates {
    ContributionRates { social: dec!(0.175), health: dec!(0.03), unemployment: dec!(0.01) }
}

impl Statute {
    /// Rules in force until the end of 2025.
    pub fn vn_2024() -> Self {
        Statute {
            version: "2024".to_string(),
            regional_minimum_wage: RegionalMinimumWage {
                region_i: dec!(4960000),
                region_ii: dec!(4410000),
                region_iii: dec!(3860000),
                region_iv: dec!(3450000),
            },
            base_salary: dec!(2340000),
            personal_deduction: dec!(11000000),
            dependent_deduction: dec!(4400000),
            insurance_cap_multiplier: dec!(20),
            employee_rates: employee_rates(),
            employer_rates: employer_rates(),
            brackets: standard_brackets(),
        }
    }

    /// Rules from 2026 onwards: higher minimum wages and family
    /// deductions.
    pub fn vn_2026() -> Self {
        Statute {
            version: "2026".to_string(),
            regional_minimum_wage: RegionalMinimumWage {
                region_i: dec!(5310000),
                region_ii: dec!(4730000),
                region_iii: dec!(4140000),
                region_iv: dec!(3700000),
            },
            personal_deduction: dec!(15500000),
            dependent_deduction: dec!(6200000),
            ..Statute::vn_2024()
        }
    }

    pub fn minimum_wage(&self, region: WageRegion) -> Decimal {
        self.regional_minimum_wage.get(region)
    }

    pub fn validate(&self) -> Result<(), CalcError> {
        if self.version.trim().is_empty() {
            return Err(CalcError::InvalidStatute("version is empty".into()));
        }
        for region in WageRegion::ALL {
            if self.minimum_wage(region) <= Decimal::ZERO {
                return Err(CalcError::InvalidStatute(format!(
                    "{}: minimum wage for region {region:?} must be positive",
                    self.version
                )));
            }
        }
        let amounts = [
            ("baseSalary", self.base_salary),
            ("personalDeduction", self.personal_deduction),
            ("dependentDeduction", self.dependent_deduction),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                let message = format!("{}: {field} is negative", self.version);
                return Err(CalcError::InvalidStatute(message));
            }
        }
        if self.insurance_cap_multiplier < Decimal::ONE {
            return Err(CalcError::InvalidStatute(format!(
                "{}: insuranceCapMultiplier must be at least 1",
                self.version
            )));
        }
        for rates in [self.employee_rates, self.employer_rates] {
            for rate in [rates.social, rates.health, rates.unemployment] {
                if rate < Decimal::ZERO || rate > Decimal::ONE {
                    return Err(CalcError::InvalidStatute(format!(
                        "{}: contribution rate {rate} outside [0, 1]",
                        self.version
                    )));
                }
            }
        }
        validate_brackets(&self.brackets)
            .map_err(|err| CalcError::InvalidStatute(format!("{}: {err}", self.version)))
    }
}

/// Every statute known to the engine, keyed by version.
#[derive(Debug, Clone)]
pub struct StatuteBook {
    statutes: BTreeMap<String, Statute>,
    default_version: String,
}

impl StatuteBook {
    /// The built-in statutes, defaulting to the most recent one.
    pub fn builtin() -> Self {
        let mut statutes = BTreeMap::new();
        for statute in [Statute::vn_2024(), Statute::vn_2026()] {
            statutes.insert(statute.version.clone(), statute);
        }
        StatuteBook { statutes, default_version: "2026".to_string() }
    }

    /// Adds or replaces a statute after validating it.
    pub fn insert(&mut self, statute: Statute) -> Result<(), CalcError> {
        statute.validate()?;
        self.statutes.insert(statute.version.clone(), statute);
        Ok(())
    }

    pub fn set_default(&mut self, version: &str) -> Result<(), CalcError> {
        if !self.statutes.contains_key(version) {
            return Err(CalcError::UnknownRegime(version.to_string()));
        }
        self.default_version = version.to_string();
        Ok(())
    }

    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    pub fn versions(&self) -> Vec<String> {
        self.statutes.keys().cloned().collect()
    }

    /// Looks up `version`, or the default statute when `None`.
    pub fn get(&self, version: Option<&str>) -> Result<&Statute, CalcError> {
        let version = version.unwrap_or(self.default_version.as_str());
        self.statutes
            .get(version)
            .ok_or_else(|| CalcError::UnknownRegime(version.to_string()))
    }
}

impl Default for StatuteBook {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load all statute definitions from a directory.
///
/// Every `.json` file is parsed as a [`Statute`].  Files that fail to
/// parse or validate are skipped with a warning.  A missing directory
/// yields an empty list.
pub fn load_statutes_from_dir(path: &Path) -> Result<Vec<Statute>> {
    let mut statutes = Vec::new();
    if !path.is_dir() {
        debug!(dir = %path.display(), "statute directory not found");
        return Ok(statutes);
    }
    let entries = std::fs::read_dir(path).with_context(|| format!("reading {}", path.display()))?;
    for entry in entries {
        let entry = entry?;
        let file = entry.path();
        if !entry.file_type()?.is_file() || file.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let data = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        let statute = match serde_json::from_str::<Statute>(&data) {
            Ok(statute) => statute,
            Err(err) => {
                warn!(file = %file.display(), error = %err, "failed to parse statute");
                continue;
            }
        };
        if let Err(err) = statute.validate() {
            warn!(file = %file.display(), error = %err, "skipping invalid statute");
            continue;
        }
        debug!(file = %file.display(), version = %statute.version, "loaded statute");
        statutes.push(statute);
    }
    Ok(statutes)
}

/// The built-in statutes overridden by whatever `dir` provides.
pub fn load_statute_book(dir: &Path) -> Result<StatuteBook> {
    let mut book = StatuteBook::builtin();
    for statute in load_statutes_from_dir(dir)? {
        book.insert(statute)?;
    }
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_builtin_statutes_validate() {
        let book = StatuteBook::builtin();
        assert_eq!(book.versions(), vec!["2024".to_string(), "2026".to_string()]);
        assert_eq!(book.default_version(), "2026");
        for version in book.versions() {
            assert!(book.get(Some(version.as_str())).unwrap().validate().is_ok());
        }
    }

    #[test]
    fn test_regime_constants() {
        let old = Statute::vn_2024();
        assert_eq!(old.personal_deduction, dec!(11000000));
        assert_eq!(old.dependent_deduction, dec!(4400000));
        assert_eq!(old.minimum_wage(WageRegion::I), dec!(4960000));
        assert_eq!(old.employee_rates.social, dec!(0.08));
        assert_eq!(old.employee_rates.health, dec!(0.015));
        assert_eq!(old.employer_rates.social, dec!(0.175));

        let new = Statute::vn_2026();
        assert_eq!(new.personal_deduction, dec!(15500000));
        assert_eq!(new.dependent_deduction, dec!(6200000));
        assert_eq!(new.minimum_wage(WageRegion::IV), dec!(3700000));
        assert_eq!(new.brackets, old.brackets);
    }

    #[test]
    fn test_unknown_regime() {
        let book = StatuteBook::builtin();
        assert_eq!(book.get(None).unwrap().version, "2026");
        assert_eq!(book.get(Some("1999")).unwrap_err(), CalcError::UnknownRegime("1999".into()));
        let mut book = book;
        assert!(book.set_default("1999").is_err());
        book.set_default("2024").unwrap();
        assert_eq!(book.get(None).unwrap().version, "2024");
    }

    #[test]
    fn test_load_statutes_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut custom = Statute::vn_2026();
        custom.version = "2027".to_string();
        custom.personal_deduction = dec!(17000000);
        let custom_json = serde_json::to_string_pretty(&custom).unwrap();
        fs::write(dir.path().join("2027.json"), custom_json).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        let mut invalid = Statute::vn_2024();
        invalid.version = "bad".to_string();
        invalid.brackets.pop();
        fs::write(dir.path().join("bad.json"), serde_json::to_string(&invalid).unwrap()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let loaded = load_statutes_from_dir(dir.path()).unwrap();
        assert_eq!(loaded, vec![custom.clone()]);

        let book = load_statute_book(dir.path()).unwrap();
        assert_eq!(book.get(Some("2027")).unwrap(), &custom);
        assert!(book.get(Some("2024")).is_ok());
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let loaded = load_statutes_from_dir(Path::new("/definitely/not/here")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_statute_accepts_numeric_json() {
        let json = serde_json::json!({
            "version": "numeric",
            "regionalMinimumWage": {"I": 4960000, "II": 4410000, "III": 3860000, "IV": 3450000},
            "baseSalary": 2340000,
            "personalDeduction": 11000000,
            "dependentDeduction": 4400000,
            "insuranceCapMultiplier": 20,
            "employeeRates": {"social": "0.08", "health": "0.015", "unemployment": "0.01"},
            "employerRates": {"social": "0.175", "health": "0.03", "unemployment": "0.01"},
            "brackets": serde_json::to_value(standard_brackets()).unwrap(),
        });
        let statute: Statute = serde_json::from_value(json).unwrap();
        assert!(statute.validate().is_ok());
        assert_eq!(statute.minimum_wage(WageRegion::III), dec!(3860000));
    }
}
