use super::{AssessmentYear, TableError, TaxError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Income bracket taxed at a single marginal rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxSlab {
    #[schemars(with = "f64")]
    pub income_from: Decimal,
    /// Upper bound of the slab; `None` for the final, unbounded slab
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub income_to: Option<Decimal>,
    /// Percentage, e.g. 5 for 5%
    #[schemars(with = "f64")]
    pub tax_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Surcharge rate applying once total income reaches `threshold`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SurchargeBand {
    #[schemars(with = "f64")]
    pub threshold: Decimal,
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RegimeKind {
    Old,
    New,
}

impl RegimeKind {
    pub fn display(&self) -> &'static str {
        match self {
            RegimeKind::Old => "Old",
            RegimeKind::New => "New",
        }
    }
}

impl fmt::Display for RegimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl FromStr for RegimeKind {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "old" => Ok(RegimeKind::Old),
            "new" => Ok(RegimeKind::New),
            _ => Err(TaxError::UnknownRegime(s.to_string())),
        }
    }
}

/// Age of the filer during the financial year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    #[default]
    BelowSixty,
    /// 60 to 79
    Senior,
    /// 80 and above
    SuperSenior,
}

impl AgeCategory {
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=59 => AgeCategory::BelowSixty,
            60..=79 => AgeCategory::Senior,
            _ => AgeCategory::SuperSenior,
        }
    }

    pub fn is_senior(&self) -> bool {
        !matches!(self, AgeCategory::BelowSixty)
    }

    pub fn display(&self) -> &'static str {
        match self {
            AgeCategory::BelowSixty => "below 60",
            AgeCategory::Senior => "senior (60-79)",
            AgeCategory::SuperSenior => "super senior (80+)",
        }
    }
}

impl FromStr for AgeCategory {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "below_sixty" | "below_60" | "general" => Ok(AgeCategory::BelowSixty),
            "senior" => Ok(AgeCategory::Senior),
            "super_senior" => Ok(AgeCategory::SuperSenior),
            other => other
                .parse::<u32>()
                .map(AgeCategory::from_age)
                .map_err(|_| TaxError::UnknownAgeCategory(s.to_string())),
        }
    }
}

/// One rate structure (old or new) for an assessment year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxRegime {
    pub kind: RegimeKind,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    pub slabs: Vec<TaxSlab>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senior_slabs: Option<Vec<TaxSlab>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_senior_slabs: Option<Vec<TaxSlab>>,
    #[serde(default)]
    pub surcharge: Vec<SurchargeBand>,
    /// Health and education cess percentage
    #[schemars(with = "f64")]
    pub cess: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub standard_deduction: Decimal,
    /// Deduction sections available under this regime (informational)
    #[serde(default)]
    pub deductions: Vec<String>,
}

impl TaxRegime {
    /// Slabs for an age category, falling back to the base slabs
    pub fn slabs_for(&self, age: AgeCategory) -> &[TaxSlab] {
        let variant = match age {
            AgeCategory::BelowSixty => None,
            AgeCategory::Senior => self.senior_slabs.as_deref(),
            AgeCategory::SuperSenior => self
                .super_senior_slabs
                .as_deref()
                .or(self.senior_slabs.as_deref()),
        };
        variant.unwrap_or(&self.slabs)
    }

    /// Structural problems with this regime's slabs and surcharge bands
    pub fn check(&self, year: AssessmentYear) -> Vec<TableError> {
        let mut issues = Vec::new();
        let regime = self.kind;
        let variants = [
            Some(self.slabs.as_slice()),
            self.senior_slabs.as_deref(),
            self.super_senior_slabs.as_deref(),
        ];
        for slabs in variants.into_iter().flatten() {
            check_slabs(slabs, year, regime, &mut issues);
        }
        if self.cess < Decimal::ZERO || self.cess > dec!(100) {
            issues.push(TableError::RateOutOfRange {
                year,
                regime,
                rate: self.cess,
            });
        }
        for band in &self.surcharge {
            if band.threshold < Decimal::ZERO || band.rate < Decimal::ZERO {
                issues.push(TableError::NegativeSurcharge {
                    year,
                    regime,
                    threshold: band.threshold,
                    rate: band.rate,
                });
            } else if band.rate > dec!(100) {
                issues.push(TableError::RateOutOfRange {
                    year,
                    regime,
                    rate: band.rate,
                });
            }
        }
        issues
    }
}

fn check_slabs(
    slabs: &[TaxSlab],
    year: AssessmentYear,
    regime: RegimeKind,
    issues: &mut Vec<TableError>,
) {
    let Some(first) = slabs.first() else {
        issues.push(TableError::EmptySlabs { year, regime });
        return;
    };
    if !first.income_from.is_zero() {
        issues.push(TableError::FirstSlabNotZero {
            year,
            regime,
            from: first.income_from,
        });
    }
    for (index, slab) in slabs.iter().enumerate() {
        if slab.tax_rate < Decimal::ZERO || slab.tax_rate > dec!(100) {
            issues.push(TableError::RateOutOfRange {
                year,
                regime,
                rate: slab.tax_rate,
            });
        }
        if slab.income_to.is_some_and(|to| to <= slab.income_from) {
            issues.push(TableError::EmptySlabRange {
                year,
                regime,
                index,
            });
        }
        if index > 0 {
            match slabs[index - 1].income_to {
                Some(previous_to) if previous_to != slab.income_from => {
                    issues.push(TableError::NonContiguousSlabs {
                        year,
                        regime,
                        index,
                        from: slab.income_from,
                        previous_to,
                    });
                }
                Some(_) => {}
                None => issues.push(TableError::UnboundedSlabNotLast {
                    year,
                    regime,
                    index: index - 1,
                }),
            }
        }
    }
    if slabs.last().is_some_and(|slab| slab.income_to.is_some()) {
        issues.push(TableError::BoundedFinalSlab { year, regime });
    }
}

/// All regimes available for one assessment year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxSlabsYear {
    pub assessment_year: AssessmentYear,
    pub regimes: Vec<TaxRegime>,
}

impl TaxSlabsYear {
    pub fn regime(&self, kind: RegimeKind) -> Option<&TaxRegime> {
        self.regimes.iter().find(|r| r.kind == kind)
    }

    pub fn default_regime(&self) -> Option<&TaxRegime> {
        self.regimes.iter().find(|r| r.is_default)
    }

    pub fn check(&self) -> Vec<TableError> {
        let year = self.assessment_year;
        let mut issues: Vec<TableError> =
            self.regimes.iter().flat_map(|r| r.check(year)).collect();

        let defaults = self.regimes.iter().filter(|r| r.is_default).count();
        if defaults != 1 {
            issues.push(TableError::DefaultRegimeCount {
                year,
                count: defaults,
            });
        }
        let mut seen = HashSet::new();
        for regime in &self.regimes {
            if !seen.insert(regime.kind) {
                issues.push(TableError::DuplicateRegime {
                    year,
                    regime: regime.kind,
                });
            }
        }
        issues
    }
}

/// Slab tables for every supported assessment year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SlabTable {
    pub years: Vec<TaxSlabsYear>,
}

impl SlabTable {
    pub fn year(&self, year: AssessmentYear) -> Result<&TaxSlabsYear, TaxError> {
        self.years
            .iter()
            .find(|y| y.assessment_year == year)
            .ok_or(TaxError::UnknownAssessmentYear(year))
    }

    pub fn regime(&self, year: AssessmentYear, kind: RegimeKind) -> Result<&TaxRegime, TaxError> {
        self.year(year)?
            .regime(kind)
            .ok_or(TaxError::MissingRegime { year, regime: kind })
    }

    pub fn latest_year(&self) -> Option<AssessmentYear> {
        self.years.iter().map(|y| y.assessment_year).max()
    }

    /// Every structural problem in the table
    pub fn check(&self) -> Vec<TableError> {
        let mut issues: Vec<TableError> = self.years.iter().flat_map(|y| y.check()).collect();
        let mut seen = HashSet::new();
        for year in &self.years {
            if !seen.insert(year.assessment_year) {
                issues.push(TableError::DuplicateYear(year.assessment_year));
            }
        }
        issues
    }

    /// SHA-256 of the table's JSON form, to tie a computation to a table version
    pub fn digest(&self) -> String {
        // serializing plain data into a Vec cannot fail
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&bytes))
    }

    /// Slabs notified for AY 2023-24 through AY 2026-27
    pub fn builtin() -> Self {
        SlabTable {
            years: vec![
                TaxSlabsYear {
                    assessment_year: AssessmentYear(2023),
                    regimes: vec![
                        old_regime(),
                        new_regime(
                            &[250_000, 500_000, 750_000, 1_000_000, 1_250_000, 1_500_000],
                            &[0, 5, 10, 15, 20, 25, 30],
                            surcharge(&[
                                (5_000_000, 10),
                                (10_000_000, 15),
                                (20_000_000, 25),
                                (50_000_000, 37),
                            ]),
                            Decimal::ZERO,
                        ),
                    ],
                },
                TaxSlabsYear {
                    assessment_year: AssessmentYear(2024),
                    regimes: vec![
                        old_regime(),
                        new_regime(
                            &[300_000, 600_000, 900_000, 1_200_000, 1_500_000],
                            &[0, 5, 10, 15, 20, 30],
                            new_regime_surcharge(),
                            dec!(50000),
                        ),
                    ],
                },
                TaxSlabsYear {
                    assessment_year: AssessmentYear(2025),
                    regimes: vec![
                        old_regime(),
                        new_regime(
                            &[300_000, 700_000, 1_000_000, 1_200_000, 1_500_000],
                            &[0, 5, 10, 15, 20, 30],
                            new_regime_surcharge(),
                            dec!(75000),
                        ),
                    ],
                },
                TaxSlabsYear {
                    assessment_year: AssessmentYear(2026),
                    regimes: vec![
                        old_regime(),
                        new_regime(
                            &[400_000, 800_000, 1_200_000, 1_600_000, 2_000_000, 2_400_000],
                            &[0, 5, 10, 15, 20, 25, 30],
                            new_regime_surcharge(),
                            dec!(75000),
                        ),
                    ],
                },
            ],
        }
    }
}

impl Default for SlabTable {
    fn default() -> Self {
        SlabTable::builtin()
    }
}

/// Contiguous slabs from the upper bounds of all but the last slab
fn slabs(bounds: &[i64], rates: &[i64]) -> Vec<TaxSlab> {
    debug_assert_eq!(bounds.len() + 1, rates.len());
    let mut from = Decimal::ZERO;
    let mut slabs = Vec::with_capacity(rates.len());
    for (i, &rate) in rates.iter().enumerate() {
        let to = bounds.get(i).map(|&b| Decimal::from(b));
        let description = match to {
            Some(to) => format!("{} - {}", from, to),
            None => format!("Above {}", from),
        };
        slabs.push(TaxSlab {
            income_from: from,
            income_to: to,
            tax_rate: Decimal::from(rate),
            description: Some(description),
        });
        if let Some(to) = to {
            from = to;
        }
    }
    slabs
}

fn surcharge(bands: &[(i64, i64)]) -> Vec<SurchargeBand> {
    bands
        .iter()
        .map(|&(threshold, rate)| SurchargeBand {
            threshold: Decimal::from(threshold),
            rate: Decimal::from(rate),
        })
        .collect()
}

fn new_regime_surcharge() -> Vec<SurchargeBand> {
    // capped at 25% from AY 2024-25
    surcharge(&[(5_000_000, 10), (10_000_000, 15), (20_000_000, 25)])
}

fn old_regime() -> TaxRegime {
    TaxRegime {
        kind: RegimeKind::Old,
        name: "Old Tax Regime".to_string(),
        is_default: false,
        slabs: slabs(&[250_000, 500_000, 1_000_000], &[0, 5, 20, 30]),
        senior_slabs: Some(slabs(&[300_000, 500_000, 1_000_000], &[0, 5, 20, 30])),
        super_senior_slabs: Some(slabs(&[500_000, 1_000_000], &[0, 20, 30])),
        surcharge: surcharge(&[
            (5_000_000, 10),
            (10_000_000, 15),
            (20_000_000, 25),
            (50_000_000, 37),
        ]),
        cess: dec!(4),
        standard_deduction: dec!(50000),
        deductions: [
            "80C", "80CCD(1B)", "80D", "80E", "80G", "80TTA", "80TTB", "24(b)", "HRA",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    }
}

fn new_regime(
    bounds: &[i64],
    rates: &[i64],
    surcharge: Vec<SurchargeBand>,
    standard_deduction: Decimal,
) -> TaxRegime {
    TaxRegime {
        kind: RegimeKind::New,
        name: "New Tax Regime".to_string(),
        is_default: true,
        slabs: slabs(bounds, rates),
        senior_slabs: None,
        super_senior_slabs: None,
        surcharge,
        cess: dec!(4),
        standard_deduction,
        deductions: vec!["80CCD(2)".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ay(label: &str) -> AssessmentYear {
        label.parse().unwrap()
    }

    #[test]
    fn builtin_table_is_valid() {
        let table = SlabTable::builtin();
        assert!(table.check().is_empty());
        assert_eq!(table.years.len(), 4);
        assert_eq!(table.latest_year(), Some(ay("2026-27")));
    }

    #[test]
    fn new_regime_is_default_every_year() {
        let table = SlabTable::builtin();
        for year in &table.years {
            assert_eq!(year.default_regime().map(|r| r.kind), Some(RegimeKind::New));
        }
    }

    #[test]
    fn lookup_unknown_year() {
        let table = SlabTable::builtin();
        assert_eq!(
            table.year(ay("2019-20")).unwrap_err(),
            TaxError::UnknownAssessmentYear(ay("2019-20"))
        );
    }

    #[test]
    fn new_regime_2026_slabs() {
        let table = SlabTable::builtin();
        let regime = table.regime(ay("2026-27"), RegimeKind::New).unwrap();
        assert_eq!(regime.slabs.len(), 7);
        assert_eq!(regime.slabs[1].income_from, dec!(400000));
        assert_eq!(regime.slabs[1].income_to, Some(dec!(800000)));
        assert_eq!(regime.slabs[6].income_to, None);
        assert_eq!(regime.slabs[6].tax_rate, dec!(30));
        assert_eq!(regime.standard_deduction, dec!(75000));
    }

    #[test]
    fn age_variants() {
        let table = SlabTable::builtin();
        let old = table.regime(ay("2025-26"), RegimeKind::Old).unwrap();
        assert_eq!(old.slabs_for(AgeCategory::BelowSixty)[0].income_to, Some(dec!(250000)));
        assert_eq!(old.slabs_for(AgeCategory::Senior)[0].income_to, Some(dec!(300000)));
        assert_eq!(old.slabs_for(AgeCategory::SuperSenior)[0].income_to, Some(dec!(500000)));

        // new regime has no age variants
        let new = table.regime(ay("2025-26"), RegimeKind::New).unwrap();
        assert_eq!(new.slabs_for(AgeCategory::SuperSenior), new.slabs.as_slice());
    }

    #[test]
    fn check_reports_gap_and_bounded_final_slab() {
        let mut table = SlabTable::builtin();
        let regime = &mut table.years[0].regimes[0];
        regime.slabs[1].income_from = dec!(260000);
        regime.slabs[3].income_to = Some(dec!(5000000));

        let issues = table.check();
        assert!(issues.contains(&TableError::NonContiguousSlabs {
            year: ay("2023-24"),
            regime: RegimeKind::Old,
            index: 1,
            from: dec!(260000),
            previous_to: dec!(250000),
        }));
        assert!(issues.contains(&TableError::BoundedFinalSlab {
            year: ay("2023-24"),
            regime: RegimeKind::Old,
        }));
    }

    #[test]
    fn check_reports_default_count_and_duplicates() {
        let mut table = SlabTable::builtin();
        table.years[1].regimes[0].is_default = true;
        let duplicate = table.years[2].clone();
        table.years.push(duplicate);

        let issues = table.check();
        assert!(issues.contains(&TableError::DefaultRegimeCount {
            year: ay("2024-25"),
            count: 2,
        }));
        assert!(issues.contains(&TableError::DuplicateYear(ay("2025-26"))));
    }

    #[test]
    fn check_reports_unbounded_middle_slab() {
        let mut table = SlabTable::builtin();
        table.years[0].regimes[1].slabs[2].income_to = None;
        let issues = table.check();
        assert!(issues.contains(&TableError::UnboundedSlabNotLast {
            year: ay("2023-24"),
            regime: RegimeKind::New,
            index: 2,
        }));
    }

    #[test]
    fn check_reports_surcharge_rate_above_100() {
        let mut table = SlabTable::builtin();
        table.years[0].regimes[1].surcharge[0].rate = dec!(150);
        assert_eq!(
            table.check(),
            vec![TableError::RateOutOfRange {
                year: ay("2023-24"),
                regime: RegimeKind::New,
                rate: dec!(150),
            }]
        );
    }

    #[test]
    fn digest_changes_with_content() {
        let table = SlabTable::builtin();
        let digest = table.digest();
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, SlabTable::builtin().digest());

        let mut changed = table.clone();
        changed.years[0].regimes[0].cess = dec!(3);
        assert_ne!(changed.digest(), digest);
    }

    #[test]
    fn json_round_trip_keeps_table() {
        let table = SlabTable::builtin();
        let json = serde_json::to_string(&table).unwrap();
        let back: SlabTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn age_category_parsing() {
        assert_eq!("senior".parse::<AgeCategory>().unwrap(), AgeCategory::Senior);
        assert_eq!("super-senior".parse::<AgeCategory>().unwrap(), AgeCategory::SuperSenior);
        assert_eq!("45".parse::<AgeCategory>().unwrap(), AgeCategory::BelowSixty);
        assert_eq!("80".parse::<AgeCategory>().unwrap(), AgeCategory::SuperSenior);
        assert!("elderly".parse::<AgeCategory>().is_err());
    }

    #[test]
    fn regime_parsing() {
        assert_eq!("OLD".parse::<RegimeKind>().unwrap(), RegimeKind::Old);
        assert_eq!("new".parse::<RegimeKind>().unwrap(), RegimeKind::New);
        assert!("flat".parse::<RegimeKind>().is_err());
    }
}
