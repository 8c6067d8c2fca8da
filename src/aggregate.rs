use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::Thresholds;
use crate::models::{FacilitySummary, Tier, UnitSummary, VaccinationRecord};

/// Record predicates combined with logical AND. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub district: Option<String>,
    pub facility: Option<String>,
    /// Dose-number membership. An empty selection means "no dose filter"
    /// (select-all), matching the upload screen's convention.
    pub doses: Vec<u32>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
}

impl RecordFilter {
    fn matches(&self, record: &VaccinationRecord) -> bool {
        if let Some(district) = &self.district {
            if &record.district != district {
                return false;
            }
        }
        if let Some(facility) = &self.facility {
            if &record.facility != facility {
                return false;
            }
        }
        if !self.doses.is_empty() && !self.doses.contains(&record.dose_number) {
            return false;
        }
        if let Some(from) = self.due_from {
            if record.due_date < from {
                return false;
            }
        }
        if let Some(to) = self.due_to {
            if record.due_date > to {
                return false;
            }
        }
        true
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Groups filtered records by (district, facility, unit) and computes one
/// completion summary per group. Output is ordered lexicographically by the
/// grouping key; callers may re-sort by any attribute.
pub fn summarize_units(
    records: &[VaccinationRecord],
    filter: &RecordFilter,
) -> Vec<UnitSummary> {
    let mut groups: BTreeMap<(String, String, String), (usize, usize)> = BTreeMap::new();

    for record in records.iter().filter(|r| filter.matches(r)) {
        let key = (
            record.district.clone(),
            record.facility.clone(),
            record.unit.clone(),
        );
        let entry = groups.entry(key).or_insert((0, 0));
        entry.0 += 1;
        if record.completed() {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|((district, facility, unit), (target, completed))| {
            let ratio = if target == 0 {
                0.0
            } else {
                round2(completed as f64 / target as f64 * 100.0)
            };
            UnitSummary {
                district,
                facility,
                unit,
                target,
                completed,
                ratio,
            }
        })
        .collect()
}

/// Stable sort by ratio; equal ratios keep their relative order.
pub fn sort_by_ratio(summaries: &mut [UnitSummary], ascending: bool) {
    summaries.sort_by(|a, b| {
        let ordering = a
            .ratio
            .partial_cmp(&b.ratio)
            .unwrap_or(std::cmp::Ordering::Equal);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

/// Rolls unit summaries up to (district, facility), counting units per tier.
/// Groups iterate lexicographically by key so the output is reproducible.
pub fn summarize_facilities(
    summaries: &[UnitSummary],
    thresholds: &Thresholds,
) -> Vec<FacilitySummary> {
    let mut groups: BTreeMap<(String, String), FacilitySummary> = BTreeMap::new();

    for summary in summaries {
        let key = (summary.district.clone(), summary.facility.clone());
        let entry = groups.entry(key).or_insert_with(|| FacilitySummary {
            district: summary.district.clone(),
            facility: summary.facility.clone(),
            red: 0,
            yellow: 0,
            green: 0,
            total_units: 0,
        });
        entry.total_units += 1;
        match Tier::classify(summary.ratio, thresholds) {
            Tier::Red => entry.red += 1,
            Tier::Yellow => entry.yellow += 1,
            Tier::Green => entry.green += 1,
        }
    }

    groups.into_values().collect()
}

/// Facilities with at least one RED unit, worst first. The sort is stable, so
/// equal RED counts keep the lexicographic roll-up order.
pub fn at_risk_facilities(summaries: &[FacilitySummary]) -> Vec<FacilitySummary> {
    let mut at_risk: Vec<FacilitySummary> = summaries
        .iter()
        .filter(|f| f.at_risk())
        .cloned()
        .collect();
    at_risk.sort_by(|a, b| b.red.cmp(&a.red));
    at_risk
}
