//! Reduction of a filtered record set into totals and per-dimension
//! breakdowns.
//!
//! Every row counts toward `total_count` whether or not its amount parses;
//! amounts degrade to zero instead of excluding the row. The grand total is
//! rounded once at the end so per-row rounding drift cannot accumulate.
//! Per-group amounts stay unrounded.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{
    columns::{ColumnMap, Role},
    data::{parse_amount, round2},
    source::Row,
};

/// The sentinel key for blank or missing cells in a grouping dimension.
pub const UNKNOWN_KEY: &str = "Unknown";

/// Count and amount accumulated for one distinct value of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct GroupEntry {
    pub count: u64,
    pub amount: f64,
}

/// One dimension's entries, ordered by descending count with ascending key
/// as the deterministic tie-break. Serializes as an ordered JSON map.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    entries: Vec<(String, GroupEntry)>,
}

impl Breakdown {
    fn from_counts(counts: HashMap<String, GroupEntry>) -> Self {
        let mut entries: Vec<_> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&GroupEntry> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Breakdown {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

/// Totals plus one breakdown per resolved grouping dimension. A breakdown is
/// present exactly when its role resolved — an empty map means "the column
/// exists but the window had no rows", while an absent field means "no such
/// column was detected".
#[derive(Debug, Clone, serde::Serialize)]
pub struct Aggregation {
    pub total_count: u64,
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_provider: Option<Breakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_currency: Option<Breakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_product: Option<Breakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_reason: Option<Breakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_market: Option<Breakdown>,
}

impl Aggregation {
    pub fn breakdown(&self, role: Role) -> Option<&Breakdown> {
        match role {
            Role::Provider => self.by_provider.as_ref(),
            Role::Currency => self.by_currency.as_ref(),
            Role::Product => self.by_product.as_ref(),
            Role::Reason => self.by_reason.as_ref(),
            Role::Market => self.by_market.as_ref(),
            Role::Date | Role::Amount => None,
        }
    }
}

/// The five grouping dimensions, in output order.
const DIMENSIONS: [Role; 5] = [
    Role::Provider,
    Role::Currency,
    Role::Product,
    Role::Reason,
    Role::Market,
];

struct DimensionAccumulator {
    role: Role,
    column: usize,
    counts: HashMap<String, GroupEntry>,
}

impl DimensionAccumulator {
    fn ingest(&mut self, row: &Row, amount: f64) {
        let raw = row.get(self.column).map(String::as_str).unwrap_or("");
        let trimmed = raw.trim();
        let key = if trimmed.is_empty() { UNKNOWN_KEY } else { trimmed };
        let entry = self
            .counts
            .entry(key.to_string())
            .or_insert(GroupEntry { count: 0, amount: 0.0 });
        entry.count += 1;
        entry.amount += amount;
    }
}

/// Reduces `rows` under the resolved columns. Pure: same rows and columns
/// always produce the identical result.
pub fn aggregate(rows: &[&Row], columns: &ColumnMap) -> Aggregation {
    let amount_idx = columns.get(Role::Amount);
    let mut accumulators: Vec<DimensionAccumulator> = DIMENSIONS
        .iter()
        .filter_map(|role| {
            columns.get(*role).map(|column| DimensionAccumulator {
                role: *role,
                column,
                counts: HashMap::new(),
            })
        })
        .collect();

    let mut total_amount = 0.0;
    for row in rows {
        let amount = match amount_idx {
            Some(idx) => parse_amount(row.get(idx).map(String::as_str).unwrap_or("")),
            None => 0.0,
        };
        total_amount += amount;
        for accumulator in &mut accumulators {
            accumulator.ingest(row, amount);
        }
    }

    let mut result = Aggregation {
        total_count: rows.len() as u64,
        total_amount: round2(total_amount),
        by_provider: None,
        by_currency: None,
        by_product: None,
        by_reason: None,
        by_market: None,
    };
    for accumulator in accumulators {
        let breakdown = Some(Breakdown::from_counts(accumulator.counts));
        match accumulator.role {
            Role::Provider => result.by_provider = breakdown,
            Role::Currency => result.by_currency = breakdown,
            Role::Product => result.by_product = breakdown,
            Role::Reason => result.by_reason = breakdown,
            Role::Market => result.by_market = breakdown,
            Role::Date | Role::Amount => unreachable!("not a grouping dimension"),
        }
    }
    result
}
