//! Column role detection over arbitrary, possibly renamed headers.
//!
//! Spreadsheet exports rename columns freely ("Date", "CB Date", "발생일"),
//! so every semantic role carries an ordered alias list and the resolver
//! scans the headers for the first alias that matches anywhere. Alias order
//! dominates match quality: an earlier alias that matches as a substring
//! beats a later alias that would have matched a header exactly.

use std::collections::HashMap;

use log::debug;

/// Semantic roles a raw column header can be mapped to. `Date` is the only
/// role whose absence is fatal downstream; the five grouping dimensions and
/// `Amount` simply vanish from the report when unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Date,
    Amount,
    Currency,
    Provider,
    Product,
    Reason,
    Market,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Date,
        Role::Amount,
        Role::Currency,
        Role::Provider,
        Role::Product,
        Role::Reason,
        Role::Market,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Role::Date => "date",
            Role::Amount => "amount",
            Role::Currency => "currency",
            Role::Provider => "provider",
            Role::Product => "product",
            Role::Reason => "reason",
            Role::Market => "market",
        }
    }
}

/// Ordered `role → alias list` table. An explicit value rather than a module
/// global so the resolver stays a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<(Role, Vec<&'static str>)>,
}

impl AliasTable {
    /// The alias vocabulary of the production chargeback sheet, which mixes
    /// English and Korean headers. Earlier aliases take priority.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                (
                    Role::Date,
                    vec!["date", "날짜", "일자", "chargeback date", "cb date", "발생일"],
                ),
                (
                    Role::Amount,
                    vec!["amount", "금액", "피해액", "chargeback amount", "cb amount", "합계"],
                ),
                (Role::Currency, vec!["currency", "통화", "화폐"]),
                (
                    Role::Provider,
                    vec!["provider", "pg", "결제사", "payment provider", "pg사", "payment method"],
                ),
                (
                    Role::Product,
                    vec!["product", "상품", "product type", "상품유형", "플랜"],
                ),
                (
                    Role::Reason,
                    vec!["reason", "사유", "chargeback reason", "cb reason", "유형"],
                ),
                (Role::Market, vec!["market", "마켓", "language", "언어"]),
            ],
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = (Role, &[&'static str])> {
        self.entries
            .iter()
            .map(|(role, aliases)| (*role, aliases.as_slice()))
    }
}

/// Resolved `role → column index` assignments for one batch of records.
/// Duplicate headers resolve to their first occurrence; at most one column
/// is assigned per role.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    assignments: HashMap<Role, usize>,
}

impl ColumnMap {
    pub fn get(&self, role: Role) -> Option<usize> {
        self.assignments.get(&role).copied()
    }

    pub fn is_resolved(&self, role: Role) -> bool {
        self.assignments.contains_key(&role)
    }

    /// Renders `role=header` pairs in declared role order, for logging.
    pub fn describe(&self, headers: &[String]) -> String {
        let mut parts = Vec::new();
        for role in Role::ALL {
            if let Some(idx) = self.get(role)
                && let Some(header) = headers.get(idx)
            {
                parts.push(format!("{}='{}'", role.name(), header.trim()));
            }
        }
        if parts.is_empty() {
            String::from("(none)")
        } else {
            parts.join(", ")
        }
    }

    #[cfg(test)]
    fn assign(&mut self, role: Role, index: usize) {
        self.assignments.insert(role, index);
    }
}

/// Maps headers to roles using `aliases`. For each role the alias list is
/// walked in priority order and the first alias matching any header (exact
/// or substring, on the trimmed lowercased header) claims that role.
/// Unmatched roles are simply left unassigned; the range filter validates
/// the one hard requirement (`date`) later.
pub fn detect_columns(headers: &[String], aliases: &AliasTable) -> ColumnMap {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let mut map = ColumnMap::default();
    for (role, candidates) in aliases.roles() {
        'candidates: for alias in candidates {
            for (idx, header) in lowered.iter().enumerate() {
                if header == alias || header.contains(alias) {
                    map.assignments.insert(role, idx);
                    break 'candidates;
                }
            }
        }
        debug!(
            "role '{}' -> {:?}",
            role.name(),
            map.get(role).map(|idx| headers[idx].as_str())
        );
    }
    map
}
