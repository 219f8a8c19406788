//! Column-name normalization and role resolution.
//!
//! Source files name their columns loosely (`warehouse id`, `Warehouse-ID`,
//! `Storage Cost/Unit`). Headers are normalized once, then every semantic
//! [`Role`] is bound to a column index by keyword match. The resulting
//! [`Schema`] travels with the dataset so nothing downstream looks columns
//! up by name again.
//!
//! Tie-break is first match in column order. A file with two cost-like
//! columns silently binds the first one.

use std::fmt;

use serde::Serialize;

use crate::error::ResolutionError;

/// Column names produced by the metric pass. Source columns with these
/// names are dropped at load so a re-loaded export re-derives them.
pub const DERIVED_COLUMNS: [&str; 5] = [
    "Status",
    "Days_Since_Restock",
    "Excess_Stock",
    "Potential_Savings",
    "Total_Storage_Cost",
];

/// Semantic role a source column can play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Warehouse,
    Location,
    Category,
    StockLevel,
    ReorderLevel,
    Cost,
    RestockDate,
}

impl Role {
    /// Roles whose absence halts loading, in reporting order.
    pub const REQUIRED: [Role; 6] = [
        Role::Warehouse,
        Role::Location,
        Role::Category,
        Role::ReorderLevel,
        Role::Cost,
        Role::StockLevel,
    ];

    /// Every keyword must appear in the normalized column name.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Role::Warehouse => &["Warehouse"],
            Role::Location => &["Location"],
            Role::Category => &["Product", "Category"],
            Role::StockLevel => &["Stock"],
            Role::ReorderLevel => &["Reorder"],
            Role::Cost => &["Cost"],
            Role::RestockDate => &["Restock", "Date"],
        }
    }

    /// Canonical column name for this role.
    pub fn column_name(self) -> &'static str {
        match self {
            Role::Warehouse => "Warehouse_Id",
            Role::Location => "Location",
            Role::Category => "Product_Category",
            Role::StockLevel => "Current_Stock_Units",
            Role::ReorderLevel => "Reorder_Level",
            Role::Cost => "Storage_Cost_Per_Unit",
            Role::RestockDate => "Last_Restocked_Date",
        }
    }

    fn matches(self, column: &str) -> bool {
        self.keywords().iter().all(|kw| column.contains(kw))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.column_name())
    }
}

/// Normalize a raw header: trim, fold runs of spaces, hyphens, slashes and
/// underscores into one `_`, then title-case each word.
///
/// `" storage cost/unit "` becomes `"Storage_Cost_Unit"`.
pub fn normalize_column_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().chars() {
        if matches!(ch, ' ' | '-' | '/' | '_') {
            pending_sep = true;
            continue;
        }
        if pending_sep && !out.is_empty() {
            out.push('_');
        }
        pending_sep = false;
        out.push(ch);
    }
    if pending_sep && !out.is_empty() {
        out.push('_');
    }
    title_case(&out)
}

/// Uppercase a letter that follows a non-letter, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// Bind `role` to the first column whose normalized name carries all of
/// its keywords.
pub fn resolve(columns: &[String], role: Role) -> Result<usize, ResolutionError> {
    columns
        .iter()
        .position(|c| role.matches(c))
        .ok_or(ResolutionError::AmbiguousOrMissing(role))
}

/// Role-to-column binding, computed once per load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub warehouse: usize,
    pub location: usize,
    pub category: usize,
    pub stock_level: usize,
    pub reorder_level: usize,
    pub cost: usize,
    pub restock_date: Option<usize>,
}

impl ColumnMap {
    /// Resolve every role against normalized column names. Required roles
    /// are checked in [`Role::REQUIRED`] order so the first missing one is
    /// the one reported.
    pub fn resolve(columns: &[String]) -> Result<Self, ResolutionError> {
        let mut required = [0usize; 6];
        for (slot, role) in required.iter_mut().zip(Role::REQUIRED) {
            *slot = resolve(columns, role)?;
        }
        let [warehouse, location, category, reorder_level, cost, stock_level] = required;
        Ok(Self {
            warehouse,
            location,
            category,
            stock_level,
            reorder_level,
            cost,
            restock_date: resolve(columns, Role::RestockDate).ok(),
        })
    }

    /// Column index bound to `role`, if any.
    pub fn index(&self, role: Role) -> Option<usize> {
        match role {
            Role::Warehouse => Some(self.warehouse),
            Role::Location => Some(self.location),
            Role::Category => Some(self.category),
            Role::StockLevel => Some(self.stock_level),
            Role::ReorderLevel => Some(self.reorder_level),
            Role::Cost => Some(self.cost),
            Role::RestockDate => self.restock_date,
        }
    }

    /// The role bound to column `idx`, if any.
    pub fn role_at(&self, idx: usize) -> Option<Role> {
        [
            Role::Warehouse,
            Role::Location,
            Role::Category,
            Role::StockLevel,
            Role::ReorderLevel,
            Role::Cost,
            Role::RestockDate,
        ]
        .into_iter()
        .find(|role| self.index(*role) == Some(idx))
    }
}

/// Normalized header plus the resolved role binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
    map: ColumnMap,
    passthrough: Vec<usize>,
}

impl Schema {
    /// Normalize raw headers and resolve roles.
    pub fn from_headers<'a, I>(headers: I) -> Result<Self, ResolutionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let columns: Vec<String> = headers.into_iter().map(normalize_column_name).collect();
        let map = ColumnMap::resolve(&columns)?;
        let passthrough = (0..columns.len())
            .filter(|&i| map.role_at(i).is_none())
            .filter(|&i| !DERIVED_COLUMNS.contains(&columns[i].as_str()))
            .collect();
        Ok(Self {
            columns,
            map,
            passthrough,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn map(&self) -> &ColumnMap {
        &self.map
    }

    /// Indices of columns carried through untouched, in source order.
    pub fn passthrough(&self) -> &[usize] {
        &self.passthrough
    }

    /// Name of the column bound to `role`.
    pub fn column_name(&self, role: Role) -> Option<&str> {
        self.map.index(role).map(|i| self.columns[i].as_str())
    }

    /// Source columns that survive into the output, in source order.
    /// Derived-name columns are excluded; they are written after these.
    pub fn output_columns(&self) -> impl Iterator<Item = (OutputColumn, &str)> {
        let mut slots = self.passthrough.iter().enumerate().peekable();
        self.columns.iter().enumerate().filter_map(move |(i, name)| {
            let column = match self.map.role_at(i) {
                Some(role) => OutputColumn::Role(role),
                None => {
                    let (slot, _) = slots.next_if(|&(_, &p)| p == i)?;
                    OutputColumn::Passthrough(slot)
                }
            };
            Some((column, name.as_str()))
        })
    }
}

/// Where an output column takes its value from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputColumn {
    Role(Role),
    /// Index into [`InventoryRecord::extra`](crate::types::InventoryRecord::extra).
    Passthrough(usize),
}
