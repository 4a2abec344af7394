//! Canonical field registry and the mapping from sheet headers to it.
//!
//! A [`Registry`] is an ordered list of `source → canonical` pairs. Its order
//! defines the column order of every projection built from it. Mapping never
//! aborts: registry entries that cannot be bound are reported back to the
//! caller, who applies a [`MissingColumnPolicy`].

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DATE_POSITION: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    Date,
    OrderId,
    Manufacturer,
    Product,
    Defect,
    ClientName,
    Contact,
    Address,
    Number,
    Neighborhood,
    PostalCode,
    Complement,
}

impl CanonicalField {
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::Date => "Date",
            CanonicalField::OrderId => "OrderId",
            CanonicalField::Manufacturer => "Manufacturer",
            CanonicalField::Product => "Product",
            CanonicalField::Defect => "Defect",
            CanonicalField::ClientName => "ClientName",
            CanonicalField::Contact => "Contact",
            CanonicalField::Address => "Address",
            CanonicalField::Number => "Number",
            CanonicalField::Neighborhood => "Neighborhood",
            CanonicalField::PostalCode => "PostalCode",
            CanonicalField::Complement => "Complement",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub source: String,
    pub canonical: CanonicalField,
}

impl RegistryEntry {
    pub fn new(source: impl Into<String>, canonical: CanonicalField) -> Self {
        Self {
            source: source.into(),
            canonical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    pub entries: Vec<RegistryEntry>,
}

impl Default for Registry {
    fn default() -> Self {
        use CanonicalField::*;
        let entries = [
            ("DATA", Date),
            ("ORDEM DE SERVIÇO", OrderId),
            ("Fabricante", Manufacturer),
            ("Produto", Product),
            ("Defeito Relatado", Defect),
            ("Nome Completo", ClientName),
            ("Whatsapp/Celular", Contact),
            ("Endereço", Address),
            ("Número", Number),
            ("Bairro/Cidade", Neighborhood),
            ("CEP", PostalCode),
            ("Complemento", Complement),
        ]
        .into_iter()
        .map(|(source, canonical)| RegistryEntry::new(source, canonical))
        .collect();
        Registry { entries }
    }
}

impl Registry {
    pub fn new(entries: Vec<RegistryEntry>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Returns a copy whose date entry reads from `source`.
    pub fn with_date_source(&self, source: &str) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                if entry.canonical == CanonicalField::Date {
                    RegistryEntry::new(source, CanonicalField::Date)
                } else {
                    entry.clone()
                }
            })
            .collect();
        Self { entries }
    }
}

/// How the date column is located in the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub enum ColumnBinding {
    #[default]
    ByName,
    ByPosition {
        #[serde(default = "default_date_position")]
        position: usize,
    },
}

fn default_date_position() -> usize {
    DEFAULT_DATE_POSITION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingColumnPolicy {
    Strict,
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundColumn {
    pub canonical: CanonicalField,
    pub source: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    pub bound: Vec<BoundColumn>,
    pub missing: Vec<String>,
}

impl ColumnPlan {
    pub fn columns(&self) -> Vec<CanonicalField> {
        self.bound.iter().map(|column| column.canonical).collect()
    }

    pub fn is_bound(&self, field: CanonicalField) -> bool {
        self.bound.iter().any(|column| column.canonical == field)
    }
}

/// Binds each registry entry to a header position, in registry order.
///
/// Entries that cannot be bound are listed in `missing` using the source
/// name (plus the position for positional bindings).
pub fn resolve_columns(
    headers: &[String],
    registry: &Registry,
    binding: ColumnBinding,
) -> ColumnPlan {
    let mut bound = Vec::with_capacity(registry.entries.len());
    let mut missing = Vec::new();
    for entry in registry.iter() {
        let located = match (entry.canonical, binding) {
            (CanonicalField::Date, ColumnBinding::ByPosition { position }) => {
                (position < headers.len()).then_some(position)
            }
            _ => headers.iter().position(|header| header == &entry.source),
        };
        match located {
            Some(index) => bound.push(BoundColumn {
                canonical: entry.canonical,
                source: headers[index].clone(),
                index,
            }),
            None => missing.push(match (entry.canonical, binding) {
                (CanonicalField::Date, ColumnBinding::ByPosition { position }) => {
                    format!("{} (position {position})", entry.source)
                }
                _ => entry.source.clone(),
            }),
        }
    }
    ColumnPlan { bound, missing }
}

/// Rows projected onto the bound canonical columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTable {
    pub columns: Vec<CanonicalField>,
    pub rows: Vec<Vec<String>>,
}

impl RecordTable {
    pub fn column_index(&self, field: CanonicalField) -> Option<usize> {
        self.columns.iter().position(|column| *column == field)
    }
}

pub fn project_rows(plan: &ColumnPlan, rows: &[Vec<String>]) -> RecordTable {
    let projected = rows
        .iter()
        .map(|row| {
            plan.bound
                .iter()
                .map(|column| row.get(column.index).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    RecordTable {
        columns: plan.columns(),
        rows: projected,
    }
}

/// Selects and renames registry columns, reporting the ones not found.
pub fn map_schema(
    headers: &[String],
    rows: &[Vec<String>],
    registry: &Registry,
    binding: ColumnBinding,
) -> (RecordTable, Vec<String>) {
    let plan = resolve_columns(headers, registry, binding);
    let table = project_rows(&plan, rows);
    (table, plan.missing)
}
