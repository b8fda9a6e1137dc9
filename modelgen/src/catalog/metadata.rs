//! Metadata structures for introspected tables

use serde::{Deserialize, Serialize};

/// Metadata for a database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name, exactly as the catalog reports it
    pub name: String,

    /// Table comment (if any)
    pub comment: Option<String>,

    /// Columns in ordinal order
    pub columns: Vec<ColumnMetadata>,

    /// Indexes (excluding primary key)
    pub indexes: Vec<IndexMetadata>,

    /// Primary key (if any)
    pub primary_key: Option<PrimaryKey>,
}

/// Metadata for a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,

    /// Full column type (e.g., "bigint unsigned", "varchar(255)")
    pub data_type: String,

    /// Whether the column is nullable
    pub nullable: bool,

    /// Default value expression (if any)
    pub default_value: Option<String>,

    /// Whether this column is auto-increment
    pub is_auto_increment: bool,

    /// Whether this column is unsigned (for numeric types)
    pub is_unsigned: bool,

    /// Enum values if this is an ENUM column
    pub enum_values: Option<Vec<String>>,

    /// Column comment (if any)
    pub comment: Option<String>,
}

/// Metadata for an index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Index name
    pub name: String,

    /// Columns in the index (in order)
    pub columns: Vec<String>,

    /// Whether this is a unique index
    pub unique: bool,
}

/// Primary key definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Columns in the primary key (in order)
    pub columns: Vec<String>,
}

impl PrimaryKey {
    /// Check if this is a composite primary key
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }
}

impl TableMetadata {
    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if a column is part of the primary key
    pub fn is_primary_key_column(&self, column_name: &str) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| pk.columns.iter().any(|c| c == column_name))
    }
}

impl ColumnMetadata {
    /// Build a column from the raw `information_schema.columns` fields
    pub fn from_catalog(
        name: String,
        column_type: String,
        is_nullable: &str,
        default_value: Option<String>,
        extra: &str,
        comment: String,
    ) -> Self {
        let lower = column_type.to_lowercase();
        Self {
            name,
            enum_values: parse_enum_values(&column_type),
            is_unsigned: lower.contains("unsigned"),
            is_auto_increment: extra.to_lowercase().contains("auto_increment"),
            nullable: is_nullable.eq_ignore_ascii_case("YES"),
            default_value,
            comment: Some(comment).filter(|c| !c.is_empty()),
            data_type: column_type,
        }
    }

    /// Check if this column has an enum type with at least one member
    pub fn is_enum(&self) -> bool {
        self.enum_values.as_ref().is_some_and(|v| !v.is_empty())
    }
}

/// Extract the members of an `enum('a','b')` column type.
///
/// Quotes inside members are doubled (`'it''s'`), which is how MySQL
/// reports them in `COLUMN_TYPE`.
pub fn parse_enum_values(column_type: &str) -> Option<Vec<String>> {
    let trimmed = column_type.trim();
    let head = trimmed.get(..5)?;
    if !head.eq_ignore_ascii_case("enum(") || !trimmed.ends_with(')') {
        return None;
    }
    let body = &trimmed[5..trimmed.len() - 1];

    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, in_quote) {
            ('\'', false) => in_quote = true,
            ('\'', true) if chars.peek() == Some(&'\'') => {
                current.push('\'');
                chars.next();
            }
            ('\'', true) => {
                in_quote = false;
                values.push(std::mem::take(&mut current));
            }
            (c, true) => current.push(c),
            _ => {}
        }
    }
    Some(values)
}
