//! MySQL to Rust type mapping

use std::fmt;

use super::naming;
use crate::catalog::ColumnMetadata;

/// Field type of a generated struct
#[derive(Debug, Clone, PartialEq)]
pub enum RustType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Bytes,
    Decimal,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    Json,
    /// Enum generated for an ENUM column, by type name
    Enum(String),
    Option(Box<RustType>),
}

impl fmt::Display for RustType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = match self {
            RustType::Enum(name) => return f.write_str(name),
            RustType::Option(inner) => return write!(f, "Option<{}>", inner),
            RustType::Bool => "bool",
            RustType::I8 => "i8",
            RustType::I16 => "i16",
            RustType::I32 => "i32",
            RustType::I64 => "i64",
            RustType::U8 => "u8",
            RustType::U16 => "u16",
            RustType::U32 => "u32",
            RustType::U64 => "u64",
            RustType::F32 => "f32",
            RustType::F64 => "f64",
            RustType::String => "String",
            RustType::Bytes => "Vec<u8>",
            RustType::Decimal => "rust_decimal::Decimal",
            RustType::NaiveDate => "chrono::NaiveDate",
            RustType::NaiveDateTime => "chrono::NaiveDateTime",
            RustType::NaiveTime => "chrono::NaiveTime",
            RustType::Json => "serde_json::Value",
        };
        f.write_str(path)
    }
}

impl RustType {
    /// Type as written in generated code
    pub fn to_type_string(&self) -> String {
        self.to_string()
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, RustType::Option(_))
    }

    /// Whether values of this type can be compared with `Eq`
    pub fn is_eq(&self) -> bool {
        match self {
            RustType::F32 | RustType::F64 | RustType::Json => false,
            RustType::Option(inner) => inner.is_eq(),
            _ => true,
        }
    }
}

/// `COLUMN_TYPE` text split into its parts, e.g. `int(10) unsigned`
struct ColumnType<'a> {
    base: &'a str,
    width: Option<&'a str>,
}

impl<'a> ColumnType<'a> {
    fn parse(lowered: &'a str) -> Self {
        let head = lowered.split_whitespace().next().unwrap_or("");
        match head.split_once('(') {
            Some((base, rest)) => Self {
                base,
                width: rest.strip_suffix(')'),
            },
            None => Self {
                base: head,
                width: None,
            },
        }
    }
}

/// Resolve MySQL column types to Rust types
pub struct TypeResolver;

impl TypeResolver {
    /// Rust type of `column` in the struct named `struct_name`.
    ///
    /// Nullable columns are wrapped in `Option`.
    pub fn resolve(column: &ColumnMetadata, struct_name: &str) -> RustType {
        let base = if column.is_enum() {
            RustType::Enum(naming::to_enum_name(struct_name, &column.name))
        } else {
            let lowered = column.data_type.to_lowercase();
            Self::scalar(&ColumnType::parse(&lowered), column.is_unsigned)
        };

        if column.nullable {
            RustType::Option(Box::new(base))
        } else {
            base
        }
    }

    fn scalar(ty: &ColumnType<'_>, unsigned: bool) -> RustType {
        let int = |signed: RustType, unsigned_ty: RustType| {
            if unsigned {
                unsigned_ty
            } else {
                signed
            }
        };

        match (ty.base, ty.width) {
            ("bool" | "boolean", _) | ("tinyint" | "bit", Some("1")) => RustType::Bool,
            ("tinyint", _) => int(RustType::I8, RustType::U8),
            ("smallint", _) => int(RustType::I16, RustType::U16),
            ("year", _) => RustType::U16,
            ("mediumint" | "int" | "integer", _) => int(RustType::I32, RustType::U32),
            ("bigint", _) => int(RustType::I64, RustType::U64),
            ("float", _) => RustType::F32,
            ("double" | "real", _) => RustType::F64,
            ("decimal" | "numeric" | "dec" | "fixed", _) => RustType::Decimal,
            ("date", _) => RustType::NaiveDate,
            ("datetime" | "timestamp", _) => RustType::NaiveDateTime,
            ("time", _) => RustType::NaiveTime,
            ("json", _) => RustType::Json,
            ("binary" | "varbinary" | "bit", _) => RustType::Bytes,
            (base, _) if base.ends_with("blob") => RustType::Bytes,
            (
                "geometry" | "point" | "linestring" | "polygon" | "multipoint"
                | "multilinestring" | "multipolygon" | "geometrycollection",
                _,
            ) => RustType::Bytes,
            // char, varchar, *text, set, and anything unknown
            _ => RustType::String,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(data_type: &str, nullable: bool) -> ColumnMetadata {
        ColumnMetadata {
            name: "value".to_string(),
            data_type: data_type.to_string(),
            nullable,
            default_value: None,
            is_auto_increment: false,
            is_unsigned: data_type.to_lowercase().contains("unsigned"),
            enum_values: None,
            comment: None,
        }
    }

    fn resolve(data_type: &str) -> RustType {
        TypeResolver::resolve(&column(data_type, false), "Orders")
    }

    #[test]
    fn test_integer_types() {
        assert_eq!(resolve("bigint"), RustType::I64);
        assert_eq!(resolve("bigint(20) unsigned"), RustType::U64);
        assert_eq!(resolve("int(11)"), RustType::I32);
        assert_eq!(resolve("INT UNSIGNED"), RustType::U32);
        assert_eq!(resolve("mediumint"), RustType::I32);
        assert_eq!(resolve("smallint unsigned"), RustType::U16);
        assert_eq!(resolve("tinyint unsigned"), RustType::U8);
        assert_eq!(resolve("tinyint(4)"), RustType::I8);
        assert_eq!(resolve("year"), RustType::U16);
    }

    #[test]
    fn test_boolean_types() {
        assert_eq!(resolve("tinyint(1)"), RustType::Bool);
        assert_eq!(resolve("BOOL"), RustType::Bool);
        assert_eq!(resolve("bit(1)"), RustType::Bool);
        assert_eq!(resolve("bit(8)"), RustType::Bytes);
        assert_eq!(resolve("tinyint(10)"), RustType::I8);
    }

    #[test]
    fn test_text_and_binary_types() {
        assert_eq!(resolve("varchar(255)"), RustType::String);
        assert_eq!(resolve("char(2)"), RustType::String);
        assert_eq!(resolve("mediumtext"), RustType::String);
        assert_eq!(resolve("set('a','b')"), RustType::String);
        assert_eq!(resolve("varbinary(16)"), RustType::Bytes);
        assert_eq!(resolve("longblob"), RustType::Bytes);
        assert_eq!(resolve("point"), RustType::Bytes);
        assert_eq!(resolve("multipolygon"), RustType::Bytes);
        assert_eq!(resolve("inet6"), RustType::String);
    }

    #[test]
    fn test_temporal_types() {
        assert_eq!(resolve("datetime(3)"), RustType::NaiveDateTime);
        assert_eq!(resolve("timestamp"), RustType::NaiveDateTime);
        assert_eq!(resolve("date"), RustType::NaiveDate);
        assert_eq!(resolve("time(6)"), RustType::NaiveTime);
    }

    #[test]
    fn test_numeric_types() {
        assert_eq!(resolve("decimal(10,2)"), RustType::Decimal);
        assert_eq!(resolve("float"), RustType::F32);
        assert_eq!(resolve("double"), RustType::F64);
        assert_eq!(resolve("json"), RustType::Json);
    }

    #[test]
    fn test_nullable_wraps_in_option() {
        let ty = TypeResolver::resolve(&column("datetime", true), "Orders");
        assert_eq!(ty, RustType::Option(Box::new(RustType::NaiveDateTime)));
        assert!(ty.is_optional());
        assert_eq!(ty.to_type_string(), "Option<chrono::NaiveDateTime>");
    }

    #[test]
    fn test_enum_column() {
        let mut col = column("enum('new','paid')", true);
        col.name = "state".to_string();
        col.enum_values = Some(vec!["new".to_string(), "paid".to_string()]);
        assert_eq!(
            TypeResolver::resolve(&col, "Orders"),
            RustType::Option(Box::new(RustType::Enum("OrdersState".to_string())))
        );
    }

    #[test]
    fn test_type_strings() {
        assert_eq!(RustType::Bytes.to_type_string(), "Vec<u8>");
        assert_eq!(RustType::Decimal.to_type_string(), "rust_decimal::Decimal");
        assert_eq!(RustType::Json.to_string(), "serde_json::Value");
        assert!(!RustType::Option(Box::new(RustType::F64)).is_eq());
        assert!(RustType::Option(Box::new(RustType::U8)).is_eq());
    }
}
