//! Struct generator - renders Rust model files from collected tables

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::batch::{GeneratorOptions, ModelBatch, PendingModel};
use super::naming::{escape_field_name, to_enum_name, to_enum_variant};
use super::type_resolver::{RustType, TypeResolver};
use crate::catalog::{ColumnMetadata, TableMetadata};
use crate::error::{GenError, Result};

const GENERATED_NOTICE: &str = "Code generated by modelgen. DO NOT EDIT.";

const MOD_FILE: &str = "mod.rs";

/// A rendered, formatted source file and where it belongs
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFile {
    /// Table the file was rendered from, or `mod.rs` for the module file
    pub table: String,
    pub path: PathBuf,
    pub content: String,
}

/// Module and struct name a model is emitted under
struct Placement<'a> {
    model: &'a PendingModel,
    module: String,
    struct_name: String,
}

/// Render every model of the batch plus the `mod.rs` that declares them.
///
/// Nothing is written; the model files come first in collection order and
/// `mod.rs` last. Tables that map to the same module or struct name (such
/// as `UserProfile` and `user_profile`) get numeric suffixes in
/// collection order, so every table keeps its own file.
pub fn render_batch(batch: &ModelBatch) -> Result<Vec<RenderedFile>> {
    let options = batch.options();
    let placements = place_models(batch.models());
    let mut files = Vec::with_capacity(placements.len() + 1);

    for placement in &placements {
        let table = &placement.model.table.name;
        let code = render_model(placement.model, &placement.struct_name, options);
        debug!(
            "Rendered struct {} -> {}",
            placement.struct_name, placement.module
        );
        files.push(RenderedFile {
            table: table.clone(),
            path: options.output_dir.join(module_file_name(&placement.module)),
            content: format_source(table, &code)?,
        });
    }

    let mod_code = render_mod_file(&placements, options);
    files.push(RenderedFile {
        table: MOD_FILE.to_string(),
        path: options.output_dir.join(MOD_FILE),
        content: format_source(MOD_FILE, &mod_code)?,
    });

    Ok(files)
}

fn place_models(models: &[PendingModel]) -> Vec<Placement<'_>> {
    let modules = dedup_names(models.iter().map(|m| module_ident(&m.table.name)), |base, n| {
        format!("{}_{}", base.trim_start_matches("r#"), n)
    });
    let struct_names = dedup_names(models.iter().map(|m| m.struct_name.clone()), |base, n| {
        format!("{}{}", base, n)
    });

    models
        .iter()
        .zip(modules)
        .zip(struct_names)
        .map(|((model, module), struct_name)| {
            if module != module_ident(&model.table.name) || struct_name != model.struct_name {
                warn!(
                    "Table {} collides with another table; emitting {} in module {}",
                    model.table.name, struct_name, module
                );
            }
            Placement {
                model,
                module,
                struct_name,
            }
        })
        .collect()
}

/// Module identifier for a table (`type` -> `r#type`)
fn module_ident(table_name: &str) -> String {
    let module = escape_field_name(table_name);
    match module.as_str() {
        "" => "table".to_string(),
        // `mod.rs` is taken by the module file
        "r#mod" => "mod_".to_string(),
        _ => module,
    }
}

fn module_file_name(module: &str) -> String {
    format!("{}.rs", module.trim_start_matches("r#"))
}

/// Parse the rendered code and pretty-print it.
///
/// A parse failure means the table produced invalid Rust (for example a
/// struct name starting with a digit) and is reported against the table.
fn format_source(table_name: &str, code: &str) -> Result<String> {
    let file = syn::parse_file(code).map_err(|e| GenError::Generation {
        table: table_name.to_string(),
        message: format!("rendered code is not valid Rust: {}", e),
    })?;
    Ok(prettyplease::unparse(&file))
}

fn render_mod_file(placements: &[Placement<'_>], options: &GeneratorOptions) -> String {
    let mut code = String::new();
    code.push_str(&format!("//! Generated `{}` models\n", options.package));
    code.push_str(&format!("//!\n//! {}\n\n", GENERATED_NOTICE));

    for placement in placements {
        code.push_str(&format!("mod {};\n", placement.module));
        code.push_str(&format!("pub use {}::*;\n", placement.module));
    }
    code
}

/// Render a single model file for a table
fn render_model(model: &PendingModel, struct_name: &str, options: &GeneratorOptions) -> String {
    let table = &model.table;
    let serde = options.with_json_tag;

    let mut code = format!(
        "//! Model for table `{}`\n//!\n//! {}\n\n",
        table.name, GENERATED_NOTICE
    );
    if serde {
        code.push_str("use serde::{Deserialize, Serialize};\n\n");
    }

    for col in &table.columns {
        if let Some(values) = col.enum_values.as_deref().filter(|v| !v.is_empty()) {
            code.push_str(&render_enum(table, struct_name, col, values, serde));
            code.push('\n');
        }
    }

    let field_names = unique_field_names(&table.columns);
    let types: Vec<RustType> = table
        .columns
        .iter()
        .map(|col| TypeResolver::resolve(col, struct_name))
        .collect();

    code.push_str(&format!("/// Database table: `{}`\n", table.name));
    if let Some(comment) = &table.comment {
        code.push_str(&format!("///\n/// {}\n", doc_text(comment)));
    }

    let mut derives = vec!["Debug", "Clone", "PartialEq"];
    if types.iter().all(RustType::is_eq) {
        derives.push("Eq");
    }
    if serde {
        derives.extend(["Serialize", "Deserialize"]);
    }
    code.push_str(&format!(
        "#[derive({})]\npub struct {} {{\n",
        derives.join(", "),
        struct_name
    ));
    for ((field, ty), col) in field_names.iter().zip(&types).zip(&table.columns) {
        code.push_str(&render_field(table, col, field, ty, serde));
    }
    code.push_str("}\n\n");

    code.push_str(&format!(
        "impl {} {{\n    /// Name of the backing table\n    pub const TABLE_NAME: &'static str = {:?};\n}}\n",
        struct_name, table.name
    ));

    code
}

/// One struct field with its doc line and, when the serialized name would
/// differ, a serde rename to the column name
fn render_field(
    table: &TableMetadata,
    col: &ColumnMetadata,
    field: &str,
    ty: &RustType,
    serde: bool,
) -> String {
    let mut doc = format!("Column: `{}`", col.name);
    let notes = column_notes(table, &col.name);
    if !notes.is_empty() {
        doc.push_str(&format!(" ({})", notes.join(", ")));
    }
    if let Some(comment) = &col.comment {
        doc.push_str(&format!(" - {}", doc_text(comment)));
    }

    let rename = if serde && field != col.name {
        format!("    #[serde(rename = {:?})]\n", col.name)
    } else {
        String::new()
    };
    format!("    /// {}\n{}    pub {}: {},\n", doc, rename, field, ty)
}

/// Make names unique while keeping their order. A repeated name takes the
/// first free candidate `suffixed(name, 2)`, `suffixed(name, 3)`, ...
fn dedup_names<I, F>(names: I, suffixed: F) -> Vec<String>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str, usize) -> String,
{
    let mut used = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let name = if used.contains(&name) {
                (2..)
                    .map(|n| suffixed(&name, n))
                    .find(|candidate| !used.contains(candidate))
                    .unwrap_or_default()
            } else {
                name
            };
            used.insert(name.clone());
            name
        })
        .collect()
}

/// Field names for the columns, in order; `userId` and `user_id` become
/// `user_id` and `user_id_2`.
fn unique_field_names(columns: &[ColumnMetadata]) -> Vec<String> {
    dedup_names(
        columns.iter().map(|col| escape_field_name(&col.name)),
        |base, n| format!("{}_{}", base.trim_start_matches("r#"), n),
    )
}

/// Rust enum for an ENUM column, with `as_str` returning the stored value
fn render_enum(
    table: &TableMetadata,
    struct_name: &str,
    column: &ColumnMetadata,
    values: &[String],
    serde: bool,
) -> String {
    let enum_name = to_enum_name(struct_name, &column.name);
    let variants = dedup_names(values.iter().map(|v| to_enum_variant(v)), |v, n| {
        format!("{}{}", v, n)
    });

    let mut derives = vec!["Debug", "Clone", "Copy", "PartialEq", "Eq", "Hash"];
    if serde {
        derives.extend(["Serialize", "Deserialize"]);
    }

    let mut code = format!(
        "/// Values of `{}.{}`\n#[derive({})]\npub enum {} {{\n",
        table.name,
        column.name,
        derives.join(", "),
        enum_name
    );
    for (variant, value) in variants.iter().zip(values) {
        if serde && variant != value {
            code.push_str(&format!("    #[serde(rename = {:?})]\n", value));
        }
        code.push_str(&format!("    {},\n", variant));
    }
    code.push_str("}\n\n");

    let arms: String = variants
        .iter()
        .zip(values)
        .map(|(variant, value)| format!("            Self::{} => {:?},\n", variant, value))
        .collect();
    code.push_str(&format!(
        "impl {} {{\n    /// Value stored in the database\n    pub fn as_str(&self) -> &'static str {{\n        match self {{\n{}        }}\n    }}\n}}\n",
        enum_name, arms
    ));

    code
}

/// Key and index membership of a column
fn column_notes(table: &TableMetadata, column: &str) -> Vec<String> {
    let primary = table
        .is_primary_key_column(column)
        .then(|| "PRIMARY KEY".to_string());
    let indexes = table
        .indexes
        .iter()
        .filter(|index| index.columns.iter().any(|c| c == column))
        .map(|index| {
            let kind = if index.unique { "unique" } else { "index" };
            format!("{} `{}`", kind, index.name)
        });
    primary.into_iter().chain(indexes).collect()
}

/// Flatten free text into a single doc-comment line
fn doc_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
