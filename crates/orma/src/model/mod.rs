//! Model metadata: how an entity struct maps to a table.
//!
//! A [`Model`] is built once per entity type by the [`Registry`] and shared
//! as `Arc<Model>` afterwards. It is never mutated once cached; registration
//! options run against the freshly parsed model before it is stored.

mod entity;
mod registry;

#[cfg(test)]
mod tests;

pub use entity::{Entity, EntityDescriptor, EntityType, FieldDescriptor};
pub use registry::Registry;

use crate::error::{OrmError, OrmResult};
use std::collections::HashMap;

/// Tag key overriding the column name.
pub const TAG_KEY_COLUMN: &str = "column";

/// One mapped struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Logical name used by expressions (`col("name")`).
    pub name: String,
    /// Column name in the database.
    pub column: String,
    /// Rust type of the field.
    pub type_name: String,
    /// Declaration order.
    pub index: usize,
}

/// Table metadata for one entity.
#[derive(Debug, Clone)]
pub struct Model {
    pub table_name: String,
    pub fields: Vec<Field>,
    field_map: HashMap<String, usize>,
    column_map: HashMap<String, usize>,
}

impl Model {
    /// Fails with [`OrmError::DuplicateColumn`] when two fields share a column.
    pub(crate) fn new(table_name: String, fields: Vec<Field>) -> OrmResult<Self> {
        let field_map = fields
            .iter()
            .map(|f| (f.name.clone(), f.index))
            .collect();
        let mut column_map = HashMap::with_capacity(fields.len());
        for f in &fields {
            if let Some(&existing) = column_map.get(&f.column) {
                return Err(duplicate_column(&fields[existing], f, &f.column));
            }
            column_map.insert(f.column.clone(), f.index);
        }
        Ok(Self {
            table_name,
            fields,
            field_map,
            column_map,
        })
    }

    /// Look up a field by logical name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.field_map.get(name).map(|&i| &self.fields[i])
    }

    /// Look up a field by column name.
    pub fn field_by_column(&self, column: &str) -> Option<&Field> {
        self.column_map.get(column).map(|&i| &self.fields[i])
    }

    /// Column name for a logical field name.
    pub fn column_of(&self, name: &str) -> OrmResult<&str> {
        self.field(name)
            .map(|f| f.column.as_str())
            .ok_or_else(|| OrmError::unknown_field(name))
    }

    fn set_column(&mut self, name: &str, column: String) -> OrmResult<()> {
        let index = *self
            .field_map
            .get(name)
            .ok_or_else(|| OrmError::unknown_field(name))?;
        if let Some(&existing) = self.column_map.get(&column)
            && existing != index
        {
            return Err(duplicate_column(
                &self.fields[existing],
                &self.fields[index],
                &column,
            ));
        }
        let field = &mut self.fields[index];
        self.column_map.remove(&field.column);
        self.column_map.insert(column.clone(), index);
        field.column = column;
        Ok(())
    }
}

fn duplicate_column(existing: &Field, field: &Field, column: &str) -> OrmError {
    OrmError::DuplicateColumn {
        column: column.to_string(),
        field: field.name.clone(),
        existing: existing.name.clone(),
    }
}

/// A configuration step applied to a freshly parsed model at registration.
pub type ModelOption = Box<dyn FnOnce(&mut Model) -> OrmResult<()> + Send>;

/// Override the column name of a logical field.
///
/// Fails with [`OrmError::UnknownField`] when the field does not exist.
pub fn with_column_name(field: impl Into<String>, column: impl Into<String>) -> ModelOption {
    let field = field.into();
    let column = column.into();
    Box::new(move |model: &mut Model| model.set_column(&field, column))
}

/// Override the table name.
pub fn with_table_name(name: impl Into<String>) -> ModelOption {
    let name = name.into();
    Box::new(move |model: &mut Model| {
        model.table_name = name;
        Ok(())
    })
}

/// Convert a CamelCase identifier to snake_case.
///
/// An underscore goes before every uppercase letter except the first
/// character and the `D` of an `ID` pair: `UserId` -> `user_id`,
/// `ID` -> `id`, `UserID` -> `user_id`, `HTTPCode` -> `h_t_t_p_code`.
pub fn underscore_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            let id_pair = prev == Some('I') && c == 'D';
            if i != 0 && !id_pair {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Parse a `key1=value1,key2=value2` field tag.
pub(crate) fn parse_tag(tag: &str) -> OrmResult<HashMap<String, String>> {
    let mut res = HashMap::new();
    if tag.is_empty() {
        return Ok(res);
    }
    for pair in tag.split(',') {
        let kv: Vec<&str> = pair.split('=').collect();
        if kv.len() != 2 {
            return Err(OrmError::InvalidTagContent(pair.to_string()));
        }
        res.insert(kv[0].to_string(), kv[1].to_string());
    }
    Ok(res)
}
