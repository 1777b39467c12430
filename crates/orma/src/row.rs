//! Result rows and mapping them onto entities.

use crate::error::{OrmError, OrmResult};
use crate::model::{Entity, Model};
use crate::value::Value;

/// One result row: column names paired with cell values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Build a row; extra names or values beyond the shorter list are dropped.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        let mut row = Self { columns, values };
        let len = row.columns.len().min(row.values.len());
        row.columns.truncate(len);
        row.values.truncate(len);
        row
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Cell by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let (columns, values) = iter
            .into_iter()
            .map(|(c, v)| (Into::<String>::into(c), Into::<Value>::into(v)))
            .unzip();
        Self { columns, values }
    }
}

/// Map a row onto a fresh `T`, column by column.
///
/// Every column must belong to the model; a column with no mapped field fails
/// with [`OrmError::UnknownColumn`].
pub(crate) fn scan<T: Entity + Default>(model: &Model, row: Row) -> OrmResult<T> {
    let mut entity = T::default();
    for (column, value) in row.columns.into_iter().zip(row.values) {
        let field = model
            .field_by_column(&column)
            .ok_or_else(|| OrmError::UnknownColumn(column.clone()))?;
        entity.set_field(&field.name, value)?;
    }
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Registry;
    use crate::testing::TestModel;

    #[test]
    fn test_scan() {
        let registry = Registry::new();
        let model = registry.get::<TestModel>().unwrap();
        let row: Row = [
            ("id", Value::Int(1)),
            ("first_name", Value::from("Tom")),
            ("age", Value::Int(18)),
            ("last_name", Value::Null),
        ]
        .into_iter()
        .collect();

        let got: TestModel = scan(&model, row).unwrap();
        assert_eq!(
            got,
            TestModel {
                id: 1,
                first_name: "Tom".into(),
                age: 18,
                last_name: None,
            }
        );
    }

    #[test]
    fn test_scan_subset_of_columns() {
        let registry = Registry::new();
        let model = registry.get::<TestModel>().unwrap();
        let row: Row = [("first_name", "Jerry")].into_iter().collect();

        let got: TestModel = scan(&model, row).unwrap();
        assert_eq!(got.first_name, "Jerry");
        assert_eq!(got.id, 0);
    }

    #[test]
    fn test_scan_unknown_column() {
        let registry = Registry::new();
        let model = registry.get::<TestModel>().unwrap();
        let row: Row = [("nickname", "x")].into_iter().collect();

        let err = scan::<TestModel>(&model, row).unwrap_err();
        assert!(matches!(err, OrmError::UnknownColumn(ref c) if c == "nickname"));
    }

    #[test]
    fn test_scan_type_mismatch() {
        let registry = Registry::new();
        let model = registry.get::<TestModel>().unwrap();
        let row: Row = [("age", "old")].into_iter().collect();

        let err = scan::<TestModel>(&model, row).unwrap_err();
        assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "age"));
    }

    #[test]
    fn test_row_get() {
        let row = Row::new(vec!["a".into(), "b".into()], vec![Value::Int(1)]);
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("a"), Some(&Value::Int(1)));
        assert_eq!(row.get("b"), None);
    }
}
