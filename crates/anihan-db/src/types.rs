//! Dynamic SQLite values and rows.

use crate::DbError;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row as _, Sqlite, TypeInfo, ValueRef};

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// One SQLite storage-class value, used both for bind parameters and results.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Integers as-is, reals truncated.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn bind<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        match self {
            Value::Null => query.bind(None::<i64>),
            Value::Integer(i) => query.bind(*i),
            Value::Real(f) => query.bind(*f),
            Value::Text(s) => query.bind(s.clone()),
            Value::Blob(b) => query.bind(b.clone()),
        }
    }

    fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Integer(i) => Json::from(*i),
            Value::Real(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Text(s) => Json::String(s.clone()),
            // non UTF-8 blobs become base64
            Value::Blob(b) => Json::String(match std::str::from_utf8(b) {
                Ok(text) => text.to_string(),
                Err(_) => base64::engine::general_purpose::STANDARD.encode(b),
            }),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => |$v:ident| $body:expr),+ $(,)?) => {
        $(impl From<$ty> for Value {
            fn from($v: $ty) -> Self {
                $body
            }
        })+
    };
}

value_from! {
    i32 => |v| Value::Integer(i64::from(v)),
    i64 => |v| Value::Integer(v),
    u32 => |v| Value::Integer(i64::from(v)),
    f64 => |v| Value::Real(v),
    bool => |v| Value::Integer(i64::from(v)),
    &str => |v| Value::Text(v.to_string()),
    String => |v| Value::Text(v),
    &String => |v| Value::Text(v.clone()),
    Vec<u8> => |v| Value::Blob(v),
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A result row with its column names.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Values are classified by their runtime storage class, not the declared
    /// column type, so a `REAL` column holding an integer comes back as
    /// [`Value::Integer`].
    pub(crate) fn from_sqlite(row: &SqliteRow) -> Result<Self, DbError> {
        let columns: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
        let mut values = Vec::with_capacity(columns.len());

        for index in 0..columns.len() {
            let raw = row
                .try_get_raw(index)
                .map_err(|e| DbError::TypeError(e.to_string()))?;
            if raw.is_null() {
                values.push(Value::Null);
                continue;
            }
            let storage = raw.type_info().name().to_string();
            let value = match storage.as_str() {
                "INTEGER" | "BIGINT" | "BOOLEAN" => {
                    Value::Integer(row.try_get_unchecked::<i64, _>(index)?)
                }
                "REAL" | "NUMERIC" => Value::Real(row.try_get_unchecked::<f64, _>(index)?),
                "BLOB" => Value::Blob(row.try_get_unchecked::<Vec<u8>, _>(index)?),
                _ => Value::Text(row.try_get_unchecked::<String, _>(index)?),
            };
            values.push(value);
        }

        Ok(Self { columns, values })
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.values.get(index)
    }

    /// NULL and missing columns both read as `None`.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(Value::as_text).map(str::to_string)
    }

    pub fn integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_integer)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The row as a JSON object keyed by column name.
    pub fn to_json(&self) -> Json {
        Json::Object(
            self.columns
                .iter()
                .cloned()
                .zip(self.values.iter().map(Value::to_json))
                .collect(),
        )
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DbError> {
        Ok(serde_json::from_value(self.to_json())?)
    }
}

/// Rows returned by [`Db::query`](crate::Db::query).
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn deserialize_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, DbError> {
        self.rows.iter().map(Row::deserialize).collect()
    }
}

/// Outcome of a statement that doesn't return rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Execution {
    /// Rows inserted, updated or deleted.
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(true), Value::Integer(1));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from("kg"), Value::Text("kg".to_string()));
        assert_eq!(Value::from(&"Compost".to_string()).as_text(), Some("Compost"));
        assert_eq!(Value::Real(2.9).as_integer(), Some(2));
    }

    #[test]
    fn test_row_deserialize() {
        #[derive(Deserialize)]
        struct Item {
            id: i64,
            name: String,
            price: f64,
            note: Option<String>,
        }

        let row = Row::new(
            vec!["id".into(), "name".into(), "price".into(), "note".into()],
            vec![
                Value::Integer(7),
                Value::Text("Banana Compost".into()),
                Value::Integer(25),
                Value::Null,
            ],
        );

        let item: Item = row.deserialize().unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.name, "Banana Compost");
        assert_eq!(item.price, 25.0);
        assert!(item.note.is_none());
    }

    #[test]
    fn test_row_accessors() {
        let row = Row::new(
            vec!["vendor_full_name".into(), "vendor_id".into()],
            vec![Value::Text("Maria Santos".into()), Value::Null],
        );
        assert_eq!(row.text("vendor_full_name").as_deref(), Some("Maria Santos"));
        assert_eq!(row.integer("vendor_id"), None);
        assert_eq!(row.text("missing"), None);
    }

    #[test]
    fn test_binary_blob_is_base64() {
        let json = Value::Blob(vec![0xff, 0xfe]).to_json();
        assert_eq!(json, serde_json::Value::String("//4=".to_string()));
    }
}
