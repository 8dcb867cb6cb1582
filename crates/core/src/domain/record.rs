use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Text form of the value. Whole numbers render without a fraction so a
    /// numeric `404` reads as `"404"`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(value) => Cow::Borrowed(value),
            Self::Number(value) if value.is_finite() && value.fract() == 0.0 => {
                Cow::Owned(format!("{}", *value as i64))
            }
            Self::Number(value) => Cow::Owned(value.to_string()),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Text(value) => value.trim().parse::<i64>().ok(),
            Self::Number(value) if value.is_finite() && value.fract() == 0.0 => Some(*value as i64),
            Self::Number(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(value) if value.is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One fetched row. `partition` names the slice of the source it came from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
}

impl Record {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            fields: pairs.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
            partition: None,
        }
    }

    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = Some(partition.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(FieldValue::as_text)
    }

    /// True when the field is missing or holds an empty string. Whitespace
    /// counts as content.
    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).map(FieldValue::is_blank).unwrap_or(true)
    }
}

/// Decodes a header-keyed table: the first row names the fields, short rows
/// are padded with empty text and surplus cells are dropped.
pub fn records_from_rows(rows: Vec<Vec<FieldValue>>, partition: &str) -> Vec<Record> {
    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header = header.iter().map(|cell| cell.as_text().into_owned()).collect::<Vec<_>>();

    rows.map(|row| {
        let mut cells = row.into_iter();
        let fields = header
            .iter()
            .map(|name| {
                (name.clone(), cells.next().unwrap_or_else(|| FieldValue::Text(String::new())))
            })
            .collect();
        Record { fields, partition: Some(partition.to_string()) }
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::{records_from_rows, FieldValue, Record};

    fn row(cells: &[&str]) -> Vec<FieldValue> {
        cells.iter().map(|cell| FieldValue::from(*cell)).collect()
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_truncated() {
        let records = records_from_rows(
            vec![
                row(&["Address", "Status Code", "H1-1"]),
                row(&["https://a.test/", "200"]),
                row(&["https://b.test/", "404", "Missing", "extra"]),
            ],
            "Internal",
        );

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("H1-1"), Some(&FieldValue::Text(String::new())));
        assert!(records[0].is_blank("H1-1"));
        assert_eq!(records[1].fields.len(), 3);
        assert_eq!(records[1].text("H1-1").as_deref(), Some("Missing"));
        assert!(records.iter().all(|record| record.partition.as_deref() == Some("Internal")));
    }

    #[test]
    fn empty_table_and_header_only_table_yield_nothing() {
        assert!(records_from_rows(Vec::new(), "Empty").is_empty());
        assert!(records_from_rows(vec![row(&["Address"])], "Header").is_empty());
    }

    #[test]
    fn numbers_render_as_plain_text() {
        assert_eq!(FieldValue::Number(404.0).as_text(), "404");
        assert_eq!(FieldValue::Number(1.5).as_text(), "1.5");
        assert_eq!(FieldValue::Number(250.0).as_integer(), Some(250));
        assert_eq!(FieldValue::from(" 120 ").as_integer(), Some(120));
        assert_eq!(FieldValue::from("n/a").as_integer(), None);
    }

    #[test]
    fn missing_field_counts_as_blank() {
        let record = Record::from_pairs([("Address", "https://a.test/")]);
        assert!(record.is_blank("Meta Description 1"));
        assert!(!record.is_blank("Address"));
    }

    #[test]
    fn whitespace_only_cell_is_not_blank() {
        let record = Record::from_pairs([("Meta Description 1", " "), ("H1-1", "")]);
        assert!(!record.is_blank("Meta Description 1"));
        assert!(record.is_blank("H1-1"));
        assert!(!FieldValue::Number(0.0).is_blank());
    }
}
