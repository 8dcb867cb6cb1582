//! Named predicates over crawl records.
//!
//! Only HTML documents are ever considered. Each [`IssueType`] selects one
//! predicate; categories without a predicate match nothing.

use crate::domain::intent::IssueType;
use crate::domain::record::Record;

pub mod columns {
    pub const ADDRESS: &str = "Address";
    pub const CONTENT_TYPE: &str = "Content Type";
    pub const META_DESCRIPTION: &str = "Meta Description 1";
    pub const WORD_COUNT: &str = "Word Count";
    pub const H1: &str = "H1-1";
    pub const STATUS_CODE: &str = "Status Code";
    pub const CANONICAL: &str = "Canonical Link Element 1";
}

pub const HTML_CONTENT_TYPE: &str = "text/html";
pub const LOW_WORD_COUNT_THRESHOLD: i64 = 300;

type Predicate = fn(&Record) -> bool;

/// Records matching `issue_type`, in input order.
pub fn evaluate(records: &[Record], issue_type: IssueType) -> Vec<&Record> {
    let Some(predicate) = predicate_for(issue_type) else {
        return Vec::new();
    };
    records.iter().filter(|record| is_html(record) && predicate(record)).collect()
}

pub fn predicate_for(issue_type: IssueType) -> Option<Predicate> {
    match issue_type {
        IssueType::MissingMeta => Some(missing_meta),
        IssueType::LowWordCount => Some(low_word_count),
        IssueType::MissingH1 => Some(missing_h1),
        IssueType::ErrorPages => Some(error_page),
        IssueType::MissingCanonical => Some(missing_canonical),
        IssueType::NonIndexable | IssueType::Unknown => None,
    }
}

pub fn is_html(record: &Record) -> bool {
    record
        .text(columns::CONTENT_TYPE)
        .map(|content_type| {
            content_type.trim_start().to_ascii_lowercase().starts_with(HTML_CONTENT_TYPE)
        })
        .unwrap_or(false)
}

fn missing_meta(record: &Record) -> bool {
    record.is_blank(columns::META_DESCRIPTION)
}

// Unparsable or absent counts never match.
fn low_word_count(record: &Record) -> bool {
    record
        .get(columns::WORD_COUNT)
        .and_then(|value| value.as_integer())
        .map(|count| count < LOW_WORD_COUNT_THRESHOLD)
        .unwrap_or(false)
}

fn missing_h1(record: &Record) -> bool {
    record.is_blank(columns::H1)
}

fn error_page(record: &Record) -> bool {
    record
        .text(columns::STATUS_CODE)
        .map(|status| status.starts_with('4') || status.starts_with('5'))
        .unwrap_or(false)
}

fn missing_canonical(record: &Record) -> bool {
    record.is_blank(columns::CANONICAL)
}

#[cfg(test)]
mod tests {
    use super::{columns, evaluate};
    use crate::domain::intent::IssueType;
    use crate::domain::record::{FieldValue, Record};

    fn page(address: &str, fields: &[(&str, &str)]) -> Record {
        let mut record = Record::from_pairs(fields.iter().copied());
        record.fields.insert(columns::ADDRESS.to_string(), FieldValue::from(address));
        record
            .fields
            .entry(columns::CONTENT_TYPE.to_string())
            .or_insert_with(|| FieldValue::from("text/html; charset=utf-8"));
        record
    }

    fn addresses(matches: &[&Record]) -> Vec<String> {
        matches
            .iter()
            .filter_map(|record| record.text(columns::ADDRESS).map(|value| value.into_owned()))
            .collect()
    }

    const ALL_TYPES: [IssueType; 7] = [
        IssueType::MissingMeta,
        IssueType::LowWordCount,
        IssueType::NonIndexable,
        IssueType::ErrorPages,
        IssueType::MissingH1,
        IssueType::MissingCanonical,
        IssueType::Unknown,
    ];

    #[test]
    fn missing_meta_matches_absent_or_empty_description_only() {
        let records = vec![
            page("https://a.test/", &[]),
            page("https://b.test/", &[(columns::META_DESCRIPTION, "")]),
            page("https://c.test/", &[(columns::META_DESCRIPTION, "A real description")]),
            page("https://d.test/", &[(columns::META_DESCRIPTION, "  ")]),
        ];

        let matches = evaluate(&records, IssueType::MissingMeta);
        assert_eq!(addresses(&matches), vec!["https://a.test/", "https://b.test/"]);
    }

    #[test]
    fn whitespace_only_cells_count_as_present() {
        let records = vec![page(
            "https://a.test/spaces",
            &[(columns::META_DESCRIPTION, " "), (columns::H1, " "), (columns::CANONICAL, " ")],
        )];

        assert!(evaluate(&records, IssueType::MissingMeta).is_empty());
        assert!(evaluate(&records, IssueType::MissingH1).is_empty());
        assert!(evaluate(&records, IssueType::MissingCanonical).is_empty());
    }

    #[test]
    fn non_html_records_never_match() {
        let records = vec![
            page("https://a.test/app.js", &[(columns::CONTENT_TYPE, "application/javascript")]),
            page("https://a.test/logo.png", &[(columns::CONTENT_TYPE, "image/png"), (columns::STATUS_CODE, "404"), (columns::WORD_COUNT, "0")]),
            Record::from_pairs([(columns::ADDRESS, "https://a.test/no-type")]),
        ];

        for issue_type in ALL_TYPES {
            assert!(evaluate(&records, issue_type).is_empty(), "{issue_type} matched non-html");
        }
    }

    #[test]
    fn low_word_count_skips_unparsable_values() {
        let records = vec![
            page("https://a.test/thin", &[(columns::WORD_COUNT, "120")]),
            page("https://a.test/edge", &[(columns::WORD_COUNT, "300")]),
            page("https://a.test/bad", &[(columns::WORD_COUNT, "n/a")]),
            page("https://a.test/blank", &[(columns::WORD_COUNT, "")]),
            page("https://a.test/absent", &[]),
        ];
        let mut numeric = page("https://a.test/numeric", &[]);
        numeric.fields.insert(columns::WORD_COUNT.to_string(), FieldValue::Number(42.0));

        let mut all = records;
        all.push(numeric);
        let matches = evaluate(&all, IssueType::LowWordCount);
        assert_eq!(addresses(&matches), vec!["https://a.test/thin", "https://a.test/numeric"]);
    }

    #[test]
    fn error_pages_match_4xx_and_5xx_text() {
        let mut numeric = page("https://a.test/gone", &[]);
        numeric.fields.insert(columns::STATUS_CODE.to_string(), FieldValue::Number(410.0));
        let records = vec![
            page("https://a.test/ok", &[(columns::STATUS_CODE, "200")]),
            page("https://a.test/missing", &[(columns::STATUS_CODE, "404")]),
            page("https://a.test/broken", &[(columns::STATUS_CODE, "503")]),
            page("https://a.test/redirect", &[(columns::STATUS_CODE, "301")]),
            numeric,
        ];

        let matches = evaluate(&records, IssueType::ErrorPages);
        assert_eq!(
            addresses(&matches),
            vec!["https://a.test/missing", "https://a.test/broken", "https://a.test/gone"]
        );
    }

    #[test]
    fn heading_and_canonical_predicates() {
        let records = vec![
            page("https://a.test/1", &[(columns::H1, "Welcome"), (columns::CANONICAL, "")]),
            page("https://a.test/2", &[(columns::CANONICAL, "https://a.test/2")]),
        ];
        assert_eq!(addresses(&evaluate(&records, IssueType::MissingH1)), vec!["https://a.test/2"]);
        assert_eq!(
            addresses(&evaluate(&records, IssueType::MissingCanonical)),
            vec!["https://a.test/1"]
        );
    }

    #[test]
    fn categories_without_predicate_match_nothing() {
        let records = vec![page("https://a.test/", &[])];
        assert!(evaluate(&records, IssueType::Unknown).is_empty());
        assert!(evaluate(&records, IssueType::NonIndexable).is_empty());
    }

    #[test]
    fn evaluation_is_repeatable() {
        let records = (0..20)
            .map(|index| {
                let description = if index % 3 == 0 { "" } else { "described" };
                page(&format!("https://a.test/{index}"), &[(columns::META_DESCRIPTION, description)])
            })
            .collect::<Vec<_>>();

        let first = addresses(&evaluate(&records, IssueType::MissingMeta));
        let second = addresses(&evaluate(&records, IssueType::MissingMeta));
        assert_eq!(first, second);
        assert_eq!(first.len(), 7);
    }
}
