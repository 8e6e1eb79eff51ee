//! CSV ingestion for collection rows.
//!
//! Parsing is pure: it takes the file text and returns rows in file order.
//! Only the `title` column is validated here; every other column is optional
//! and resolves to a default further down the pipeline.

use csv::{ReaderBuilder, StringRecord};

use crate::error::CsvInputError;

/// One data line of the input CSV, with raw string values.
///
/// Empty cells become `None` so the transformer never has to distinguish
/// "column absent" from "cell left blank".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowRecord {
    pub title: String,
    pub collection_type: Option<String>,
    pub handle: Option<String>,
    pub body_html: Option<String>,
    pub image_src: Option<String>,
    pub published: Option<String>,
    pub rules_json: Option<String>,
    pub disjunctive: Option<String>,
}

/// Parse CSV text into ordered [`RowRecord`]s.
///
/// Fails with [`CsvInputError::Empty`] when there are no data rows and
/// [`CsvInputError::MissingColumn`] when the header has no `title` column.
pub fn parse_records(text: &str) -> Result<Vec<RowRecord>, CsvInputError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let records = reader
        .records()
        .collect::<Result<Vec<StringRecord>, csv::Error>>()?;

    // The empty check comes first on purpose: a file with no rows is
    // reported as empty even when its header is also missing columns.
    if records.is_empty() {
        return Err(CsvInputError::Empty);
    }

    let title = column(&headers, "title").ok_or(CsvInputError::MissingColumn("title"))?;
    let collection_type = column(&headers, "type");
    let handle = column(&headers, "handle");
    let body_html = column(&headers, "body_html");
    let image_src = column(&headers, "image_src");
    let published = column(&headers, "published");
    let rules_json = column(&headers, "rules_json");
    let disjunctive = column(&headers, "disjunctive");

    let rows = records
        .iter()
        .map(|record| RowRecord {
            title: record.get(title).unwrap_or_default().to_string(),
            collection_type: cell(record, collection_type),
            handle: cell(record, handle),
            body_html: cell(record, body_html),
            image_src: cell(record, image_src),
            published: cell(record, published),
            rules_json: cell(record, rules_json),
            disjunctive: cell(record, disjunctive),
        })
        .collect();

    Ok(rows)
}

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn cell(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
