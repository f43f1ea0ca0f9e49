use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct ClientRecord {
    pub(crate) reference: String,
    pub(crate) name: String,
    pub(crate) onboarded_on: Option<NaiveDate>,
    pub(crate) archived: bool,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<ClientRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<ClientRow>() {
        let row = record?;
        let onboarded_on = row.onboarded_date();
        let archived = row.is_archived();
        records.push(ClientRecord {
            reference: row.reference,
            name: row.name,
            onboarded_on,
            archived,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ClientRow {
    #[serde(rename = "Client Ref")]
    reference: String,
    #[serde(rename = "Client Name")]
    name: String,
    #[serde(rename = "Onboarded", default, deserialize_with = "empty_string_as_none")]
    onboarded: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

impl ClientRow {
    fn onboarded_date(&self) -> Option<NaiveDate> {
        self.onboarded.as_deref().and_then(parse_date)
    }

    fn is_archived(&self) -> bool {
        self.status
            .as_deref()
            .map(|status| {
                let lowered = status.trim().to_ascii_lowercase();
                lowered == "archived" || lowered == "closed"
            })
            .unwrap_or(false)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}
