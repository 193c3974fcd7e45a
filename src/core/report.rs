use crate::core::store::RecordStore;
use crate::domain::model::STRAWS_PER_MATCH;
use crate::utils::error::{DrawError, Result};
use serde::Serialize;

pub const NO_MATCH: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRow {
    /// Empty when nobody drew this bull.
    pub junior_name: String,
    pub bull_name: String,
    pub straws: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderGroup {
    pub donator_name: String,
    pub donator_email: String,
    pub rows: Vec<ProviderRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRow {
    pub female_name: String,
    pub bull_name: Option<String>,
    pub straws: Option<u32>,
    pub donator_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberGroup {
    pub member_name: String,
    pub member_email: String,
    pub rows: Vec<MemberRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProviderReport {
    pub groups: Vec<ProviderGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberReport {
    pub groups: Vec<MemberGroup>,
}

/// Read-only views over the store after a draw.
pub struct ReportAggregator;

impl ReportAggregator {
    /// One group per donator. Each bull lists its juniors sorted by name and counted, or a
    /// single zero row if nobody drew it.
    pub fn by_provider(store: &RecordStore) -> ProviderReport {
        let mut groups: Vec<ProviderGroup> = Vec::new();

        for bull in store.bulls_by_donator() {
            let starts_group = groups
                .last()
                .map(|g| g.donator_name != bull.donator_name)
                .unwrap_or(true);
            if starts_group {
                groups.push(ProviderGroup {
                    donator_name: bull.donator_name.clone(),
                    donator_email: bull.donator_email.clone(),
                    rows: Vec::new(),
                });
            }
            let Some(group) = groups.last_mut() else {
                continue;
            };

            let mut juniors: Vec<&str> = bull.juniors.iter().map(String::as_str).collect();
            juniors.sort_unstable();

            if juniors.is_empty() {
                group.rows.push(ProviderRow {
                    junior_name: String::new(),
                    bull_name: bull.name.clone(),
                    straws: 0,
                });
                continue;
            }

            for run in juniors.chunk_by(|a, b| a == b) {
                group.rows.push(ProviderRow {
                    junior_name: run[0].to_string(),
                    bull_name: bull.name.clone(),
                    straws: run.len() as u32 * STRAWS_PER_MATCH,
                });
            }
        }

        ProviderReport { groups }
    }

    /// One group per junior member, one row per female entered.
    pub fn by_member(store: &RecordStore) -> MemberReport {
        let mut groups: Vec<MemberGroup> = Vec::new();

        for (_, female) in store.females_by_member() {
            let starts_group = groups
                .last()
                .map(|g| g.member_name != female.member_name)
                .unwrap_or(true);
            if starts_group {
                groups.push(MemberGroup {
                    member_name: female.member_name.clone(),
                    member_email: female.member_email.clone(),
                    rows: Vec::new(),
                });
            }
            let Some(group) = groups.last_mut() else {
                continue;
            };

            let matched = female.bull_match().and_then(|name| store.bull(name));
            group.rows.push(match matched {
                Some(bull) => MemberRow {
                    female_name: female.name.clone(),
                    bull_name: Some(bull.name.clone()),
                    straws: Some(STRAWS_PER_MATCH),
                    donator_email: Some(bull.donator_email.clone()),
                },
                None => MemberRow {
                    female_name: female.name.clone(),
                    bull_name: None,
                    straws: None,
                    donator_email: None,
                },
            });
        }

        MemberReport { groups }
    }
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| DrawError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| DrawError::StateError {
        message: format!("report is not valid UTF-8: {}", e),
    })
}

impl ProviderReport {
    /// Renders `donator_output.csv`.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv_writer();
        for group in &self.groups {
            writer.write_record(["", "", ""])?;
            let contact = format!("at {}", group.donator_email);
            writer.write_record([
                "Result for",
                group.donator_name.as_str(),
                contact.as_str(),
            ])?;
            writer.write_record(["Junior Name", "Bull Name", "Number of Straws"])?;
            for row in &group.rows {
                let straws = row.straws.to_string();
                writer.write_record([
                    row.junior_name.as_str(),
                    row.bull_name.as_str(),
                    straws.as_str(),
                ])?;
            }
        }
        finish(writer)
    }
}

impl MemberReport {
    /// Renders `junior_output.csv`.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv_writer();
        for group in &self.groups {
            writer.write_record(["", "", "", ""])?;
            writer.write_record([
                "Result for",
                group.member_name.as_str(),
                "at",
                group.member_email.as_str(),
            ])?;
            writer.write_record(["Female Name", "Bull Name", "Number of Straws", "Email"])?;
            for row in &group.rows {
                let straws = row.straws.map(|s| s.to_string()).unwrap_or_default();
                writer.write_record([
                    row.female_name.as_str(),
                    row.bull_name.as_deref().unwrap_or(NO_MATCH),
                    straws.as_str(),
                    row.donator_email.as_deref().unwrap_or(""),
                ])?;
            }
        }
        finish(writer)
    }
}
