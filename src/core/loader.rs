use crate::domain::model::{BullRecord, Capacity, FemaleRecord};
use crate::utils::error::{DrawError, Result};
use crate::utils::validation::parse_positive_integer;
use regex::Regex;
use std::io::Read;
use std::sync::OnceLock;

const BULL_HEADER: &str = "bullnamedonatornamedonatoremailstraws";
const FEMALE_HEADER_PREFIX: &str = "femalenamemembernamememberemailrank";
const UNLIMITED: &str = "unlimited";
const BOM: char = '\u{feff}';

fn bull_columns_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(bull[0-9]+)*$").expect("static header pattern"))
}

/// Lowercased row content with whitespace, commas and byte order marks removed.
fn normalize(fields: &csv::StringRecord) -> String {
    fields
        .iter()
        .flat_map(str::chars)
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != BOM)
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_female_header(normalized: &str) -> bool {
    normalized
        .strip_prefix(FEMALE_HEADER_PREFIX)
        .map(|rest| bull_columns_pattern().is_match(rest))
        .unwrap_or(false)
}

fn reader_for<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
}

fn field(record: &csv::StringRecord, index: usize, name: &str, file: &str, line: usize) -> Result<String> {
    record
        .get(index)
        .map(|value| value.trim_start_matches(BOM).to_string())
        .ok_or_else(|| DrawError::MissingField {
            file: file.to_string(),
            line,
            field: name.to_string(),
        })
}

fn parse_capacity(value: &str, file: &str, line: usize) -> Result<Capacity> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if compact == UNLIMITED {
        return Ok(Capacity::Unlimited);
    }
    parse_positive_integer(value, file, line).map(Capacity::Finite)
}

/// Reads `name, donator, email, straws` rows. Blank rows and the header row are skipped.
pub fn parse_bulls<R: Read>(reader: R, file: &str) -> Result<Vec<BullRecord>> {
    let mut csv_reader = reader_for(reader);
    let mut bulls = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        let normalized = normalize(&record);
        if normalized.is_empty() || normalized == BULL_HEADER {
            continue;
        }

        let straws = field(&record, 3, "straws", file, line)?;
        bulls.push(BullRecord {
            name: field(&record, 0, "bull name", file, line)?,
            donator_name: field(&record, 1, "donator name", file, line)?,
            donator_email: field(&record, 2, "donator email", file, line)?,
            straws: parse_capacity(&straws, file, line)?,
        });
    }

    tracing::debug!("Parsed {} bulls from {}", bulls.len(), file);
    Ok(bulls)
}

/// Reads `name, member, email, rank, bull1..bullN` rows. Blank preference cells are kept
/// and ignored later.
pub fn parse_females<R: Read>(reader: R, file: &str) -> Result<Vec<FemaleRecord>> {
    let mut csv_reader = reader_for(reader);
    let mut females = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        let normalized = normalize(&record);
        if normalized.is_empty() || is_female_header(&normalized) {
            continue;
        }

        let rank = field(&record, 3, "rank", file, line)?;
        females.push(FemaleRecord {
            name: field(&record, 0, "female name", file, line)?,
            member_name: field(&record, 1, "member name", file, line)?,
            member_email: field(&record, 2, "member email", file, line)?,
            rank: parse_positive_integer(&rank, file, line)?,
            bull_choices: record.iter().skip(4).map(str::to_string).collect(),
        });
    }

    tracing::debug!("Parsed {} females from {}", females.len(), file);
    Ok(females)
}
