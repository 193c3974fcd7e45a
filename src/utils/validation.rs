use crate::utils::error::{DrawError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[1-9][0-9]*$").expect("static integer pattern"))
}

/// Parses a strictly positive integer without sign or leading zeros.
pub fn parse_positive_integer(value: &str, file: &str, line: usize) -> Result<u32> {
    let trimmed = value.trim();
    let invalid = || DrawError::InvalidInteger {
        file: file.to_string(),
        line,
        value: value.to_string(),
    };

    if !integer_pattern().is_match(trimmed) {
        return Err(invalid());
    }
    trimmed.parse::<u32>().map_err(|_| DrawError::IntegerOverflow {
        file: file.to_string(),
        line,
        value: value.to_string(),
        max: u32::MAX,
    })
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DrawError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DrawError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_csv_extension(file: &str) -> Result<()> {
    let is_csv = Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "csv")
        .unwrap_or(false);

    if is_csv {
        Ok(())
    } else {
        Err(DrawError::InvalidExtension {
            file: file.to_string(),
        })
    }
}

pub fn validate_file_exists(file: &str) -> Result<()> {
    if Path::new(file).exists() {
        Ok(())
    } else {
        Err(DrawError::FileNotFound {
            file: file.to_string(),
        })
    }
}

/// Extension first, then existence, matching the order users see the checks in.
pub fn validate_input_file(file: &str) -> Result<()> {
    validate_csv_extension(file)?;
    validate_file_exists(file)
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DrawError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_integer() {
        assert_eq!(parse_positive_integer("12", "bulls.csv", 1).unwrap(), 12);
        assert_eq!(parse_positive_integer(" 7 ", "bulls.csv", 1).unwrap(), 7);
        assert!(parse_positive_integer("0", "bulls.csv", 1).is_err());
        assert!(parse_positive_integer("012", "bulls.csv", 1).is_err());
        assert!(parse_positive_integer("-3", "bulls.csv", 1).is_err());
        assert!(parse_positive_integer("two", "bulls.csv", 1).is_err());
        assert!(parse_positive_integer("", "bulls.csv", 1).is_err());
    }

    #[test]
    fn test_parse_positive_integer_reports_location() {
        let err = parse_positive_integer("1.5", "female_list.csv", 9).unwrap_err();
        match err {
            DrawError::InvalidInteger { file, line, value } => {
                assert_eq!(file, "female_list.csv");
                assert_eq!(line, 9);
                assert_eq!(value, "1.5");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_positive_integer_too_large() {
        let err = parse_positive_integer("5000000000", "bull_list.csv", 3).unwrap_err();
        match &err {
            DrawError::IntegerOverflow { file, line, value, max } => {
                assert_eq!(file, "bull_list.csv");
                assert_eq!(*line, 3);
                assert_eq!(value, "5000000000");
                assert_eq!(*max, u32::MAX);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("larger than the maximum of 4294967295"));
        assert_eq!(
            parse_positive_integer("4294967295", "bull_list.csv", 3).unwrap(),
            u32::MAX
        );
    }

    #[test]
    fn test_validate_csv_extension() {
        assert!(validate_csv_extension("bull_list.csv").is_ok());
        assert!(validate_csv_extension("dir/female_list.csv").is_ok());
        assert!(validate_csv_extension("bull_list.txt").is_err());
        assert!(validate_csv_extension("bull_list").is_err());
    }

    #[test]
    fn test_validate_input_file_missing() {
        let err = validate_input_file("definitely_missing_list.csv").unwrap_err();
        assert!(matches!(err, DrawError::FileNotFound { .. }));
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.output_path", "./out").is_ok());
        assert!(validate_path("output.output_path", "").is_err());
    }
}
