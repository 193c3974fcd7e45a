pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_csv_extension, validate_input_file, validate_non_empty_string, validate_path, Validate,
};
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use toml_config::DrawConfig;

pub const DEFAULT_DONATOR_FILE: &str = "donator_output.csv";
pub const DEFAULT_JUNIOR_FILE: &str = "junior_output.csv";
pub const MATCH_LOG_FILE: &str = "match_log.json";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "sdp-draw")]
#[command(about = "Draws bull semen straws for ranked females")]
pub struct CliConfig {
    /// Bull list, in csv format (eg. bull_list.csv)
    pub bull_file: Option<String>,

    /// Female list, in csv format (eg. female_list.csv)
    pub female_file: Option<String>,

    /// Directory the result files are written to
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Also write match_log.json with every match in draw order
    #[arg(long)]
    pub match_log: bool,

    /// Load, validate and draw, but write nothing
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Settings for one draw, merged from CLI flags, the TOML file and interactive prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSettings {
    pub bull_file: String,
    pub female_file: String,
    pub output_path: String,
    pub donator_file: String,
    pub junior_file: String,
    pub seed: Option<u64>,
    pub write_match_log: bool,
    pub dry_run: bool,
}

impl DrawSettings {
    pub fn new(bull_file: impl Into<String>, female_file: impl Into<String>) -> Self {
        Self {
            bull_file: bull_file.into(),
            female_file: female_file.into(),
            output_path: ".".to_string(),
            donator_file: DEFAULT_DONATOR_FILE.to_string(),
            junior_file: DEFAULT_JUNIOR_FILE.to_string(),
            seed: None,
            write_match_log: false,
            dry_run: false,
        }
    }

    /// CLI values win over the file. Input files missing from both are asked for with `prompt`.
    #[cfg(feature = "cli")]
    pub fn from_sources<F>(cli: &CliConfig, file: Option<&DrawConfig>, mut prompt: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let default_file = DrawConfig::default();
        let file = file.unwrap_or(&default_file);

        let bull_file = match cli.bull_file.clone().or_else(|| file.input.bull_file.clone()) {
            Some(path) => path,
            None => prompt("please enter the name of the bull list file, in csv format (eg. bull_list.csv)")?,
        };
        let female_file = match cli.female_file.clone().or_else(|| file.input.female_file.clone()) {
            Some(path) => path,
            None => prompt("please enter the name of the female list file, in csv format (eg. female_list.csv)")?,
        };

        let mut settings = Self::new(bull_file, female_file);
        if let Some(path) = cli.output_dir.clone().or_else(|| file.output.output_path.clone()) {
            settings.output_path = path;
        }
        if let Some(name) = file.output.donator_file.clone() {
            settings.donator_file = name;
        }
        if let Some(name) = file.output.junior_file.clone() {
            settings.junior_file = name;
        }
        settings.seed = cli.seed.or(file.draw.seed);
        settings.write_match_log = cli.match_log || file.output.write_match_log.unwrap_or(false);
        settings.dry_run = cli.dry_run;
        Ok(settings)
    }
}

impl ConfigProvider for DrawSettings {
    fn bull_file(&self) -> &str {
        &self.bull_file
    }

    fn female_file(&self) -> &str {
        &self.female_file
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn donator_file(&self) -> &str {
        &self.donator_file
    }

    fn junior_file(&self) -> &str {
        &self.junior_file
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn write_match_log(&self) -> bool {
        self.write_match_log
    }
}

impl Validate for DrawSettings {
    fn validate(&self) -> Result<()> {
        validate_input_file(&self.bull_file)?;
        validate_input_file(&self.female_file)?;
        validate_path("output_path", &self.output_path)?;
        validate_non_empty_string("donator_file", &self.donator_file)?;
        validate_non_empty_string("junior_file", &self.junior_file)?;
        validate_csv_extension(&self.donator_file)?;
        validate_csv_extension(&self.junior_file)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::utils::error::DrawError;
    use clap::Parser;

    #[test]
    fn test_cli_positional_files() {
        let cli = CliConfig::parse_from(["sdp-draw", "bulls.csv", "females.csv", "--seed", "42"]);
        let settings = DrawSettings::from_sources(&cli, None, |_| {
            panic!("no prompt expected")
        })
        .unwrap();

        assert_eq!(settings.bull_file, "bulls.csv");
        assert_eq!(settings.female_file, "females.csv");
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.output_path, ".");
        assert_eq!(settings.donator_file, DEFAULT_DONATOR_FILE);
    }

    #[test]
    fn test_missing_files_are_prompted() {
        let cli = CliConfig::parse_from(["sdp-draw"]);
        let mut asked = Vec::new();
        let settings = DrawSettings::from_sources(&cli, None, |question| {
            asked.push(question.to_string());
            Ok(format!("answer{}.csv", asked.len()))
        })
        .unwrap();

        assert_eq!(asked.len(), 2);
        assert!(asked[0].contains("bull list"));
        assert_eq!(settings.bull_file, "answer1.csv");
        assert_eq!(settings.female_file, "answer2.csv");
    }

    #[test]
    fn test_cli_overrides_file_config() {
        let file = DrawConfig::from_toml_str(
            r#"
[input]
bull_file = "from_file_bulls.csv"
female_file = "from_file_females.csv"

[output]
output_path = "./results"
write_match_log = true

[draw]
seed = 7
"#,
        )
        .unwrap();
        let cli = CliConfig::parse_from(["sdp-draw", "cli_bulls.csv", "--seed", "9"]);

        let settings = DrawSettings::from_sources(&cli, Some(&file), |_| {
            Err(DrawError::ConfigError {
                message: "no prompt expected".to_string(),
            })
        })
        .unwrap();

        assert_eq!(settings.bull_file, "cli_bulls.csv");
        assert_eq!(settings.female_file, "from_file_females.csv");
        assert_eq!(settings.output_path, "./results");
        assert_eq!(settings.seed, Some(9));
        assert!(settings.write_match_log);
    }

    #[test]
    fn test_validate_rejects_non_csv_input() {
        let settings = DrawSettings::new("bulls.txt", "females.csv");
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, DrawError::InvalidExtension { .. }));
    }
}
