use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Straws handed out per successful match.
pub const STRAWS_PER_MATCH: u32 = 2;

/// Remaining straw count of a bull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capacity {
    Unlimited,
    Finite(u32),
}

impl Capacity {
    pub fn can_supply(&self, straws: u32) -> bool {
        match self {
            Capacity::Unlimited => true,
            Capacity::Finite(n) => *n >= straws,
        }
    }

    /// Consumes `straws` from the capacity. `Unlimited` is consumed nominally: every take
    /// succeeds and the value stays `Unlimited`, so it is never exhausted.
    /// For `Finite`, returns `None` when fewer than `straws` remain and leaves the count untouched.
    pub fn take(&mut self, straws: u32) -> Option<()> {
        match self {
            Capacity::Unlimited => Some(()),
            Capacity::Finite(n) => {
                *n = n.checked_sub(straws)?;
                Some(())
            }
        }
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Unlimited => write!(f, "unlimited"),
            Capacity::Finite(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bull {
    pub name: String,
    pub donator_name: String,
    pub donator_email: String,
    pub straws: Capacity,
    /// Junior member names, one entry per match, in draw order.
    pub juniors: Vec<String>,
}

impl Bull {
    pub fn new(name: String, donator_name: String, donator_email: String, straws: Capacity) -> Self {
        Self {
            name,
            donator_name,
            donator_email,
            straws,
            juniors: Vec::new(),
        }
    }
}

/// Position of a female in the store. Female names are not unique, so this is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AllocationState {
    #[default]
    Pending,
    Matched(String),
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Female {
    pub name: String,
    pub member_name: String,
    pub member_email: String,
    pub rank: u32,
    /// Bull names, already resolved against the bull list, in preference order.
    pub bull_choices: Vec<String>,
    pub allocation: AllocationState,
}

impl Female {
    pub fn bull_match(&self) -> Option<&str> {
        match &self.allocation {
            AllocationState::Matched(bull) => Some(bull),
            _ => None,
        }
    }
}

/// Typed bull row as handed over by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BullRecord {
    pub name: String,
    pub donator_name: String,
    pub donator_email: String,
    pub straws: Capacity,
}

/// Typed female row as handed over by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FemaleRecord {
    pub name: String,
    pub member_name: String,
    pub member_email: String,
    pub rank: u32,
    pub bull_choices: Vec<String>,
}

/// A preference naming a bull that is not on the bull list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedPreference {
    pub female_name: String,
    pub bull_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub rank: u32,
    pub applicant: ApplicantId,
    pub female_name: String,
    pub bull_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawOutcome {
    pub seed: u64,
    pub ranks_processed: Vec<u32>,
    pub events: Vec<MatchEvent>,
    pub matched: usize,
    pub unmatched: usize,
}

/// Serialized form of a finished draw, written as `match_log.json` when enabled.
#[derive(Debug, Clone, Serialize)]
pub struct MatchLog {
    pub completed_at: DateTime<Utc>,
    pub seed: u64,
    pub matched: usize,
    pub unmatched: usize,
    pub events: Vec<MatchEvent>,
}

impl From<&DrawOutcome> for MatchLog {
    fn from(outcome: &DrawOutcome) -> Self {
        Self {
            completed_at: Utc::now(),
            seed: outcome.seed,
            matched: outcome.matched,
            unmatched: outcome.unmatched,
            events: outcome.events.clone(),
        }
    }
}

/// Everything the load step needs after a draw.
#[derive(Debug, Clone)]
pub struct DrawResult {
    pub outcome: DrawOutcome,
    pub donator_csv: String,
    pub junior_csv: String,
    pub warnings: Vec<UnresolvedPreference>,
}
