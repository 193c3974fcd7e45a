use crate::core::rank::RankIndex;
use crate::core::store::RecordStore;
use crate::domain::model::{AllocationState, ApplicantId, DrawOutcome, MatchEvent, STRAWS_PER_MATCH};
use crate::utils::error::{DrawError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Runs the draw: ranks in ascending order, a fresh shuffle per rank, and each female takes
/// the first bull on her list that still has two straws.
///
/// The shuffle is the only source of randomness. Given the seed, every match is deterministic.
pub struct DrawEngine {
    rng: ChaCha8Rng,
    seed: u64,
}

impl DrawEngine {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        Self::with_seed(rand::random::<u64>())
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::from_entropy(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Consumes the engine; a finished draw is never re-run or rolled back.
    pub fn run(mut self, store: &mut RecordStore, index: &RankIndex) -> Result<DrawOutcome> {
        tracing::info!(
            "🎲 Starting draw for {} females across {} ranks (seed {})",
            index.len(),
            index.rank_count(),
            self.seed
        );

        let mut outcome = DrawOutcome {
            seed: self.seed,
            ranks_processed: Vec::with_capacity(index.rank_count()),
            events: Vec::new(),
            matched: 0,
            unmatched: 0,
        };

        for (rank, ids) in index.iter() {
            let mut order = ids.to_vec();
            order.shuffle(&mut self.rng);
            tracing::debug!("Rank {}: draw order {:?}", rank, order);

            for id in order {
                match allocate(store, id)? {
                    Some(bull_name) => {
                        let female_name = store
                            .female(id)
                            .map(|f| f.name.clone())
                            .unwrap_or_default();
                        tracing::info!("{} matched with {}", female_name, bull_name);
                        outcome.events.push(MatchEvent {
                            rank,
                            applicant: id,
                            female_name,
                            bull_name,
                        });
                        outcome.matched += 1;
                    }
                    None => outcome.unmatched += 1,
                }
            }
            outcome.ranks_processed.push(rank);
        }

        tracing::info!(
            "✅ Draw finished: {} matched, {} without a match",
            outcome.matched,
            outcome.unmatched
        );
        Ok(outcome)
    }
}

/// Matches one female against her list in declared order. Returns the bull name on success.
fn allocate(store: &mut RecordStore, id: ApplicantId) -> Result<Option<String>> {
    let female = store.female(id).ok_or_else(|| DrawError::StateError {
        message: format!("female {:?} is not in the store", id),
    })?;
    if female.allocation != AllocationState::Pending {
        return Err(DrawError::StateError {
            message: format!("female {} was already drawn", female.name),
        });
    }

    let member_name = female.member_name.clone();
    let chosen = female
        .bull_choices
        .iter()
        .find(|name| {
            store
                .bull(name)
                .map(|bull| bull.straws.can_supply(STRAWS_PER_MATCH))
                .unwrap_or(false)
        })
        .cloned();

    let allocation = match &chosen {
        Some(bull_name) => {
            let bull = store.bull_mut(bull_name).ok_or_else(|| DrawError::StateError {
                message: format!("bull {} disappeared during the draw", bull_name),
            })?;
            bull.straws
                .take(STRAWS_PER_MATCH)
                .ok_or_else(|| DrawError::StateError {
                    message: format!("bull {} ran out of straws mid-match", bull_name),
                })?;
            bull.juniors.push(member_name);
            AllocationState::Matched(bull_name.clone())
        }
        None => AllocationState::Unmatched,
    };

    if let Some(female) = store.female_mut(id) {
        female.allocation = allocation;
    }
    Ok(chosen)
}
