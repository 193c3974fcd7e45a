use crate::domain::model::{
    AllocationState, ApplicantId, Bull, BullRecord, Capacity, Female, FemaleRecord,
    UnresolvedPreference,
};
use crate::utils::error::{DrawError, Result};
use std::collections::HashMap;

/// Items batched by group key: groups appear in first-seen order, items keep input order
/// inside their group.
#[derive(Debug, Clone)]
pub struct GroupedOrder<T> {
    keys: Vec<String>,
    groups: HashMap<String, Vec<T>>,
}

impl<T> Default for GroupedOrder<T> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            groups: HashMap::new(),
        }
    }
}

impl<T> GroupedOrder<T> {
    pub fn insert(&mut self, key: &str, item: T) {
        match self.groups.get_mut(key) {
            Some(members) => members.push(item),
            None => {
                self.keys.push(key.to_string());
                self.groups.insert(key.to_string(), vec![item]);
            }
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn group(&self, key: &str) -> &[T] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.keys.iter().flat_map(move |key| self.group(key).iter())
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Bulls and females of one draw.
///
/// Bulls are owned by a single map keyed by name; females refer to them by name only.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    bulls: HashMap<String, Bull>,
    bull_order: GroupedOrder<String>,
    females: Vec<Female>,
    female_order: GroupedOrder<ApplicantId>,
    warnings: Vec<UnresolvedPreference>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from loader output. Bulls go in first so every preference can resolve.
    pub fn from_records(
        bulls: Vec<BullRecord>,
        females: Vec<FemaleRecord>,
    ) -> Result<(Self, Vec<UnresolvedPreference>)> {
        let mut store = Self::new();
        for bull in bulls {
            store.add_bull(bull)?;
        }

        let mut warnings = Vec::new();
        for female in females {
            warnings.extend(store.add_female(female)?);
        }
        Ok((store, warnings))
    }

    pub fn add_resource(
        &mut self,
        name: &str,
        provider: &str,
        contact: &str,
        capacity: Capacity,
    ) -> Result<()> {
        self.add_bull(BullRecord {
            name: name.to_string(),
            donator_name: provider.to_string(),
            donator_email: contact.to_string(),
            straws: capacity,
        })
    }

    pub fn add_bull(&mut self, record: BullRecord) -> Result<()> {
        if self.bulls.contains_key(&record.name) {
            return Err(DrawError::DuplicateKey {
                kind: "bull".to_string(),
                name: record.name,
            });
        }

        self.bull_order.insert(&record.donator_name, record.name.clone());
        let bull = Bull::new(
            record.name.clone(),
            record.donator_name,
            record.donator_email,
            record.straws,
        );
        self.bulls.insert(record.name, bull);
        Ok(())
    }

    pub fn add_applicant(
        &mut self,
        name: &str,
        member: &str,
        contact: &str,
        rank: u32,
        preference_names: &[&str],
    ) -> Result<Vec<UnresolvedPreference>> {
        self.add_female(FemaleRecord {
            name: name.to_string(),
            member_name: member.to_string(),
            member_email: contact.to_string(),
            rank,
            bull_choices: preference_names.iter().map(|p| p.to_string()).collect(),
        })
    }

    /// Adds a female, dropping preferences that name unknown bulls.
    pub fn add_female(&mut self, record: FemaleRecord) -> Result<Vec<UnresolvedPreference>> {
        if record.rank == 0 {
            return Err(DrawError::InvalidRank {
                name: record.name,
                rank: record.rank,
            });
        }

        let mut warnings = Vec::new();
        let mut bull_choices = Vec::with_capacity(record.bull_choices.len());
        for choice in record.bull_choices {
            if self.bulls.contains_key(&choice) {
                bull_choices.push(choice);
            } else if !choice.is_empty() {
                tracing::warn!("⚠️ Warning: bull with name {} could not be found.", choice);
                warnings.push(UnresolvedPreference {
                    female_name: record.name.clone(),
                    bull_name: choice,
                });
            }
        }

        self.warnings.extend(warnings.iter().cloned());
        let id = ApplicantId(self.females.len());
        self.female_order.insert(&record.member_name, id);
        self.females.push(Female {
            name: record.name,
            member_name: record.member_name,
            member_email: record.member_email,
            rank: record.rank,
            bull_choices,
            allocation: AllocationState::Pending,
        });
        Ok(warnings)
    }

    pub fn bull(&self, name: &str) -> Option<&Bull> {
        self.bulls.get(name)
    }

    pub(crate) fn bull_mut(&mut self, name: &str) -> Option<&mut Bull> {
        self.bulls.get_mut(name)
    }

    pub fn female(&self, id: ApplicantId) -> Option<&Female> {
        self.females.get(id.0)
    }

    pub(crate) fn female_mut(&mut self, id: ApplicantId) -> Option<&mut Female> {
        self.females.get_mut(id.0)
    }

    /// Females in insertion order, with their ids.
    pub fn females(&self) -> impl Iterator<Item = (ApplicantId, &Female)> + '_ {
        self.females
            .iter()
            .enumerate()
            .map(|(index, female)| (ApplicantId(index), female))
    }

    /// Bulls grouped by donator, donators in first-seen order.
    pub fn bulls_by_donator(&self) -> impl Iterator<Item = &Bull> + '_ {
        self.bull_order
            .iter()
            .filter_map(move |name| self.bulls.get(name))
    }

    /// Females grouped by junior member, members in first-seen order.
    pub fn females_by_member(&self) -> impl Iterator<Item = (ApplicantId, &Female)> + '_ {
        self.female_order
            .iter()
            .filter_map(move |id| self.females.get(id.0).map(|female| (*id, female)))
    }

    /// Every unresolved preference seen so far, in input order.
    pub fn warnings(&self) -> &[UnresolvedPreference] {
        &self.warnings
    }

    pub fn bull_count(&self) -> usize {
        self.bulls.len()
    }

    pub fn female_count(&self) -> usize {
        self.females.len()
    }
}
