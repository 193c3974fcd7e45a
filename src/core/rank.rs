use crate::core::store::RecordStore;
use crate::domain::model::ApplicantId;
use std::collections::BTreeMap;

/// Females bucketed by rank. Only ranks that hold at least one female are stored; any other
/// rank reads as an empty bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankIndex {
    buckets: BTreeMap<u32, Vec<ApplicantId>>,
}

impl RankIndex {
    pub fn build(store: &RecordStore) -> Self {
        let mut buckets: BTreeMap<u32, Vec<ApplicantId>> = BTreeMap::new();
        for (id, female) in store.females() {
            // ranks are validated >= 1 when the female enters the store
            if female.rank == 0 {
                continue;
            }
            buckets.entry(female.rank).or_default().push(id);
        }
        Self { buckets }
    }

    pub fn max_rank(&self) -> u32 {
        self.buckets.keys().next_back().copied().unwrap_or(0)
    }

    pub fn bucket(&self, rank: u32) -> &[ApplicantId] {
        self.buckets.get(&rank).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Occupied ranks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[ApplicantId])> + '_ {
        self.buckets.iter().map(|(rank, ids)| (*rank, ids.as_slice()))
    }

    pub fn rank_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaps_read_as_empty_buckets() {
        let mut store = RecordStore::new();
        store.add_applicant("A", "Ann", "a@x", 3, &[]).unwrap();
        store.add_applicant("B", "Bob", "b@x", 1, &[]).unwrap();
        store.add_applicant("C", "Ann", "a@x", 3, &[]).unwrap();

        let index = RankIndex::build(&store);
        assert_eq!(index.max_rank(), 3);
        assert_eq!(index.rank_count(), 2);
        assert_eq!(index.bucket(1), &[ApplicantId(1)]);
        assert!(index.bucket(2).is_empty());
        assert_eq!(index.bucket(3), &[ApplicantId(0), ApplicantId(2)]);
        assert!(index.bucket(0).is_empty());
        assert!(index.bucket(4).is_empty());

        let ranks: Vec<u32> = index.iter().map(|(rank, _)| rank).collect();
        assert_eq!(ranks, vec![1, 3]);
    }

    #[test]
    fn test_huge_rank_does_not_allocate_intermediate_buckets() {
        let mut store = RecordStore::new();
        store.add_applicant("A", "Ann", "a@x", 1, &[]).unwrap();
        store
            .add_applicant("B", "Bob", "b@x", 4_000_000_000, &[])
            .unwrap();

        let index = RankIndex::build(&store);

        assert_eq!(index.max_rank(), 4_000_000_000);
        assert_eq!(index.rank_count(), 2);
        assert_eq!(index.bucket(4_000_000_000), &[ApplicantId(1)]);
        assert!(index.bucket(2).is_empty());
    }

    #[test]
    fn test_every_female_in_exactly_one_bucket() {
        let mut store = RecordStore::new();
        for (i, rank) in [2, 1, 2, 5, 1, 4].iter().enumerate() {
            store
                .add_applicant(&format!("F{}", i), "Ann", "a@x", *rank, &[])
                .unwrap();
        }

        let index = RankIndex::build(&store);
        assert_eq!(index.len(), store.female_count());

        let mut seen: Vec<_> = index.iter().flat_map(|(_, ids)| ids.iter().copied()).collect();
        seen.sort();
        let expected: Vec<_> = (0..6).map(ApplicantId).collect();
        assert_eq!(seen, expected);

        for (rank, ids) in index.iter() {
            for id in ids {
                assert_eq!(store.female(*id).unwrap().rank, rank);
            }
        }
    }

    #[test]
    fn test_empty_store_has_no_ranks() {
        let index = RankIndex::build(&RecordStore::new());
        assert_eq!(index.max_rank(), 0);
        assert!(index.is_empty());
        assert_eq!(index.iter().count(), 0);
    }
}
