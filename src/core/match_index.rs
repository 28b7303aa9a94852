//! Bucket index for the indexed matcher
//!
//! The index maps date → amount magnitude → direction → bucket, where a
//! bucket holds every bank record sharing that key. Each bucket is its own
//! `Mutex`, and the mutex owns the exclusive borrows of its records, so the
//! read and the write of a matched flag always happen under the bucket lock.
//!
//! # Lifecycle
//!
//! ```text
//! build (single thread) → claim (many workers, shared &self) → drop
//! ```
//!
//! The maps are never structurally mutated after `build`; workers only lock
//! buckets that already exist.

use crate::core::predicate::MatchKey;
use crate::types::{BankRecord, Direction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Bank records sharing one key, guarded by their own lock
pub type Bucket<'a> = Mutex<Vec<&'a mut BankRecord>>;

type ByDirection<'a> = HashMap<Direction, Bucket<'a>>;
type ByMagnitude<'a> = HashMap<Decimal, ByDirection<'a>>;

/// Three-level (date, magnitude, direction) index over borrowed bank records
#[derive(Debug, Default)]
pub struct MatchIndex<'a> {
    by_date: HashMap<NaiveDate, ByMagnitude<'a>>,
    bucket_count: usize,
    indexed_records: usize,
}

impl<'a> MatchIndex<'a> {
    /// Build the index in a single pass
    ///
    /// Buckets and their locks are created on first use. Records without a
    /// key (unparseable date, zero amount) can never match and are left out.
    /// Within a bucket records keep their iteration order.
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a mut BankRecord>,
    {
        let mut by_date: HashMap<NaiveDate, ByMagnitude<'a>> = HashMap::new();
        let mut bucket_count = 0;
        let mut indexed_records = 0;

        for record in records {
            let Some(key) = MatchKey::for_bank_record(record) else {
                continue;
            };

            let bucket = by_date
                .entry(key.date)
                .or_default()
                .entry(key.magnitude)
                .or_default()
                .entry(key.direction)
                .or_insert_with(|| {
                    bucket_count += 1;
                    Mutex::new(Vec::new())
                });
            bucket
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .push(record);
            indexed_records += 1;
        }

        Self {
            by_date,
            bucket_count,
            indexed_records,
        }
    }

    /// Direct lookup; `None` as soon as any level is missing
    pub fn bucket(&self, key: &MatchKey) -> Option<&Bucket<'a>> {
        self.by_date
            .get(&key.date)?
            .get(&key.magnitude)?
            .get(&key.direction)
    }

    /// Claim the first unmatched record of the key's bucket
    ///
    /// Locks the bucket, marks the first unmatched entry, releases the lock.
    /// Returns false without scanning when the bucket does not exist.
    pub fn claim(&self, key: &MatchKey) -> bool {
        let Some(bucket) = self.bucket(key) else {
            return false;
        };

        let mut records = bucket.lock().unwrap_or_else(PoisonError::into_inner);
        match records.iter_mut().find(|record| !record.is_matched()) {
            Some(record) => {
                record.mark_matched();
                true
            }
            None => false,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    pub fn indexed_records(&self) -> usize {
        self.indexed_records
    }

    /// Number of records in the bucket for `key`
    pub fn bucket_len(&self, key: &MatchKey) -> Option<usize> {
        self.bucket(key)
            .map(|bucket| bucket.lock().unwrap_or_else(PoisonError::into_inner).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn key(d: u32, cents: i64, direction: Direction) -> MatchKey {
        MatchKey {
            date: day(d),
            magnitude: Decimal::new(cents, 2).normalize(),
            direction,
        }
    }

    fn ledger() -> Vec<BankRecord> {
        vec![
            BankRecord::new("B1", Decimal::new(-10000, 2), "2025-06-05"),
            BankRecord::new("B2", Decimal::new(-10000, 2), "2025-06-05"),
            BankRecord::new("B3", Decimal::new(10000, 2), "2025-06-05"),
            BankRecord::new("B4", Decimal::new(-10000, 2), "2025-06-06"),
            BankRecord::new("B5", Decimal::new(-5000, 2), "2025-06-05"),
            BankRecord::new("B6", Decimal::new(-5000, 2), "not a date"),
            BankRecord::new("B7", Decimal::ZERO, "2025-06-05"),
        ]
    }

    #[test]
    fn test_build_groups_by_key() {
        let mut records = ledger();
        let index = MatchIndex::build(records.iter_mut());

        assert_eq!(index.indexed_records(), 5);
        assert_eq!(index.bucket_count(), 4);
        assert_eq!(index.bucket_len(&key(5, 10000, Direction::Debit)), Some(2));
        assert_eq!(index.bucket_len(&key(5, 10000, Direction::Credit)), Some(1));
        assert_eq!(index.bucket_len(&key(6, 10000, Direction::Debit)), Some(1));
        assert_eq!(index.bucket_len(&key(5, 5000, Direction::Debit)), Some(1));
    }

    #[test]
    fn test_missing_levels_return_none() {
        let mut records = ledger();
        let index = MatchIndex::build(records.iter_mut());

        assert!(index.bucket(&key(7, 10000, Direction::Debit)).is_none());
        assert!(index.bucket(&key(5, 777, Direction::Debit)).is_none());
        assert!(index.bucket(&key(6, 10000, Direction::Credit)).is_none());
        assert!(!index.claim(&key(7, 10000, Direction::Debit)));
    }

    #[test]
    fn test_claim_is_first_fit_and_exhausts_bucket() {
        let mut records = ledger();
        {
            let index = MatchIndex::build(records.iter_mut());
            let debit = key(5, 10000, Direction::Debit);
            assert!(index.claim(&debit));
            assert!(index.claim(&debit));
            assert!(!index.claim(&debit));
        }

        assert!(records[0].is_matched());
        assert!(records[1].is_matched());
        assert!(!records[2].is_matched());
        assert!(!records[3].is_matched());
    }

    #[test]
    fn test_claim_skips_already_matched_records() {
        let mut records = ledger();
        records[0].mark_matched();
        {
            let index = MatchIndex::build(records.iter_mut());
            assert!(index.claim(&key(5, 10000, Direction::Debit)));
            assert!(!index.claim(&key(5, 10000, Direction::Debit)));
        }
        assert!(records[1].is_matched());
    }

    #[test]
    fn test_concurrent_claims_never_double_match() {
        let mut records: Vec<BankRecord> = (0..50)
            .map(|i| BankRecord::new(format!("B{}", i), Decimal::new(-100, 0), "2025-06-05"))
            .collect();
        let target = key(5, 10000, Direction::Debit);

        let claimed = {
            let index = MatchIndex::build(records.iter_mut());
            let claimed = std::sync::atomic::AtomicUsize::new(0);
            std::thread::scope(|scope| {
                for _ in 0..8 {
                    scope.spawn(|| {
                        for _ in 0..20 {
                            if index.claim(&target) {
                                claimed.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                            }
                        }
                    });
                }
            });
            claimed.into_inner()
        };

        assert_eq!(claimed, 50);
        assert!(records.iter().all(BankRecord::is_matched));
    }
}
