//! Summary Reconciler
//!
//! The summary endpoint can return several records for the same
//! (source type, symbol) pair. Reconciliation keeps one record per pair:
//! the one with the latest `last_updated`.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::model::{SeriesKey, SummaryData};

/// Deduplicate summaries by (source type, symbol)
///
/// Output order is the order in which each key was first seen. A later
/// record replaces the kept one only when its `last_updated` is strictly
/// newer; on equal timestamps the first-seen record stays. An unparsable
/// timestamp counts as older than any parsable one.
pub fn reconcile_summaries<I>(records: I) -> Vec<SummaryData>
where
    I: IntoIterator<Item = SummaryData>,
{
    let mut kept: Vec<(SummaryData, Option<DateTime<Utc>>)> = Vec::new();
    let mut index: HashMap<SeriesKey, usize> = HashMap::new();

    for record in records {
        let updated_at = record.last_updated_at();

        match index.get(&record.key()) {
            None => {
                index.insert(record.key(), kept.len());
                kept.push((record, updated_at));
            }
            Some(&pos) => {
                if is_newer(updated_at, kept[pos].1) {
                    kept[pos] = (record, updated_at);
                }
            }
        }
    }

    kept.into_iter().map(|(record, _)| record).collect()
}

/// Strict "candidate is newer than existing" with unparsable as oldest
fn is_newer(candidate: Option<DateTime<Utc>>, existing: Option<DateTime<Utc>>) -> bool {
    match (candidate, existing) {
        (Some(c), Some(e)) => c > e,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
