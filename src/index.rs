use crate::datekey::DateKey;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One logged day from the activity log, as it appears in the source
/// document.  The date is kept as the raw string so that a malformed entry
/// can be dropped without rejecting the whole document.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActivityRecord {
    pub date: String,
    pub count: u32,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub members: BTreeSet<String>,
}

impl ActivityRecord {
    pub fn new<S: Into<String>>(date: S, count: u32) -> Self {
        ActivityRecord {
            date: date.into(),
            count,
            topics: Vec::new(),
            members: BTreeSet::new(),
        }
    }

    pub fn topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<String>, D::Error> {
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The activity recorded for a single date
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DayActivity {
    pub count: u32,
    pub topics: Vec<String>,
    pub members: BTreeSet<String>,
}

impl From<&ActivityRecord> for DayActivity {
    fn from(record: &ActivityRecord) -> DayActivity {
        DayActivity {
            count: record.count,
            topics: record.topics.clone(),
            members: record.members.clone(),
        }
    }
}

/// Lookup table from date to that date's activity.
///
/// When several records share a date, the one that comes last wins.  Records
/// whose dates don't parse are left out and counted in [`ActivityIndex::skipped`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ActivityIndex {
    days: HashMap<DateKey, DayActivity>,
    skipped: usize,
}

impl ActivityIndex {
    pub fn new(records: &[ActivityRecord]) -> ActivityIndex {
        let mut index = ActivityIndex::default();
        for record in records {
            match record.date.parse::<DateKey>() {
                Ok(date) => {
                    if index.days.insert(date, record.into()).is_some() {
                        tracing::debug!(%date, "Duplicate activity date; keeping the later record");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping activity record with malformed date");
                    index.skipped += 1;
                }
            }
        }
        index
    }

    pub fn lookup(&self, date: DateKey) -> Option<&DayActivity> {
        self.days.get(&date)
    }

    /// Number of distinct dates with a record
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of records dropped because of malformed dates
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_lookup() {
        let log = [
            ActivityRecord::new("2026-02-07", 5)
                .topics(["A", "B", "C", "D", "E"])
                .members(["levi"]),
            ActivityRecord::new("2026-02-08", 4).topics(["X", "Y", "Z", "W"]),
        ];
        let index = ActivityIndex::new(&log);
        assert_eq!(index.len(), 2);
        let day = index
            .lookup(DateKey::new(date!(2026 - 02 - 07)))
            .expect("Feb 7 should be indexed");
        assert_eq!(day.count, 5);
        assert_eq!(day.topics, ["A", "B", "C", "D", "E"]);
        assert!(day.members.contains("levi"));
        let day = index
            .lookup(DateKey::new(date!(2026 - 02 - 08)))
            .expect("Feb 8 should be indexed");
        assert!(day.members.is_empty());
    }

    #[test]
    fn test_absent_date() {
        let index = ActivityIndex::new(&[ActivityRecord::new("2026-02-07", 1)]);
        assert_eq!(index.lookup(DateKey::new(date!(2026 - 02 - 06))), None);
    }

    #[test]
    fn test_last_write_wins() {
        let log = [
            ActivityRecord::new("2026-02-07", 1).topics(["first"]),
            ActivityRecord::new("2026-02-08", 2),
            ActivityRecord::new("2026-02-07", 3).topics(["second"]),
        ];
        let index = ActivityIndex::new(&log);
        assert_eq!(index.len(), 2);
        let day = index
            .lookup(DateKey::new(date!(2026 - 02 - 07)))
            .expect("Feb 7 should be indexed");
        assert_eq!(day.count, 3);
        assert_eq!(day.topics, ["second"]);
    }

    #[test]
    fn test_malformed_dates_are_skipped() {
        let log = [
            ActivityRecord::new("2026-02-31", 9),
            ActivityRecord::new("yesterday", 9),
            ActivityRecord::new("2026-02-07", 2),
        ];
        let index = ActivityIndex::new(&log);
        assert_eq!(index.skipped(), 2);
        assert_eq!(index.len(), 1);
        assert_eq!(
            index
                .lookup(DateKey::new(date!(2026 - 02 - 07)))
                .map(|d| d.count),
            Some(2)
        );
    }

    #[test]
    fn test_deserialize_defaults_and_extra_fields() {
        let record: ActivityRecord = serde_json::from_str(
            r#"{"date": "2026-02-07", "count": 2, "topics": ["A", "A"], "mood": "great"}"#,
        )
        .expect("deserialize");
        assert_eq!(record.topics, ["A", "A"]);
        assert!(record.members.is_empty());
    }

    #[test]
    fn test_deserialize_null_members() {
        let record: ActivityRecord =
            serde_json::from_str(r#"{"date": "2026-02-07", "count": 1, "members": null}"#)
                .expect("deserialize");
        assert!(record.members.is_empty());
    }

    #[test]
    fn test_deserialize_rejects_negative_count() {
        assert!(
            serde_json::from_str::<ActivityRecord>(r#"{"date": "2026-02-07", "count": -1}"#)
                .is_err()
        );
    }
}
