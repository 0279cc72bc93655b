use crate::category::StyleTag;
use crate::datekey::DateKey;
use crate::grid::{Grid, GridBuilder, GridError};
use crate::index::ActivityRecord;
use serde::{Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// A family learning journal as stored in `learning.json`
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearningData {
    #[serde(default, deserialize_with = "lenient_date")]
    pub started: Option<DateKey>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub suggested_next: Vec<Suggestion>,
    #[serde(default)]
    pub activity_log: Vec<ActivityRecord>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
}

/// A topic studied on a given day
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Topic {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub member: String,
}

/// A topic proposed for a member to take up next
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Suggestion {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub member: String,
}

/// Which member's entries to show.  The string `all` selects everyone; any
/// other string is taken as a member ID.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum MemberFilter {
    #[default]
    All,
    Member(String),
}

impl MemberFilter {
    pub fn matches(&self, member: &str) -> bool {
        match self {
            MemberFilter::All => true,
            MemberFilter::Member(id) => id == member,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, MemberFilter::All)
    }
}

impl FromStr for MemberFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<MemberFilter, Infallible> {
        Ok(if s == "all" {
            MemberFilter::All
        } else {
            MemberFilter::Member(s.to_owned())
        })
    }
}

impl fmt::Display for MemberFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberFilter::All => f.write_str("all"),
            MemberFilter::Member(id) => f.write_str(id),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub date: DateKey,
    pub title: String,
    pub category: String,
    pub tag: StyleTag,
    pub member: String,
    /// Only filled in when every member's entries are shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_label: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTopic {
    pub title: String,
    /// The description's first sentence
    pub summary: String,
    pub member: String,
    /// Only filled in when every member's entries are shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_emoji: Option<String>,
}

// An unreadable start date is dropped rather than failing the whole document.
fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateKey>, D::Error> {
    let Some(s) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match s.parse::<DateKey>() {
        Ok(date) => Ok(Some(date)),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed start date");
            Ok(None)
        }
    }
}

impl LearningData {
    pub fn from_json(s: &str) -> Result<LearningData, LoadError> {
        let data = serde_json::from_str::<LearningData>(s)?;
        tracing::debug!(
            members = data.members.len(),
            topics = data.topics.len(),
            activity = data.activity_log.len(),
            "Loaded learning data"
        );
        Ok(data)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<LearningData, LoadError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;
        LearningData::from_json(&src)
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// A member's emoji and name, or the bare ID for an unknown member
    pub fn member_label(&self, id: &str) -> String {
        match self.member(id) {
            Some(m) => format!("{}{}", m.emoji, m.name),
            None => id.to_owned(),
        }
    }

    /// A member's emoji, or an empty string for an unknown member
    pub fn member_emoji(&self, id: &str) -> String {
        self.member(id).map(|m| m.emoji.clone()).unwrap_or_default()
    }

    /// Topics for the selected members, newest first.  Topics on the same
    /// date keep their document order.  Topics with unparseable dates are
    /// left out.
    pub fn timeline(&self, filter: &MemberFilter) -> Vec<TimelineEntry> {
        let mut entries = self
            .topics
            .iter()
            .filter(|t| filter.matches(&t.member))
            .filter_map(|t| match t.date.parse::<DateKey>() {
                Ok(date) => Some(TimelineEntry {
                    date,
                    title: t.title.clone(),
                    category: t.category.clone(),
                    tag: StyleTag::classify(&t.category),
                    member: t.member.clone(),
                    member_label: filter.is_all().then(|| self.member_label(&t.member)),
                }),
                Err(e) => {
                    tracing::warn!(title = %t.title, error = %e, "Skipping topic with malformed date");
                    None
                }
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    /// Suggested topics for the selected members, in document order
    pub fn next_topics(&self, filter: &MemberFilter) -> Vec<NextTopic> {
        self.suggested_next
            .iter()
            .filter(|s| filter.matches(&s.member))
            .map(|s| NextTopic {
                title: s.title.clone(),
                summary: first_sentence(&s.description).to_owned(),
                member: s.member.clone(),
                member_emoji: filter.is_all().then(|| self.member_emoji(&s.member)),
            })
            .collect()
    }

    /// Heatmap over the journal's activity log
    pub fn heatmap(&self, today: DateKey, days_back: u32) -> Result<Grid, GridError> {
        GridBuilder::new(today)
            .days_back(days_back)
            .build(&self.activity_log)
    }
}

fn first_sentence(s: &str) -> &str {
    s.split('.').next().unwrap_or_default().trim()
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse learning data")]
    Json(#[from] serde_json::Error),
}
