use serde::Serialize;
use std::fmt;

/// Display tag a topic's category is routed to
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    #[default]
    Critical,
    Natural,
    Applied,
    Technology,
    Science,
    Mathematics,
    Psychology,
}

// Labels are matched exactly, case included.
static CATEGORY_TAGS: &[(&str, StyleTag)] = &[
    ("Critical Thinking", StyleTag::Critical),
    ("Natural Science", StyleTag::Natural),
    ("Applied Science", StyleTag::Applied),
    ("Technology", StyleTag::Technology),
    ("Science", StyleTag::Science),
    ("Mathematics", StyleTag::Mathematics),
    ("Psychology", StyleTag::Psychology),
];

impl StyleTag {
    /// Look up the tag for a category label.  Unknown labels get the default
    /// tag, `critical`.
    pub fn classify(category: &str) -> StyleTag {
        CATEGORY_TAGS
            .iter()
            .find(|&&(label, _)| label == category)
            .map_or_else(StyleTag::default, |&(_, tag)| tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StyleTag::Critical => "critical",
            StyleTag::Natural => "natural",
            StyleTag::Applied => "applied",
            StyleTag::Technology => "technology",
            StyleTag::Science => "science",
            StyleTag::Mathematics => "mathematics",
            StyleTag::Psychology => "psychology",
        }
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
