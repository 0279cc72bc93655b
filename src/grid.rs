use crate::datekey::{short_month_name, DateKey};
use crate::index::{ActivityIndex, ActivityRecord};
use crate::level::Level;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use time::Month;

/// Window size of the full-year heatmap
pub const DEFAULT_DAYS_BACK: u32 = 363;

/// Window size of the compact heatmap
pub const COMPACT_DAYS_BACK: u32 = 90;

pub const DAYS_IN_WEEK: usize = 7;

/// Extra days beyond the requested window that may still receive a month
/// label.  A built window is never more than `days_back + 13` days long, so
/// rounding `days_back + LABEL_PADDING_DAYS` up to a whole week never cuts
/// off a real label.
const LABEL_PADDING_DAYS: u32 = 14;

/// One calendar day of the heatmap
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub date: DateKey,
    pub count: u32,
    pub topics: Vec<String>,
    pub members: BTreeSet<String>,
    pub level: Level,
    pub is_future: bool,
}

/// A month name anchored to the column holding that month's first visible day
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct MonthLabel {
    #[serde(rename = "columnIndex")]
    pub column: usize,
    pub name: &'static str,
}

/// A week-aligned run of cells, one per day, plus the month labels to draw
/// above it.
///
/// Cells are in strictly ascending date order with no gaps.  The first cell
/// is a Sunday and the last a Saturday, so every column of seven cells is a
/// complete week.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    cells: Vec<Cell>,
    months: Vec<MonthLabel>,
    total_columns: usize,
}

impl Grid {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn months(&self) -> &[MonthLabel] {
        &self.months
    }

    /// Number of week columns
    pub fn total_columns(&self) -> usize {
        self.total_columns
    }

    /// Iterate over the columns of the grid, each a Sunday-to-Saturday week
    pub fn weeks(&self) -> std::slice::ChunksExact<'_, Cell> {
        self.cells.chunks_exact(DAYS_IN_WEEK)
    }

    pub fn cell(&self, date: DateKey) -> Option<&Cell> {
        self.position(date).and_then(|i| self.cells.get(i))
    }

    /// The column containing `date`, if it is inside the grid
    pub fn column_of(&self, date: DateKey) -> Option<usize> {
        self.position(date).map(|i| i / DAYS_IN_WEEK)
    }

    pub fn first_date(&self) -> Option<DateKey> {
        self.cells.first().map(|c| c.date)
    }

    pub fn last_date(&self) -> Option<DateKey> {
        self.cells.last().map(|c| c.date)
    }

    /// Sum of the activity counts over every cell
    pub fn total_count(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.count)).sum()
    }

    /// Number of cells with any activity
    pub fn active_days(&self) -> usize {
        self.cells.iter().filter(|c| c.count > 0).count()
    }

    fn position(&self, date: DateKey) -> Option<usize> {
        self.cells.binary_search_by_key(&date, |c| c.date).ok()
    }
}

/// Builds a [`Grid`] covering the `days_back` days before `today`, widened to
/// whole weeks on both ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GridBuilder {
    today: DateKey,
    days_back: u32,
}

impl GridBuilder {
    pub fn new(today: DateKey) -> Self {
        GridBuilder {
            today,
            days_back: DEFAULT_DAYS_BACK,
        }
    }

    pub fn days_back(mut self, days_back: u32) -> Self {
        self.days_back = days_back;
        self
    }

    pub fn build(&self, activity_log: &[ActivityRecord]) -> Result<Grid, GridError> {
        let index = ActivityIndex::new(activity_log);
        self.build_from_index(&index)
    }

    pub fn build_from_index(&self, index: &ActivityIndex) -> Result<Grid, GridError> {
        if self.days_back == 0 {
            return Err(GridError::InvalidWindow);
        }
        let start = self
            .today
            .add_days(-i64::from(self.days_back))
            .and_then(DateKey::week_start)
            .ok_or(GridError::OutOfRange)?;
        let end = self.today.week_end().ok_or(GridError::OutOfRange)?;
        let span = usize::try_from((end.date() - start.date()).whole_days() + 1).unwrap_or(0);
        let label_cap = label_cap(self.days_back);

        let mut cells = Vec::with_capacity(span);
        let mut months = Vec::new();
        let mut last_month: Option<Month> = None;
        for date in start.iter_from().take_while(|&d| d <= end) {
            if last_month != Some(date.month()) && cells.len() < label_cap {
                push_label(
                    &mut months,
                    MonthLabel {
                        column: cells.len() / DAYS_IN_WEEK,
                        name: short_month_name(date.month()),
                    },
                );
                last_month = Some(date.month());
            }
            let activity = index.lookup(date);
            let count = activity.map_or(0, |a| a.count);
            cells.push(Cell {
                date,
                count,
                topics: activity.map(|a| a.topics.clone()).unwrap_or_default(),
                members: activity.map(|a| a.members.clone()).unwrap_or_default(),
                level: Level::from_count(count),
                is_future: date > self.today,
            });
        }

        let total_columns = cells.len().div_ceil(DAYS_IN_WEEK);
        tracing::debug!(
            today = %self.today,
            days_back = self.days_back,
            %start,
            %end,
            cells = cells.len(),
            months = months.len(),
            "Built heatmap grid"
        );
        Ok(Grid {
            cells,
            months,
            total_columns,
        })
    }
}

/// Build a heatmap grid over the `days_back` days leading up to `today`
pub fn build(
    activity_log: &[ActivityRecord],
    today: DateKey,
    days_back: u32,
) -> Result<Grid, GridError> {
    GridBuilder::new(today).days_back(days_back).build(activity_log)
}

// A month whose last days fill only the head of the first column gives way
// to the month starting in that same column.
fn push_label(months: &mut Vec<MonthLabel>, label: MonthLabel) {
    match months.last_mut() {
        Some(prev) if prev.column == label.column => *prev = label,
        _ => months.push(label),
    }
}

/// Month labels are only emitted while fewer than this many cells have been
/// laid out.
fn label_cap(days_back: u32) -> usize {
    let days = days_back.saturating_add(LABEL_PADDING_DAYS);
    usize::try_from(days.div_ceil(7).saturating_mul(7)).unwrap_or(usize::MAX)
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum GridError {
    #[error("window must cover at least one day")]
    InvalidWindow,
    #[error("window extends past the supported calendar")]
    OutOfRange,
}
