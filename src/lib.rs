//! Calendar heatmap grids, timelines, and suggestion lists for a family
//! learning journal.
//!
//! The heart of the crate is [`GridBuilder`], which turns a sparse activity
//! log into a dense, week-aligned run of day cells with month labels:
//!
//! ```
//! use learnmap::{ActivityRecord, DateKey, GridBuilder};
//!
//! let log = [ActivityRecord::new("2026-02-07", 5)];
//! let today: DateKey = "2026-02-09".parse().unwrap();
//! let grid = GridBuilder::new(today).days_back(90).build(&log).unwrap();
//! assert_eq!(grid.cells().len() % 7, 0);
//! ```
pub mod category;
pub mod datekey;
pub mod grid;
pub mod index;
pub mod journal;
pub mod level;
pub use crate::category::StyleTag;
pub use crate::datekey::{DateKey, ParseDateError};
pub use crate::grid::{build, Cell, Grid, GridBuilder, GridError, MonthLabel};
pub use crate::index::{ActivityIndex, ActivityRecord, DayActivity};
pub use crate::journal::{LearningData, LoadError, MemberFilter};
pub use crate::level::Level;
