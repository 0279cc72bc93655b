use serde::Serialize;

/// Intensity bucket for one heatmap cell, always in `0..=4`
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Level(u8);

impl Level {
    pub const NONE: Level = Level(0);
    pub const MAX: Level = Level(4);

    /// Bucket a day's activity count: 0, 1 and 2 map to themselves, 3 and 4
    /// share level 3, and anything from 5 up is level 4.
    pub fn from_count(count: u32) -> Level {
        match count {
            0 => Level(0),
            1 => Level(1),
            2 => Level(2),
            3 | 4 => Level(3),
            _ => Level(4),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}
