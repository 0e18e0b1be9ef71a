use chrono::{NaiveDateTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use qixing_data::DrawRecord;

use crate::error::{EngineError, Result};
use crate::history::parse_draw_id;

/// Draw calendar: a fixed gap between draws, shortened after one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawSchedule {
    pub short_gap_weekday: Weekday,
    pub short_gap_days: i64,
    pub default_gap_days: i64,
}

impl Default for DrawSchedule {
    fn default() -> Self {
        Self {
            short_gap_weekday: Weekday::Sun,
            short_gap_days: 2,
            default_gap_days: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextDraw {
    pub draw_id: String,
    pub draw_time: NaiveDateTime,
}

impl DrawSchedule {
    pub fn gap_after(&self, weekday: Weekday) -> i64 {
        if weekday == self.short_gap_weekday {
            self.short_gap_days
        } else {
            self.default_gap_days
        }
    }

    /// Id is the latest id + 1, keeping the latest id's zero padding.
    pub fn next_draw(&self, latest: &DrawRecord) -> Result<NextDraw> {
        let id = parse_draw_id(&latest.draw_id)?
            .checked_add(1)
            .ok_or_else(|| EngineError::InvalidDrawId(latest.draw_id.clone()))?;
        let width = latest.draw_id.trim().len();
        Ok(NextDraw {
            draw_id: format!("{:0width$}", id, width = width),
            draw_time: latest.draw_time + TimeDelta::days(self.gap_after(latest.weekday)),
        })
    }
}
