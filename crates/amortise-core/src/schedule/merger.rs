use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::types::ScheduleRow;

/// Master schedule under construction, keyed by payment date.
#[derive(Debug, Clone, Default)]
pub struct MasterSchedule {
    rows: BTreeMap<NaiveDate, ScheduleRow>,
    overridden: Vec<NaiveDate>,
}

impl MasterSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&ScheduleRow> {
        self.rows.get(date)
    }

    /// Payment dates where a later segment replaced an earlier one's row.
    pub fn overridden(&self) -> &[NaiveDate] {
        &self.overridden
    }

    /// Rows in date order with `period` renumbered 1..=n.
    pub fn finalise(self) -> Vec<ScheduleRow> {
        self.rows
            .into_values()
            .enumerate()
            .map(|(i, row)| ScheduleRow {
                period: i as u32 + 1,
                ..row
            })
            .collect()
    }
}

/// Fold one segment's rows into the master schedule.
///
/// Where both already hold a row for the same payment date the incoming
/// segment wins on every column.
pub fn merge(master: MasterSchedule, incoming: Vec<ScheduleRow>) -> MasterSchedule {
    let MasterSchedule {
        mut rows,
        mut overridden,
    } = master;

    for row in incoming {
        let date = row.payment_date;
        if rows.insert(date, row).is_some() {
            tracing::warn!(payment_date = %date, "payment date produced by two segments; keeping the later one");
            overridden.push(date);
        }
    }

    MasterSchedule { rows, overridden }
}
