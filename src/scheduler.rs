//! Maintenance scheduling and status derivation.
//!
//! Everything here is a pure function of its arguments. The current time is
//! always passed in as `now`; nothing in this module reads the clock.

use chrono::{DateTime, Duration, Months, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::{
    CompletedMaintenance, Instrument, InstrumentStatus, MaintenanceEvent, MaintenanceType,
};

/// Recurrence interval used when neither the request nor the instrument specifies one
pub const DEFAULT_INTERVAL_MONTHS: i32 = 6;

/// Instruments due within this many days are reported as "due soon"
pub const DUE_SOON_DAYS: i64 = 7;

/// Default size of the upcoming-maintenance window
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Maintenance interval must be a positive number of months (got {0})")]
    InvalidInterval(i32),

    #[error("Computed maintenance date is out of range")]
    DateOutOfRange,
}

/// Temporal status of an instrument's next maintenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DueStatus {
    Overdue,
    DueSoon { days_left: i64 },
    Scheduled { days_left: i64 },
    Unknown,
}

impl DueStatus {
    pub fn is_overdue(&self) -> bool {
        matches!(self, DueStatus::Overdue)
    }

    pub fn days_left(&self) -> Option<i64> {
        match self {
            DueStatus::DueSoon { days_left } | DueStatus::Scheduled { days_left } => {
                Some(*days_left)
            }
            DueStatus::Overdue | DueStatus::Unknown => None,
        }
    }
}

/// State of a single maintenance event relative to `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    Completed,
    /// Not completed and still in the future
    Pending,
    /// Not completed and its date has passed
    Missed,
}

/// Fleet-wide dashboard counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FleetSummary {
    pub total: usize,
    pub operational: usize,
    pub needs_maintenance: usize,
    pub overdue: usize,
}

/// One slice of the maintenance-type distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TypeCount {
    pub maintenance_type: MaintenanceType,
    /// Human readable label
    pub label: String,
    pub count: usize,
}

/// Whole days elapsed from `from` to `to`, truncated toward zero
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days()
}

/// Add calendar months, clamping to the last day of the target month
pub fn add_months(date: DateTime<Utc>, months: i32) -> Result<DateTime<Utc>, ScheduleError> {
    if months <= 0 {
        return Err(ScheduleError::InvalidInterval(months));
    }
    date.checked_add_months(Months::new(months as u32))
        .ok_or(ScheduleError::DateOutOfRange)
}

/// Classify the next maintenance date of an instrument.
///
/// Archived and out-of-service instruments are never overdue: a past date
/// yields `Unknown` for them, a future date is classified as usual.
pub fn classify_due_status(
    next_maintenance_date: Option<DateTime<Utc>>,
    status: InstrumentStatus,
    now: DateTime<Utc>,
) -> DueStatus {
    let Some(next) = next_maintenance_date else {
        return DueStatus::Unknown;
    };

    if next < now {
        return if status.tracks_overdue() {
            DueStatus::Overdue
        } else {
            DueStatus::Unknown
        };
    }

    let days_left = days_between(now, next);
    if days_left <= DUE_SOON_DAYS {
        DueStatus::DueSoon { days_left }
    } else {
        DueStatus::Scheduled { days_left }
    }
}

/// Last and next maintenance dates for a newly installed instrument
pub fn initial_schedule(
    installation_date: DateTime<Utc>,
    interval_months: i32,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ScheduleError> {
    let next = add_months(installation_date, interval_months)?;
    Ok((installation_date, next))
}

/// Apply the completion rule to an event and its instrument.
///
/// Returns updated copies; the status of the instrument is left untouched.
/// An event completed on another calendar day than it was planned for is
/// moved to the completion date.
pub fn complete_maintenance_event(
    instrument: &Instrument,
    event: &MaintenanceEvent,
    completion_date: DateTime<Utc>,
    interval_months: i32,
) -> Result<CompletedMaintenance, ScheduleError> {
    let next = add_months(completion_date, interval_months)?;

    let mut event = event.clone();
    event.completed = true;
    if event.date.date_naive() != completion_date.date_naive() {
        event.date = completion_date;
    }

    let mut instrument = instrument.clone();
    instrument.last_maintenance_date = completion_date;
    instrument.next_maintenance_date = Some(next);

    Ok(CompletedMaintenance { instrument, event })
}

pub fn summarize_fleet(instruments: &[Instrument], now: DateTime<Utc>) -> FleetSummary {
    instruments
        .iter()
        .fold(FleetSummary::default(), |mut summary, instrument| {
            summary.total += 1;
            match instrument.status {
                InstrumentStatus::Operational => summary.operational += 1,
                InstrumentStatus::NeedsMaintenance => summary.needs_maintenance += 1,
                InstrumentStatus::OutOfService | InstrumentStatus::Archived => {}
            }
            if classify_due_status(instrument.next_maintenance_date, instrument.status, now)
                .is_overdue()
            {
                summary.overdue += 1;
            }
            summary
        })
}

/// Instruments due in `[now, now + window_days]`, soonest first, ties by id
pub fn upcoming_within_window(
    instruments: &[Instrument],
    now: DateTime<Utc>,
    window_days: i64,
) -> Vec<&Instrument> {
    if window_days < 0 {
        return Vec::new();
    }
    let Some(end) = Duration::try_days(window_days).and_then(|w| now.checked_add_signed(w))
    else {
        return Vec::new();
    };

    let mut upcoming: Vec<&Instrument> = instruments
        .iter()
        .filter(|i| matches!(i.next_maintenance_date, Some(d) if d >= now && d <= end))
        .collect();

    upcoming.sort_by(|a, b| {
        a.next_maintenance_date
            .cmp(&b.next_maintenance_date)
            .then_with(|| a.id.cmp(&b.id))
    });
    upcoming
}

pub fn classify_event(event: &MaintenanceEvent, now: DateTime<Utc>) -> EventState {
    if event.completed {
        EventState::Completed
    } else if event.date < now {
        EventState::Missed
    } else {
        EventState::Pending
    }
}

/// Events sorted newest first (ties by id)
pub fn maintenance_history(mut events: Vec<MaintenanceEvent>) -> Vec<MaintenanceEvent> {
    events.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    events
}

/// Count instruments per maintenance type, in first-seen order.
/// Instruments without a type are counted as `Other`.
pub fn maintenance_type_distribution(instruments: &[Instrument]) -> Vec<TypeCount> {
    let mut counts: IndexMap<MaintenanceType, usize> = IndexMap::new();
    for instrument in instruments {
        let ty = instrument.maintenance_type.unwrap_or(MaintenanceType::Other);
        *counts.entry(ty).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(maintenance_type, count)| TypeCount {
            maintenance_type,
            label: maintenance_type.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MaintenanceEventType;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn instrument(id: u128, status: InstrumentStatus, next: Option<DateTime<Utc>>) -> Instrument {
        Instrument {
            id: Uuid::from_u128(id),
            name: format!("Instrument {}", id),
            model: "Model-X100".to_string(),
            serial_number: format!("SN-{}", id),
            location: "Lab A".to_string(),
            status,
            installation_date: day(2023, 1, 1),
            last_maintenance_date: day(2023, 1, 1),
            next_maintenance_date: next,
            maintenance_type: None,
            maintenance_interval_months: None,
            image_id: None,
            crea_date: None,
            modif_date: None,
        }
    }

    fn event(id: u128, date: DateTime<Utc>, completed: bool) -> MaintenanceEvent {
        MaintenanceEvent {
            id: Uuid::from_u128(id),
            instrument_id: Uuid::from_u128(1),
            date,
            event_type: MaintenanceEventType::Scheduled,
            description: "Preventive maintenance".to_string(),
            notes: None,
            completed,
            files: vec![],
            crea_date: None,
            modif_date: None,
        }
    }

    #[test]
    fn test_due_soon() {
        let status = classify_due_status(
            Some(day(2024, 6, 3)),
            InstrumentStatus::Operational,
            day(2024, 6, 1),
        );
        assert_eq!(status, DueStatus::DueSoon { days_left: 2 });
    }

    #[test]
    fn test_overdue() {
        let status = classify_due_status(
            Some(day(2024, 5, 1)),
            InstrumentStatus::Operational,
            day(2024, 6, 1),
        );
        assert_eq!(status, DueStatus::Overdue);

        let status = classify_due_status(
            Some(day(2024, 5, 1)),
            InstrumentStatus::NeedsMaintenance,
            day(2024, 6, 1),
        );
        assert_eq!(status, DueStatus::Overdue);
    }

    #[test]
    fn test_archived_never_overdue() {
        let now = day(2024, 6, 1);
        for status in [InstrumentStatus::Archived, InstrumentStatus::OutOfService] {
            assert_eq!(classify_due_status(Some(day(2024, 5, 1)), status, now), DueStatus::Unknown);
            for offset in -400..400 {
                let next = now + Duration::days(offset);
                assert!(!classify_due_status(Some(next), status, now).is_overdue());
            }
        }
    }

    #[test]
    fn test_missing_date_is_unknown() {
        let now = day(2024, 6, 1);
        for status in [
            InstrumentStatus::Operational,
            InstrumentStatus::NeedsMaintenance,
            InstrumentStatus::OutOfService,
            InstrumentStatus::Archived,
        ] {
            assert_eq!(classify_due_status(None, status, now), DueStatus::Unknown);
        }
    }

    #[test]
    fn test_scheduled_thresholds() {
        let now = day(2024, 6, 1);
        let op = InstrumentStatus::Operational;
        assert_eq!(classify_due_status(Some(now), op, now), DueStatus::DueSoon { days_left: 0 });
        assert_eq!(
            classify_due_status(Some(day(2024, 6, 8)), op, now),
            DueStatus::DueSoon { days_left: 7 }
        );
        assert_eq!(
            classify_due_status(Some(day(2024, 6, 9)), op, now),
            DueStatus::Scheduled { days_left: 8 }
        );
        assert_eq!(
            classify_due_status(Some(day(2024, 9, 1)), op, now),
            DueStatus::Scheduled { days_left: 92 }
        );
    }

    #[test]
    fn test_partial_days_truncate() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
        let next = Utc.with_ymd_and_hms(2024, 6, 3, 6, 0, 0).unwrap();
        assert_eq!(
            classify_due_status(Some(next), InstrumentStatus::Operational, now),
            DueStatus::DueSoon { days_left: 1 }
        );
    }

    #[test]
    fn test_complete_event() {
        let inst = instrument(1, InstrumentStatus::NeedsMaintenance, Some(day(2024, 1, 10)));
        let ev = event(10, day(2024, 1, 10), false);

        let done = complete_maintenance_event(&inst, &ev, day(2024, 1, 15), 6).unwrap();
        assert_eq!(done.instrument.last_maintenance_date, day(2024, 1, 15));
        assert_eq!(done.instrument.next_maintenance_date, Some(day(2024, 7, 15)));
        assert_eq!(done.instrument.status, InstrumentStatus::NeedsMaintenance);
        assert!(done.event.completed);
        assert_eq!(done.event.date, day(2024, 1, 15));

        // inputs are untouched
        assert!(!ev.completed);
        assert_eq!(inst.next_maintenance_date, Some(day(2024, 1, 10)));
    }

    #[test]
    fn test_complete_on_schedule_keeps_event_date() {
        let inst = instrument(1, InstrumentStatus::Operational, Some(day(2024, 1, 15)));
        let ev = event(10, day(2024, 1, 15), false);
        let completion = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();

        let done = complete_maintenance_event(&inst, &ev, completion, 6).unwrap();
        assert_eq!(done.event.date, day(2024, 1, 15));
        assert_eq!(done.instrument.last_maintenance_date, completion);
    }

    #[test]
    fn test_complete_rejects_non_positive_interval() {
        let inst = instrument(1, InstrumentStatus::Operational, None);
        let ev = event(10, day(2024, 1, 15), false);
        assert_eq!(
            complete_maintenance_event(&inst, &ev, day(2024, 1, 15), 0).unwrap_err(),
            ScheduleError::InvalidInterval(0)
        );
        assert_eq!(
            complete_maintenance_event(&inst, &ev, day(2024, 1, 15), -3).unwrap_err(),
            ScheduleError::InvalidInterval(-3)
        );
    }

    #[test]
    fn test_complete_next_after_last() {
        let inst = instrument(1, InstrumentStatus::Operational, None);
        let ev = event(10, day(2024, 1, 31), false);
        for months in 1..=36 {
            for start in [day(2024, 1, 31), day(2024, 2, 29), day(2023, 12, 31)] {
                let done = complete_maintenance_event(&inst, &ev, start, months).unwrap();
                let next = done.instrument.next_maintenance_date.unwrap();
                assert!(next > done.instrument.last_maintenance_date);
            }
        }
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(day(2024, 1, 31), 1).unwrap(), day(2024, 2, 29));
        assert_eq!(add_months(day(2024, 8, 31), 6).unwrap(), day(2025, 2, 28));
    }

    #[test]
    fn test_initial_schedule() {
        let (last, next) = initial_schedule(day(2024, 3, 1), DEFAULT_INTERVAL_MONTHS).unwrap();
        assert_eq!(last, day(2024, 3, 1));
        assert_eq!(next, day(2024, 9, 1));
    }

    #[test]
    fn test_summarize_fleet() {
        let now = day(2024, 6, 1);
        let fleet = vec![
            instrument(1, InstrumentStatus::Operational, Some(day(2024, 5, 1))),
            instrument(2, InstrumentStatus::Operational, Some(day(2024, 7, 1))),
            instrument(3, InstrumentStatus::NeedsMaintenance, Some(day(2024, 6, 3))),
            instrument(4, InstrumentStatus::Archived, Some(day(2024, 1, 1))),
            instrument(5, InstrumentStatus::OutOfService, None),
        ];

        let summary = summarize_fleet(&fleet, now);
        assert_eq!(
            summary,
            FleetSummary {
                total: 5,
                operational: 2,
                needs_maintenance: 1,
                overdue: 1,
            }
        );
        assert_eq!(summarize_fleet(&[], now), FleetSummary::default());
    }

    #[test]
    fn test_upcoming_window() {
        let now = day(2024, 6, 1);
        let fleet = vec![
            instrument(5, InstrumentStatus::Operational, Some(day(2024, 6, 20))),
            instrument(4, InstrumentStatus::Operational, Some(day(2024, 6, 5))),
            instrument(3, InstrumentStatus::Operational, Some(day(2024, 5, 31))),
            instrument(2, InstrumentStatus::Operational, Some(day(2024, 7, 1))),
            instrument(1, InstrumentStatus::Operational, Some(day(2024, 7, 2))),
            instrument(6, InstrumentStatus::Operational, None),
        ];

        let ids: Vec<u128> = upcoming_within_window(&fleet, now, DEFAULT_WINDOW_DAYS)
            .iter()
            .map(|i| i.id.as_u128())
            .collect();
        // 2024-07-01 is exactly thirty days out and is included
        assert_eq!(ids, vec![4, 5, 2]);

        for inst in upcoming_within_window(&fleet, now, 10) {
            let next = inst.next_maintenance_date.unwrap();
            assert!(next >= now && next <= now + Duration::days(10));
        }

        assert!(upcoming_within_window(&fleet, now, -1).is_empty());
    }

    #[test]
    fn test_upcoming_same_day_ordered_by_id() {
        let now = day(2024, 6, 1);
        let fleet = vec![
            instrument(9, InstrumentStatus::Operational, Some(day(2024, 6, 10))),
            instrument(3, InstrumentStatus::Operational, Some(day(2024, 6, 10))),
            instrument(7, InstrumentStatus::Operational, Some(day(2024, 6, 10))),
        ];

        let ids: Vec<u128> = upcoming_within_window(&fleet, now, 30)
            .iter()
            .map(|i| i.id.as_u128())
            .collect();
        assert_eq!(ids, vec![3, 7, 9]);
    }

    #[test]
    fn test_classify_event() {
        let now = day(2024, 6, 1);
        assert_eq!(classify_event(&event(1, day(2024, 5, 1), true), now), EventState::Completed);
        assert_eq!(classify_event(&event(2, day(2024, 5, 1), false), now), EventState::Missed);
        assert_eq!(classify_event(&event(3, day(2024, 7, 1), false), now), EventState::Pending);
    }

    #[test]
    fn test_history_newest_first() {
        let history = maintenance_history(vec![
            event(1, day(2024, 1, 1), true),
            event(2, day(2024, 3, 1), true),
            event(3, day(2024, 2, 1), false),
        ]);
        let ids: Vec<u128> = history.iter().map(|e| e.id.as_u128()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_type_distribution() {
        let mut a = instrument(1, InstrumentStatus::Operational, None);
        a.maintenance_type = Some(MaintenanceType::Calibration);
        let mut b = instrument(2, InstrumentStatus::Operational, None);
        b.maintenance_type = Some(MaintenanceType::PreventiveMaintenance);
        let mut c = instrument(3, InstrumentStatus::Operational, None);
        c.maintenance_type = Some(MaintenanceType::Calibration);
        let d = instrument(4, InstrumentStatus::Operational, None);

        let dist = maintenance_type_distribution(&[a, b, c, d]);
        let pairs: Vec<(MaintenanceType, usize)> =
            dist.iter().map(|t| (t.maintenance_type, t.count)).collect();
        assert_eq!(
            pairs,
            vec![
                (MaintenanceType::Calibration, 2),
                (MaintenanceType::PreventiveMaintenance, 1),
                (MaintenanceType::Other, 1),
            ]
        );
        assert_eq!(dist[0].label, "Calibration");
    }
}
