// Restart schedules
//
// The device sends one flat record whose `schedule_type` decides which of
// `days_of_week`, `days_of_month` and `restart_date` may appear. Here that
// becomes a proper sum type: decoding goes through `RawSchedule` and fails
// when a record carries a field that belongs to another variant.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::envelope::{Envelope, Signature, Status};
use crate::error::Error;

/// Bare tag, for parsing user input and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ScheduleType {
    Daily,
    Weekly,
    Monthly,
    Once,
}

/// When a schedule fires, with exactly the fields its type allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleKind {
    Daily,
    /// `0` is Sunday.
    Weekly { days_of_week: Vec<u8> },
    Monthly { days_of_month: Vec<u8> },
    /// `YYYY-MM-DD`.
    Once { restart_date: String },
}

impl ScheduleKind {
    pub fn schedule_type(&self) -> ScheduleType {
        match self {
            Self::Daily => ScheduleType::Daily,
            Self::Weekly { .. } => ScheduleType::Weekly,
            Self::Monthly { .. } => ScheduleType::Monthly,
            Self::Once { .. } => ScheduleType::Once,
        }
    }

    /// Human summary of the variant's extra fields.
    pub fn detail(&self) -> String {
        let join = |days: &[u8]| {
            days.iter()
                .map(u8::to_string)
                .collect::<Vec<_>>()
                .join(",")
        };
        match self {
            Self::Daily => String::new(),
            Self::Weekly { days_of_week } => join(days_of_week),
            Self::Monthly { days_of_month } => join(days_of_month),
            Self::Once { restart_date } => restart_date.clone(),
        }
    }

    fn check(&self) -> Result<(), Error> {
        match self {
            Self::Daily => Ok(()),
            Self::Weekly { days_of_week } => check_days("days_of_week", days_of_week, 0..=6),
            Self::Monthly { days_of_month } => check_days("days_of_month", days_of_month, 1..=31),
            Self::Once { restart_date } => NaiveDate::parse_from_str(restart_date, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| Error::Validation {
                    field: "restart_date".into(),
                    message: "expected YYYY-MM-DD".into(),
                }),
        }
    }
}

fn check_days(field: &str, days: &[u8], range: std::ops::RangeInclusive<u8>) -> Result<(), Error> {
    if days.is_empty() {
        return Err(Error::Validation {
            field: field.into(),
            message: "select at least one day".into(),
        });
    }
    if let Some(bad) = days.iter().find(|d| !range.contains(d)) {
        return Err(Error::Validation {
            field: field.into(),
            message: format!("{bad} is outside {}..={}", range.start(), range.end()),
        });
    }
    Ok(())
}

/// A stored schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchedule", into = "RawSchedule")]
pub struct RestartSchedule {
    pub id: u32,
    /// `HH:MM`.
    pub time: String,
    /// Unix seconds.
    pub created_at: i64,
    pub updated_at: i64,
    pub kind: ScheduleKind,
}

/// Create/update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "RawSchedule")]
pub struct ScheduleDraft {
    pub time: String,
    pub kind: ScheduleKind,
}

impl ScheduleDraft {
    pub fn new(time: impl Into<String>, kind: ScheduleKind) -> Self {
        Self {
            time: time.into(),
            kind,
        }
    }

    /// Local checks run before the draft is sent.
    pub fn validate(&self) -> Result<(), Error> {
        NaiveTime::parse_from_str(&self.time, "%H:%M").map_err(|_| Error::Validation {
            field: "time".into(),
            message: "expected HH:MM".into(),
        })?;
        self.kind.check()
    }
}

/// `PUT /restart-schedules` body.
#[derive(Debug, Serialize)]
pub(crate) struct ScheduleUpdate<'a> {
    pub id: u32,
    #[serde(flatten)]
    pub draft: &'a ScheduleDraft,
}

/// `data` of `POST /clear-restart-schedules`. Older firmware says `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulesCleared {
    #[serde(alias = "count")]
    pub cleared_count: u64,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// `data` of `DELETE /restart-schedules`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) struct ScheduleDeleted {
    pub schedule_id: u32,
}

// ── Wire shape ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u32>,
    schedule_type: String,
    time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    days_of_week: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    days_of_month: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    restart_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<i64>,
}

impl RawSchedule {
    fn kind(&mut self) -> Result<ScheduleKind, String> {
        let tag: ScheduleType = self
            .schedule_type
            .parse()
            .map_err(|_| format!("unknown schedule_type {:?}", self.schedule_type))?;

        let (week, month, date) = (
            self.days_of_week.take(),
            self.days_of_month.take(),
            self.restart_date.take(),
        );
        let stray = |name: &str| format!("{tag} schedule must not carry {name}");

        match tag {
            ScheduleType::Daily => {
                if week.is_some() {
                    return Err(stray("days_of_week"));
                }
                if month.is_some() {
                    return Err(stray("days_of_month"));
                }
                if date.is_some() {
                    return Err(stray("restart_date"));
                }
                Ok(ScheduleKind::Daily)
            }
            ScheduleType::Weekly => {
                if month.is_some() {
                    return Err(stray("days_of_month"));
                }
                if date.is_some() {
                    return Err(stray("restart_date"));
                }
                let days_of_week = week.ok_or("weekly schedule requires days_of_week")?;
                Ok(ScheduleKind::Weekly { days_of_week })
            }
            ScheduleType::Monthly => {
                if week.is_some() {
                    return Err(stray("days_of_week"));
                }
                if date.is_some() {
                    return Err(stray("restart_date"));
                }
                let days_of_month = month.ok_or("monthly schedule requires days_of_month")?;
                Ok(ScheduleKind::Monthly { days_of_month })
            }
            ScheduleType::Once => {
                if week.is_some() {
                    return Err(stray("days_of_week"));
                }
                if month.is_some() {
                    return Err(stray("days_of_month"));
                }
                let restart_date = date.ok_or("once schedule requires restart_date")?;
                Ok(ScheduleKind::Once { restart_date })
            }
        }
    }

    fn with_kind(time: String, kind: ScheduleKind) -> Self {
        let mut raw = Self {
            schedule_type: kind.schedule_type().to_string(),
            time,
            ..Self::default()
        };
        match kind {
            ScheduleKind::Daily => {}
            ScheduleKind::Weekly { days_of_week } => raw.days_of_week = Some(days_of_week),
            ScheduleKind::Monthly { days_of_month } => raw.days_of_month = Some(days_of_month),
            ScheduleKind::Once { restart_date } => raw.restart_date = Some(restart_date),
        }
        raw
    }
}

impl TryFrom<RawSchedule> for RestartSchedule {
    type Error = String;

    fn try_from(mut raw: RawSchedule) -> Result<Self, Self::Error> {
        let kind = raw.kind()?;
        Ok(Self {
            id: raw.id.ok_or("schedule is missing id")?,
            time: raw.time,
            created_at: raw.created_at.unwrap_or_default(),
            updated_at: raw.updated_at.unwrap_or_default(),
            kind,
        })
    }
}

impl From<RestartSchedule> for RawSchedule {
    fn from(s: RestartSchedule) -> Self {
        let mut raw = Self::with_kind(s.time, s.kind);
        raw.id = Some(s.id);
        raw.created_at = Some(s.created_at);
        raw.updated_at = Some(s.updated_at);
        raw
    }
}

impl From<ScheduleDraft> for RawSchedule {
    fn from(d: ScheduleDraft) -> Self {
        Self::with_kind(d.time, d.kind)
    }
}

// ── Signatures ──────────────────────────────────────────────────────

pub const FETCH_RESTART_SCHEDULES_SUCCESS: Signature = crate::envelope::SUCCESS;

pub const CREATE_RESTART_SCHEDULE_SUCCESS: Signature =
    Signature::coded(Status::Success, &[200, 201]);

pub const UPDATE_RESTART_SCHEDULE_SUCCESS: Signature =
    Signature::coded(Status::Success, &[200]).requiring(&["id"]);

pub const DELETE_RESTART_SCHEDULE_SUCCESS: Signature =
    Signature::coded(Status::Success, &[200]).requiring(&["schedule_id"]);

pub const DELETE_ALL_RESTART_SCHEDULES_SUCCESS: Signature =
    Signature::coded(Status::Success, &[200]).requiring_any(&["count", "cleared_count"]);

/// `success` + 200|201 with a `data` payload.
pub fn is_create_restart_schedule_success(env: &Envelope) -> bool {
    CREATE_RESTART_SCHEDULE_SUCCESS.matches(env) && !env.data.is_null()
}

pub fn is_update_restart_schedule_success(env: &Envelope) -> bool {
    UPDATE_RESTART_SCHEDULE_SUCCESS.matches(env)
}

pub fn is_delete_restart_schedule_success(env: &Envelope) -> bool {
    DELETE_RESTART_SCHEDULE_SUCCESS.matches(env)
}

pub fn is_delete_all_restart_schedules_success(env: &Envelope) -> bool {
    DELETE_ALL_RESTART_SCHEDULES_SUCCESS.matches(env)
}
