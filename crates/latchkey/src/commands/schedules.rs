//! Restart schedule handlers.

use std::str::FromStr;

use tabled::Tabled;

use latchkey_api::models::{RestartSchedule, ScheduleDraft, ScheduleKind, ScheduleType};
use latchkey_core::{FormValidator, Format, Rule};

use crate::cli::{ScheduleFields, SchedulesArgs, SchedulesCommand};
use crate::error::CliError;

use super::{Ctx, util};

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Type")]
    schedule_type: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Days / Date")]
    detail: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&RestartSchedule> for ScheduleRow {
    fn from(s: &RestartSchedule) -> Self {
        Self {
            id: s.id,
            schedule_type: s.kind.schedule_type().to_string(),
            time: s.time.clone(),
            detail: util::or_dash(Some(s.kind.detail().as_str())),
            created: if s.created_at == 0 {
                "-".into()
            } else {
                util::format_unix(s.created_at)
            },
        }
    }
}

/// Build a draft from flags, rejecting fields the chosen type cannot carry.
fn draft(fields: ScheduleFields) -> Result<ScheduleDraft, CliError> {
    let mut form = FormValidator::new();
    form.validate_field("Time", &fields.time, &[Rule::Required, Rule::Format(Format::Time)]);
    form.validate_field(
        "Schedule type",
        &fields.schedule_type,
        &[Rule::custom(|v| ScheduleType::from_str(v.trim()).is_ok())
            .with_message("Schedule type must be daily, weekly, monthly, or once")],
    );
    form.validate_opt("Date", fields.date.as_deref(), &[Rule::Format(Format::Date)]);
    util::ensure_valid(&form)?;

    let tag = ScheduleType::from_str(fields.schedule_type.trim())
        .map_err(|e| CliError::validation(e.to_string()))?;
    let stray = |flag: &str| {
        CliError::validation(format!("--{flag} does not apply to {tag} schedules"))
    };

    let kind = match tag {
        ScheduleType::Daily => {
            if !fields.days_of_week.is_empty() {
                return Err(stray("days-of-week"));
            }
            if !fields.days_of_month.is_empty() {
                return Err(stray("days-of-month"));
            }
            if fields.date.is_some() {
                return Err(stray("date"));
            }
            ScheduleKind::Daily
        }
        ScheduleType::Weekly => {
            if !fields.days_of_month.is_empty() {
                return Err(stray("days-of-month"));
            }
            if fields.date.is_some() {
                return Err(stray("date"));
            }
            ScheduleKind::Weekly {
                days_of_week: fields.days_of_week,
            }
        }
        ScheduleType::Monthly => {
            if !fields.days_of_week.is_empty() {
                return Err(stray("days-of-week"));
            }
            if fields.date.is_some() {
                return Err(stray("date"));
            }
            ScheduleKind::Monthly {
                days_of_month: fields.days_of_month,
            }
        }
        ScheduleType::Once => {
            if !fields.days_of_week.is_empty() {
                return Err(stray("days-of-week"));
            }
            if !fields.days_of_month.is_empty() {
                return Err(stray("days-of-month"));
            }
            let restart_date = fields
                .date
                .ok_or_else(|| CliError::validation("Date is required for once schedules"))?;
            ScheduleKind::Once { restart_date }
        }
    };

    let draft = ScheduleDraft::new(fields.time.trim(), kind);
    draft.validate()?;
    Ok(draft)
}

pub async fn handle(ctx: &mut Ctx, args: SchedulesArgs) -> Result<(), CliError> {
    match args.command {
        SchedulesCommand::List(page) => {
            let schedules = ctx
                .client
                .list_restart_schedules(page.page, page.per_page)
                .await?;
            util::print_page(
                ctx,
                &schedules,
                page.page,
                page.per_page,
                |s| ScheduleRow::from(s),
                |s| s.id.to_string(),
            )
        }

        SchedulesCommand::Create(fields) => {
            let draft = draft(fields)?;
            let created = ctx.client.create_restart_schedule(&draft).await?;
            ctx.success(created.message.unwrap_or_else(|| {
                format!(
                    "Schedule {} created ({} at {})",
                    created.data.id,
                    created.data.kind.schedule_type(),
                    created.data.time
                )
            }));
            Ok(())
        }

        SchedulesCommand::Update { id, fields } => {
            let draft = draft(fields)?;
            let updated = ctx.client.update_restart_schedule(id, &draft).await?;
            ctx.success(
                updated
                    .message
                    .unwrap_or_else(|| format!("Schedule {id} updated")),
            );
            Ok(())
        }

        SchedulesCommand::Delete { id } => {
            if !util::confirm(
                "schedules delete",
                &format!("Delete restart schedule {id}?"),
                ctx.yes,
            )? {
                return Ok(());
            }
            let deleted = ctx.client.delete_restart_schedule(id).await?;
            ctx.success(format!("Schedule {deleted} deleted"));
            Ok(())
        }

        SchedulesCommand::Clear => {
            if !util::confirm("schedules clear", "Delete all restart schedules?", ctx.yes)? {
                return Ok(());
            }
            let cleared = ctx.client.clear_restart_schedules().await?;
            ctx.success(format!(
                "Removed {} restart schedules",
                cleared.data.cleared_count
            ));
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fields(kind: &str) -> ScheduleFields {
        ScheduleFields {
            time: "03:30".into(),
            schedule_type: kind.into(),
            days_of_week: vec![],
            days_of_month: vec![],
            date: None,
        }
    }

    #[test]
    fn weekly_takes_days_of_week() {
        let mut f = fields("Weekly");
        f.days_of_week = vec![1, 5];
        let d = draft(f).unwrap();
        assert_eq!(
            d.kind,
            ScheduleKind::Weekly {
                days_of_week: vec![1, 5]
            }
        );
    }

    #[test]
    fn daily_rejects_stray_days() {
        let mut f = fields("daily");
        f.days_of_month = vec![3];
        let err = draft(f).unwrap_err();
        assert_eq!(err.to_string(), "--days-of-month does not apply to daily schedules");
    }

    #[test]
    fn once_needs_a_date() {
        let err = draft(fields("once")).unwrap_err();
        assert_eq!(err.to_string(), "Date is required for once schedules");

        let mut f = fields("once");
        f.date = Some("2025-06-01".into());
        assert!(draft(f).is_ok());
    }

    #[test]
    fn bad_time_is_rejected() {
        let mut f = fields("daily");
        f.time = "25:00".into();
        let err = draft(f).unwrap_err();
        assert_eq!(err.to_string(), "Time must be a time in HH:MM format");
    }

    #[test]
    fn weekly_day_out_of_range() {
        let mut f = fields("weekly");
        f.days_of_week = vec![7];
        assert!(draft(f).is_err());
    }
}
