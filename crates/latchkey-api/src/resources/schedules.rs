use reqwest::Method;

use crate::client::DeviceClient;
use crate::envelope::{Page, Success};
use crate::error::Error;
use crate::models::schedule::{
    CREATE_RESTART_SCHEDULE_SUCCESS, DELETE_ALL_RESTART_SCHEDULES_SUCCESS,
    DELETE_RESTART_SCHEDULE_SUCCESS, FETCH_RESTART_SCHEDULES_SUCCESS, RestartSchedule,
    ScheduleDeleted, ScheduleDraft, ScheduleUpdate, SchedulesCleared,
    UPDATE_RESTART_SCHEDULE_SUCCESS,
};

impl DeviceClient {
    pub async fn list_restart_schedules(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Page<RestartSchedule>, Error> {
        let (page, _) = self
            .get_page(
                "restart-schedules",
                page,
                per_page,
                &FETCH_RESTART_SCHEDULES_SUCCESS,
            )
            .await?;
        Ok(page)
    }

    /// Validated locally before anything is sent.
    pub async fn create_restart_schedule(
        &self,
        draft: &ScheduleDraft,
    ) -> Result<Success<RestartSchedule>, Error> {
        draft.validate()?;
        let req = self.request(Method::POST, "restart-schedules")?.json(draft);
        self.call(req)
            .await?
            .narrow(&CREATE_RESTART_SCHEDULE_SUCCESS)
    }

    pub async fn update_restart_schedule(
        &self,
        id: u32,
        draft: &ScheduleDraft,
    ) -> Result<Success<RestartSchedule>, Error> {
        draft.validate()?;
        let req = self
            .request(Method::PUT, "restart-schedules")?
            .json(&ScheduleUpdate { id, draft });
        self.call(req)
            .await?
            .narrow(&UPDATE_RESTART_SCHEDULE_SUCCESS)
    }

    /// Returns the id the device confirmed as deleted.
    pub async fn delete_restart_schedule(&self, id: u32) -> Result<u32, Error> {
        let req = self
            .request(Method::DELETE, "restart-schedules")?
            .query(&[("schedule_id", id)]);
        let deleted: Success<ScheduleDeleted> = self
            .call(req)
            .await?
            .narrow(&DELETE_RESTART_SCHEDULE_SUCCESS)?;
        Ok(deleted.data.schedule_id)
    }

    pub async fn clear_restart_schedules(&self) -> Result<Success<SchedulesCleared>, Error> {
        let req = self.request(Method::POST, "clear-restart-schedules")?;
        self.call(req)
            .await?
            .narrow(&DELETE_ALL_RESTART_SCHEDULES_SUCCESS)
    }
}
