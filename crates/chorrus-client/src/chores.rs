use chorrus_core::{Chore, ChoreAssignment, ChoreFilter, ChoreUpdate, NewChore};
use uuid::Uuid;

use crate::error::ClientResult;
use crate::pipeline::{ApiClient, RequestContext};

/// Chore endpoints under `/chores`.
#[derive(Debug, Clone, Copy)]
pub struct ChoreService<'a> {
    client: &'a ApiClient,
}

impl<'a> ChoreService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /chores/`. The payload is validated before any request is made.
    pub async fn create(&self, chore: &NewChore) -> ClientResult<Chore> {
        chore.validate()?;
        let ctx = RequestContext::post("/chores/").with_json(chore)?;
        self.client.send(ctx).await
    }

    /// `GET /chores/` for the caller's household.
    pub async fn list(&self, include_completed: bool) -> ClientResult<Vec<Chore>> {
        let ctx = RequestContext::get("/chores/").with_query("include_completed", include_completed);
        self.client.send(ctx).await
    }

    /// `GET /chores/my-chores`: chores assigned to the caller.
    pub async fn list_mine(&self, include_completed: bool) -> ClientResult<Vec<Chore>> {
        let ctx = RequestContext::get("/chores/my-chores")
            .with_query("include_completed", include_completed);
        self.client.send(ctx).await
    }

    /// Lists household chores and keeps the ones matching `filter`.
    pub async fn list_filtered(&self, filter: ChoreFilter) -> ClientResult<Vec<Chore>> {
        let chores = self.list(filter.include_completed()).await?;
        Ok(filter.apply(chores))
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Chore> {
        self.client
            .send(RequestContext::get(format!("/chores/{id}")))
            .await
    }

    /// `PUT /chores/{id}`; only the fields set on `update` are sent.
    pub async fn update(&self, id: Uuid, update: &ChoreUpdate) -> ClientResult<Chore> {
        update.validate()?;
        let ctx = RequestContext::put(format!("/chores/{id}")).with_json(update)?;
        self.client.send(ctx).await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<()> {
        self.client
            .send_discarding(RequestContext::delete(format!("/chores/{id}")))
            .await
    }

    /// Completes the caller's assignment and returns it.
    pub async fn mark_complete(&self, id: Uuid) -> ClientResult<ChoreAssignment> {
        self.client
            .send(RequestContext::post(format!("/chores/{id}/complete")))
            .await
    }
}
