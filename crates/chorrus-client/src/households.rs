use chorrus_core::{Household, HouseholdUpdate, Invite, InviteCode, JoinHousehold, NewHousehold};
use uuid::Uuid;

use crate::error::ClientResult;
use crate::pipeline::{ApiClient, RequestContext};

/// Household endpoints under `/households`.
#[derive(Debug, Clone, Copy)]
pub struct HouseholdService<'a> {
    client: &'a ApiClient,
}

impl<'a> HouseholdService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Creates a household with the caller as admin.
    pub async fn create(&self, name: &str) -> ClientResult<Household> {
        let body = NewHousehold::new(name);
        body.validate()?;
        let ctx = RequestContext::post("/households/").with_json(&body)?;
        self.client.send(ctx).await
    }

    /// Household with its members.
    pub async fn get(&self, id: Uuid) -> ClientResult<Household> {
        self.client
            .send(RequestContext::get(format!("/households/{id}")))
            .await
    }

    /// Renames a household. Admin only.
    pub async fn update(&self, id: Uuid, name: &str) -> ClientResult<Household> {
        let body = HouseholdUpdate::new(name);
        body.validate()?;
        let ctx = RequestContext::put(format!("/households/{id}")).with_json(&body)?;
        self.client.send(ctx).await
    }

    /// Rotates the invite code. Admin only.
    pub async fn generate_invite(&self, id: Uuid) -> ClientResult<Invite> {
        self.client
            .send(RequestContext::post(format!("/households/{id}/invites")))
            .await
    }

    /// Joins the household owning `code`. The code is trimmed and
    /// upper-cased before sending.
    pub async fn join(&self, code: &str) -> ClientResult<Household> {
        let body = JoinHousehold {
            invite_code: InviteCode::parse(code)?,
        };
        let ctx = RequestContext::post("/households/join").with_json(&body)?;
        self.client.send(ctx).await
    }
}
