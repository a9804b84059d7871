use chorrus_core::{Chore, Household};
use serde::Serialize;

use crate::error::ClientResult;
use crate::pipeline::ApiClient;

/// Landing view: the caller's open chores and their household.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub my_chores: Vec<Chore>,
    /// `None` when the caller has no chores to resolve it from.
    pub household: Option<Household>,
}

impl Dashboard {
    pub fn pending_count(&self) -> usize {
        self.my_chores
            .iter()
            .filter(|c| c.has_pending_assignment())
            .count()
    }
}

impl ApiClient {
    /// Loads the caller's pending chores, then the household of the first one.
    pub async fn dashboard(&self) -> ClientResult<Dashboard> {
        let my_chores = self.chores().list_mine(false).await?;
        let household = match my_chores.first() {
            Some(chore) => Some(self.households().get(chore.household_id).await?),
            None => None,
        };
        Ok(Dashboard {
            my_chores,
            household,
        })
    }
}
