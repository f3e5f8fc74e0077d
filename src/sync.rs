use std::env;

use crate::game::data::Snapshot;
use crate::internal_error::InternalResult;

pub const SYNC_URL_VAR: &str = "TASKLEVELS_SYNC_URL";

/// Best-effort remote copy of the snapshot. Every failure degrades to the
/// local store; nothing here is load-bearing.
pub struct SyncClient {
    base_url: String,
    agent: ureq::Agent,
}

impl SyncClient {
    pub fn new(base_url: String) -> SyncClient {
        SyncClient {
            base_url,
            agent: ureq::agent(),
        }
    }

    pub fn from_env() -> Option<SyncClient> {
        env::var(SYNC_URL_VAR).ok().map(SyncClient::new)
    }

    pub fn fetch_snapshot(&self) -> InternalResult<Snapshot> {
        let response = self.agent.get(&format!("{}/data", self.base_url)).call()?;

        Ok(response.into_json()?)
    }

    pub fn push_snapshot(&self, snapshot: &Snapshot) -> InternalResult<()> {
        self.agent
            .post(&format!("{}/data", self.base_url))
            .send_json(snapshot)?;

        Ok(())
    }
}

pub fn push_best_effort(sync_client: &Option<SyncClient>, snapshot: &Snapshot) {
    if let Some(client) = sync_client {
        if let Err(e) = client.push_snapshot(snapshot) {
            log::warn!("snapshot push failed, keeping local copy only: {}", e);
        }
    }
}
