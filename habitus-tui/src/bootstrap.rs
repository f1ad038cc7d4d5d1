use anyhow::{bail, Context, Result};
use std::sync::Arc;

use crate::api::{ApiClient, DevBackend};
use crate::config::HabitusConfig;
use crate::session_store::{FileStore, MemoryStore, SessionService};
use crate::time_utils;
use crate::types::UserData;

/// Session service backed by files under the config directory.
pub fn file_session(cfg: &HabitusConfig) -> Result<SessionService> {
    let root = HabitusConfig::root_dir()?.join("session");
    Ok(SessionService::new(
        Arc::new(FileStore::new(root)),
        cfg.user_key(),
    ))
}

/// Client for `habitus run`. Refuses to start without a stored token.
pub fn live_client(cfg: &HabitusConfig) -> Result<ApiClient> {
    let session = file_session(cfg)?;
    if session.token().is_none() {
        bail!("Not logged in. Run `habitus login` first.");
    }
    ApiClient::new(&cfg.api_url, session).context("Failed to create API client")
}

/// Client for `habitus dev`: an in-memory backend seeded with sample data and
/// a throwaway signed-in user.
pub fn dev_client(cfg: &HabitusConfig) -> Result<ApiClient> {
    let session = SessionService::new(Arc::new(MemoryStore::default()), cfg.user_key());
    session.save_user(&UserData {
        avatar_url: String::new(),
        id: "dev-user".to_string(),
        name: "Dev User".to_string(),
        token: "dev-token".to_string(),
    })?;
    Ok(ApiClient::dev(
        session,
        DevBackend::seeded(time_utils::today()),
    ))
}
