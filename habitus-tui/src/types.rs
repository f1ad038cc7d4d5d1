use serde::{Deserialize, Serialize};

/// The signed-in user as returned by `GET /auth/callback`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub avatar_url: String,
    pub id: String,
    pub name: String,
    pub token: String,
}
