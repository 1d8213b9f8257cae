use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateSiteRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateSiteResponse {
    pub success: bool,
    pub html: String,
    pub energy_used: i32,
    pub energy_remaining: i32,
}
