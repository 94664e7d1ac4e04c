use serde::{Deserialize, Serialize};

use crate::domain::{null_as_empty, ScoredBullet};

pub const BULLET_PATH: &str = "/api/v1/bullet";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulletResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bullet_list: Vec<ScoredBullet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}
