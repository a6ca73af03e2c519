use serde::{Deserialize, Serialize};

/// Panel responses wrap every entity as `{"object": "...", "attributes": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Wrapped<T> {
    pub attributes: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<Wrapped<T>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPanelUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PanelUserAttributes {
    pub id: u64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerLimits {
    pub memory: u64,
    pub swap: u64,
    pub disk: u64,
    pub io: u64,
    pub cpu: u64,
}

impl ServerLimits {
    pub fn new(memory: u64, disk: u64, cpu: u64) -> Self {
        Self { memory, swap: 0, disk, io: 500, cpu }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureLimits {
    pub databases: u32,
    pub backups: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Deployment {
    pub locations: Vec<u64>,
    pub dedicated_ip: bool,
    pub port_range: Vec<String>,
}

/// Body of `POST /api/application/servers`.
#[derive(Debug, Clone, Serialize)]
pub struct NewServer {
    pub name: String,
    pub user: u64,
    pub egg: u64,
    pub docker_image: String,
    pub startup: String,
    pub environment: serde_json::Map<String, serde_json::Value>,
    pub limits: ServerLimits,
    pub feature_limits: FeatureLimits,
    pub deploy: Deployment,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerAttributes {
    pub id: u64,
    pub identifier: String,
    pub name: String,
}
