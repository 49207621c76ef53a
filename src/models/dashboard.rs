use serde::{Deserialize, Serialize};

/// Summary card returned by `GET /api/dashboard/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCard {
    pub title: String,
    #[serde(default)]
    pub description: String,
}
