pub mod applications;
pub mod brand_profiles;
pub mod contests;
pub mod creator_profiles;
pub mod notifications;
pub mod products;
pub mod submissions;
pub mod users;
pub mod videos;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}
