use crate::database::DataStore;
use crate::utils::AppError;
use serde::Serialize;

/// Revenue is not tracked yet; the dashboard shows a fixed figure.
pub const PLACEHOLDER_REVENUE: u64 = 1_250_000;

#[derive(Debug, Serialize, PartialEq, utoipa::ToSchema)]
pub struct DashboardStats {
    pub members: u64,
    pub events: u64,
    pub formations: u64,
    pub revenue: u64,
}

pub async fn get_stats(store: &dyn DataStore) -> Result<DashboardStats, AppError> {
    let (members, events, formations) = tokio::try_join!(
        store.count_users(),
        store.count_events(),
        store.count_formations()
    )?;

    Ok(DashboardStats {
        members,
        events,
        formations,
        revenue: PLACEHOLDER_REVENUE,
    })
}
