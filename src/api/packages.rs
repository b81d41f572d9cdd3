use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::packages::types::GroupPackage;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackagesQuery {
    /// Report every locked package instead of the declared dependencies
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub with_transitive_dependencies: bool,
    #[serde(default = "default_is_cached", deserialize_with = "deserialize_flag")]
    pub is_cached: bool,
}

fn default_is_cached() -> bool {
    true
}

/// Accepts `true`/`false`, `1`/`0`, `yes`/`no`, `y`/`n`, `on`/`off` and
/// `t`/`f`, in any case
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "on" | "t" => Ok(true),
        "false" | "0" | "no" | "n" | "off" | "f" => Ok(false),
        _ => Err(de::Error::invalid_value(
            Unexpected::Str(&value),
            &"a boolean flag",
        )),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/groups/{group_id}/packages", get(get_group_packages))
}

async fn get_group_packages(
    State(getter): State<AppState>,
    group_id: Result<Path<u64>, PathRejection>,
    query: Result<Query<PackagesQuery>, QueryRejection>,
) -> Result<Json<Vec<GroupPackage>>, ApiError> {
    let Path(group_id) = group_id?;
    let Query(query) = query?;

    info!(
        "Listing packages of group {} (transitive: {}, cached: {})",
        group_id, query.with_transitive_dependencies, query.is_cached
    );

    let packages = getter
        .get_group_packages(group_id, query.with_transitive_dependencies, query.is_cached)
        .await?;

    Ok(Json(packages))
}
