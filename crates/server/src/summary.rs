//! Dashboard summary endpoint

use api_types::summary::SummaryQuery;
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Utc;
use engine::{RangeToken, Summary};

use crate::ServerError;
use crate::server::{AuthUser, ServerState};

pub async fn get(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Summary>, ServerError> {
    let token = RangeToken::try_from(query.range.as_str())?;
    let summary = state
        .engine
        .summary(
            &user.0,
            token,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            Utc::now().naive_utc(),
        )
        .await?;
    Ok(Json(summary))
}
