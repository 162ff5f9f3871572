//! # Investor Listing Handler
//!
//! The investor-only listing of investments made, role-gated in the handler
//! since the session extractor itself carries no role semantics.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{ApiError, forbidden};
use crate::handlers::types::InvestmentView;
use crate::models::user::Role;
use crate::repositories::InvestmentRepository;
use crate::server::AppState;

/// List of the authenticated investor's investments
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MyInvestmentsResponse {
    pub investments: Vec<InvestmentView>,
}

/// Investments made by the authenticated investor, newest first
#[utoipa::path(
    get,
    path = "/my-investments/",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Investments made by the account", body = MyInvestmentsResponse),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Account is not an investor", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "investments"
)]
pub async fn my_investments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MyInvestmentsResponse>, ApiError> {
    if user.role != Role::Investor {
        return Err(forbidden(Some("Investor role required")));
    }

    let investments = InvestmentRepository::new(&state.db, &state.artifacts)
        .list_for_investor(user.id)
        .await?
        .into_iter()
        .map(InvestmentView::from)
        .collect();

    Ok(Json(MyInvestmentsResponse { investments }))
}
