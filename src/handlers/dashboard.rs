//! # Dashboard Handler
//!
//! Role-branched landing page data. Vendors see their identity profile and
//! the investments they have received; investors see only their account
//! summary here (their own investments live on `/my-investments/`).

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::types::{AccountSummary, InvestmentView, VendorProfileView};
use crate::models::user::Role;
use crate::repositories::{InvestmentRepository, VendorProfileRepository};
use crate::server::AppState;

/// Dashboard contents for the authenticated account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub account: AccountSummary,
    /// Present only for vendor accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<VendorProfileView>,
    /// Investments received; always empty for investor accounts
    pub investments_received: Vec<InvestmentView>,
}

/// Dashboard for the authenticated account
#[utoipa::path(
    get,
    path = "/dashboard/",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard contents", body = DashboardResponse),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let (profile, investments_received) = match user.role {
        Role::Vendor => {
            let profile = VendorProfileRepository::new(&state.db, &state.artifacts)
                .get_by_vendor_id(user.id)
                .await?
                .map(VendorProfileView::from);

            let received = InvestmentRepository::new(&state.db, &state.artifacts)
                .list_for_vendor(user.id)
                .await?
                .into_iter()
                .map(InvestmentView::from)
                .collect();

            (profile, received)
        }
        Role::Investor => (None, Vec::new()),
    };

    Ok(Json(DashboardResponse {
        account: AccountSummary::from(user),
        profile,
        investments_received,
    }))
}
