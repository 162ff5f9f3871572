//! # Vendor Public Pages
//!
//! Verification and investment endpoints addressed by the vendor's short
//! identity token (the leading characters of `unique_id`, as scanned from
//! the QR image). Verification and the invest page are public; recording an
//! investment requires an authenticated session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{ApiError, not_found, validation_error};
use crate::handlers::types::{DocumentView, InvestmentView, VendorProfileView};
use crate::models::user::Model as UserModel;
use crate::models::vendor_profile::Model as ProfileModel;
use crate::repositories::investment::{
    DEFAULT_RETURN_PERCENT, DEFAULT_TERMS, MINIMUM_INVESTMENT,
};
use crate::repositories::{
    InvestmentRepository, UserRepository, VendorDocumentRepository, VendorProfileRepository,
};
use crate::server::AppState;

/// Public verification page for a vendor
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorVerificationResponse {
    /// Vendor's username
    #[schema(example = "alice")]
    pub vendor: String,
    pub profile: VendorProfileView,
    pub documents: Vec<DocumentView>,
}

/// Public invest page for a vendor: identity plus the standing terms
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvestPageResponse {
    #[schema(example = "alice")]
    pub vendor: String,
    pub profile: VendorProfileView,
    #[schema(value_type = String, example = "5000")]
    pub minimum_investment: Decimal,
    #[schema(value_type = String, example = "5")]
    pub return_percent: Decimal,
    pub terms: String,
}

/// Request body for recording an investment
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvestRequest {
    /// Amount to invest; must be at least the minimum investment
    #[schema(value_type = String, example = "10000")]
    pub amount: Decimal,
}

/// Verify a vendor by the short identity token from their QR code
#[utoipa::path(
    get,
    path = "/vendor/verify/{id}/",
    params(
        ("id" = String, Path, description = "Short identity token (leading characters of the vendor's unique ID)")
    ),
    responses(
        (status = 200, description = "Vendor found", body = VendorVerificationResponse),
        (status = 404, description = "No vendor matches the token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "vendors"
)]
pub async fn verify_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VendorVerificationResponse>, ApiError> {
    let (vendor, profile) = resolve_vendor(&state, &id).await?;

    let documents = VendorDocumentRepository::new(&state.db, &state.artifacts)
        .list_for_vendor(vendor.id)
        .await?
        .into_iter()
        .map(DocumentView::from)
        .collect();

    Ok(Json(VendorVerificationResponse {
        vendor: vendor.username,
        profile: VendorProfileView::from(profile),
        documents,
    }))
}

/// Invest page: the vendor's identity and the standing investment terms
#[utoipa::path(
    get,
    path = "/vendor/invest/{short_id}/",
    params(
        ("short_id" = String, Path, description = "Short identity token of the vendor")
    ),
    responses(
        (status = 200, description = "Vendor found", body = InvestPageResponse),
        (status = 404, description = "No vendor matches the token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "vendors"
)]
pub async fn invest_page(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<Json<InvestPageResponse>, ApiError> {
    let (vendor, profile) = resolve_vendor(&state, &short_id).await?;

    Ok(Json(InvestPageResponse {
        vendor: vendor.username,
        profile: VendorProfileView::from(profile),
        minimum_investment: MINIMUM_INVESTMENT,
        return_percent: DEFAULT_RETURN_PERCENT,
        terms: DEFAULT_TERMS.to_string(),
    }))
}

/// Record an investment into a vendor
#[utoipa::path(
    post,
    path = "/vendor/invest/{short_id}/",
    security(("bearer_auth" = [])),
    params(
        ("short_id" = String, Path, description = "Short identity token of the vendor")
    ),
    request_body = InvestRequest,
    responses(
        (status = 201, description = "Investment recorded", body = InvestmentView),
        (status = 400, description = "Amount below the minimum investment", body = ApiError),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 404, description = "No vendor matches the token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "vendors"
)]
pub async fn invest(
    State(state): State<AppState>,
    CurrentUser(investor): CurrentUser,
    Path(short_id): Path<String>,
    Json(request): Json<InvestRequest>,
) -> Result<(StatusCode, Json<InvestmentView>), ApiError> {
    if request.amount < MINIMUM_INVESTMENT {
        return Err(validation_error(
            "Minimum investment is 5000",
            serde_json::json!({
                "amount": request.amount.to_string(),
                "minimum": MINIMUM_INVESTMENT.to_string()
            }),
        ));
    }

    let (vendor, _profile) = resolve_vendor(&state, &short_id).await?;

    let investment = InvestmentRepository::new(&state.db, &state.artifacts)
        .record_investment(&investor, &vendor, request.amount)
        .await?;

    tracing::info!(
        investment_id = %investment.id,
        investor_id = %investor.id,
        vendor_id = %vendor.id,
        amount = %investment.amount,
        "Investment recorded"
    );

    let view = InvestmentView {
        id: investment.id,
        investor: investor.username,
        vendor: vendor.username,
        amount: investment.amount,
        return_percent: investment.return_percent,
        terms: investment.terms,
        date_invested: investment.date_invested,
        agreement_pdf: investment.agreement_pdf,
    };

    Ok((StatusCode::CREATED, Json(view)))
}

async fn resolve_vendor(
    state: &AppState,
    short_id: &str,
) -> Result<(UserModel, ProfileModel), ApiError> {
    let profile = VendorProfileRepository::new(&state.db, &state.artifacts)
        .lookup_by_short_id(short_id)
        .await?
        .ok_or_else(|| not_found("Vendor not found"))?;

    let vendor = UserRepository::new(&state.db)
        .get_by_id(profile.vendor_id)
        .await?
        .ok_or_else(|| not_found("Vendor not found"))?;

    Ok((vendor, profile))
}
