//! # Account Auth Handlers
//!
//! Login/signup endpoints for the two roles. Both endpoints branch on an
//! `action` discriminator in the request body, mirroring the single form
//! that serves login and signup in the UI. Vendor signup additionally
//! accepts documents and provisions the vendor's identity profile.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::artifacts;
use crate::auth::extract_bearer_token;
use crate::error::{ApiError, authentication_failed, validation_error};
use crate::handlers::types::{AccountSummary, AuthResponse};
use crate::models::user::Role;
use crate::repositories::{
    CreateAccountRequest, DocumentUpload, SessionRepository, UserRepository,
    VendorDocumentRepository, VendorProfileRepository,
};
use crate::server::AppState;
use crate::telemetry;

/// Credentials presented at login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginCredentials {
    /// National identity string registered at signup
    #[schema(example = "NID-12345")]
    pub national_id: String,
    pub password: String,
}

/// A document uploaded at vendor signup
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentPayload {
    /// Original filename of the upload
    #[schema(example = "id_proof.pdf")]
    pub filename: String,
    /// Base64-encoded file content
    pub content: String,
}

/// Fields required to open a vendor account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorSignupRequest {
    #[schema(example = "alice")]
    pub username: String,
    pub email: String,
    pub phone: String,
    #[schema(example = "NID-12345")]
    pub national_id: String,
    pub password: String,
    /// Titles paired positionally with `documents`
    #[serde(default)]
    pub doc_titles: Vec<String>,
    #[serde(default)]
    pub documents: Vec<DocumentPayload>,
}

/// Fields required to open an investor account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvestorSignupRequest {
    #[schema(example = "ivy")]
    pub username: String,
    pub email: String,
    pub phone: String,
    #[schema(example = "NID-67890")]
    pub national_id: String,
    pub password: String,
}

/// Vendor auth request, discriminated by `action`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VendorAuthRequest {
    Login(LoginCredentials),
    Signup(VendorSignupRequest),
}

/// Investor auth request, discriminated by `action`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InvestorAuthRequest {
    Login(LoginCredentials),
    Signup(InvestorSignupRequest),
}

/// Response for logout
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

/// Static description of an auth endpoint, returned on GET in place of the
/// form the original UI rendered
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthDescriptor {
    /// Role this endpoint authenticates
    #[schema(example = "vendor")]
    pub role: Role,
    /// Accepted values for the `action` discriminator
    pub actions: Vec<String>,
    /// Fields required for signup
    pub signup_fields: Vec<String>,
}

impl AuthDescriptor {
    fn for_role(role: Role) -> Self {
        let mut signup_fields: Vec<String> =
            ["username", "email", "phone", "national_id", "password"]
                .iter()
                .map(|s| s.to_string())
                .collect();
        if role == Role::Vendor {
            signup_fields.push("doc_titles".to_string());
            signup_fields.push("documents".to_string());
        }
        Self {
            role,
            actions: vec!["login".to_string(), "signup".to_string()],
            signup_fields,
        }
    }
}

/// Describe the vendor auth endpoint
#[utoipa::path(
    get,
    path = "/vendor/",
    responses(
        (status = 200, description = "Endpoint descriptor", body = AuthDescriptor)
    ),
    tag = "accounts"
)]
pub async fn vendor_auth_info() -> Json<AuthDescriptor> {
    Json(AuthDescriptor::for_role(Role::Vendor))
}

/// Describe the investor auth endpoint
#[utoipa::path(
    get,
    path = "/investor/",
    responses(
        (status = 200, description = "Endpoint descriptor", body = AuthDescriptor)
    ),
    tag = "accounts"
)]
pub async fn investor_auth_info() -> Json<AuthDescriptor> {
    Json(AuthDescriptor::for_role(Role::Investor))
}

/// Vendor login or signup
#[utoipa::path(
    post,
    path = "/vendor/",
    request_body = VendorAuthRequest,
    responses(
        (status = 200, description = "Login succeeded", body = AuthResponse),
        (status = 201, description = "Vendor account created", body = AuthResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "No matching credentials", body = ApiError),
        (status = 409, description = "National ID already registered for this role", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "accounts"
)]
pub async fn vendor_auth(
    State(state): State<AppState>,
    Json(request): Json<VendorAuthRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    match request {
        VendorAuthRequest::Login(credentials) => {
            login(&state, credentials, Role::Vendor)
                .await
                .map(|response| (StatusCode::OK, Json(response)))
        }
        VendorAuthRequest::Signup(signup) => {
            let documents = decode_documents(&signup.documents)?;

            let user = UserRepository::new(&state.db)
                .create_account(CreateAccountRequest {
                    username: signup.username,
                    email: signup.email,
                    phone: signup.phone,
                    national_id: signup.national_id,
                    password: signup.password,
                    role: Role::Vendor,
                })
                .await?;

            let attached = VendorDocumentRepository::new(&state.db, &state.artifacts)
                .attach_documents(&user, &signup.doc_titles, &documents)
                .await?;

            let profile = VendorProfileRepository::new(&state.db, &state.artifacts)
                .provision(&user, attached)
                .await?;

            tracing::info!(
                vendor_id = %user.id,
                profile_id = %profile.id,
                document_uploaded = attached,
                "Vendor account created"
            );

            let token = SessionRepository::new(&state.db).create(user.id).await?;
            Ok((
                StatusCode::CREATED,
                Json(AuthResponse {
                    token,
                    account: AccountSummary::from(user),
                }),
            ))
        }
    }
}

/// Investor login or signup
#[utoipa::path(
    post,
    path = "/investor/",
    request_body = InvestorAuthRequest,
    responses(
        (status = 200, description = "Login succeeded", body = AuthResponse),
        (status = 201, description = "Investor account created", body = AuthResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "No matching credentials", body = ApiError),
        (status = 409, description = "National ID already registered for this role", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "accounts"
)]
pub async fn investor_auth(
    State(state): State<AppState>,
    Json(request): Json<InvestorAuthRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    match request {
        InvestorAuthRequest::Login(credentials) => {
            login(&state, credentials, Role::Investor)
                .await
                .map(|response| (StatusCode::OK, Json(response)))
        }
        InvestorAuthRequest::Signup(signup) => {
            let user = UserRepository::new(&state.db)
                .create_account(CreateAccountRequest {
                    username: signup.username,
                    email: signup.email,
                    phone: signup.phone,
                    national_id: signup.national_id,
                    password: signup.password,
                    role: Role::Investor,
                })
                .await?;

            tracing::info!(investor_id = %user.id, "Investor account created");

            let token = SessionRepository::new(&state.db).create(user.id).await?;
            Ok((
                StatusCode::CREATED,
                Json(AuthResponse {
                    token,
                    account: AccountSummary::from(user),
                }),
            ))
        }
    }
}

/// End the presented session. Always succeeds, even without a valid token.
#[utoipa::path(
    post,
    path = "/logout/",
    responses(
        (status = 200, description = "Session ended", body = LogoutResponse)
    ),
    tag = "accounts"
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    if let Ok(token) = extract_bearer_token(&headers, telemetry::current_trace_id().as_deref()) {
        SessionRepository::new(&state.db).delete(token).await?;
    }

    Ok(Json(LogoutResponse { logged_out: true }))
}

async fn login(
    state: &AppState,
    credentials: LoginCredentials,
    role: Role,
) -> Result<AuthResponse, ApiError> {
    let user = UserRepository::new(&state.db)
        .authenticate(&credentials.national_id, &credentials.password, role)
        .await?
        .ok_or_else(|| authentication_failed(Some("No matching credentials")))?;

    tracing::info!(user_id = %user.id, role = ?user.role, "Login succeeded");

    let token = SessionRepository::new(&state.db).create(user.id).await?;
    Ok(AuthResponse {
        token,
        account: AccountSummary::from(user),
    })
}

fn decode_documents(payloads: &[DocumentPayload]) -> Result<Vec<DocumentUpload>, ApiError> {
    payloads
        .iter()
        .enumerate()
        .map(|(index, payload)| {
            // Filenames land in artifact paths, so path-hostile names are
            // rejected up front rather than failing mid-signup.
            if !artifacts::is_safe_name(&payload.filename) {
                return Err(validation_error(
                    "Document filename must not contain '/', '\\' or '..'",
                    serde_json::json!({
                        "documents": { "index": index, "filename": payload.filename }
                    }),
                ));
            }
            let content = BASE64.decode(&payload.content).map_err(|_| {
                validation_error(
                    "Document content is not valid base64",
                    serde_json::json!({
                        "documents": { "index": index, "filename": payload.filename }
                    }),
                )
            })?;
            Ok(DocumentUpload {
                filename: payload.filename.clone(),
                content,
            })
        })
        .collect()
}
