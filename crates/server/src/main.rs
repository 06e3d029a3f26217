use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use server_api::{create_contact, delete_contact, list_contacts, update_contact, ApiContext};
use shared::{
    domain::ContactId,
    error::{ApiError, ErrorCode},
    protocol::{
        ContactListResponse, CreateContactRequest, MessageResponse, UpdateContactRequest,
    },
};
use storage::Storage;
use tracing::{error, info};

mod config;

use config::{load_settings, prepare_database_url};

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/contacts", get(http_list_contacts))
        .route("/create_contact", post(http_create_contact))
        .route("/update_contact/:contact_id", patch(http_update_contact))
        .route("/delete_contact/:contact_id", delete(http_delete_contact))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

async fn http_list_contacts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ContactListResponse>, (StatusCode, Json<ApiError>)> {
    let contacts = list_contacts(&state.api).await.map_err(reject)?;
    Ok(Json(ContactListResponse { contacts }))
}

async fn http_create_contact(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, Json<ApiError>)> {
    let contact_id = create_contact(&state.api, &req).await.map_err(reject)?;
    info!(contact_id = contact_id.0, "contact created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Contact created!".to_string(),
        }),
    ))
}

async fn http_update_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<i64>,
    Json(req): Json<UpdateContactRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ApiError>)> {
    update_contact(&state.api, ContactId(contact_id), &req)
        .await
        .map_err(reject)?;
    Ok(Json(MessageResponse {
        message: "Contact updated.".to_string(),
    }))
}

async fn http_delete_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<i64>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ApiError>)> {
    delete_contact(&state.api, ContactId(contact_id))
        .await
        .map_err(reject)?;
    Ok(Json(MessageResponse {
        message: "Contact deleted!".to_string(),
    }))
}
