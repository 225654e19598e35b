use crate::csv_io::HeaderMode;
use crate::days::parse_date;
use crate::errors::{AppError, RemoteError};
use crate::models::{
    AddStudentResponse, CommitNameRequest, MessageResponse, NameRequest, RangeRequest, RegisterResponse,
    RemoteStatusResponse,
};
use crate::remote::{RemoteDrive, CSV_MIME_TYPE, REMOTE_FILE_NAME};
use crate::state::AppState;
use crate::store::AttendanceStore;
use crate::ui::render_index;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock().await;
    Html(render_index(&store.range()))
}

pub async fn get_register(State(state): State<AppState>) -> Json<RegisterResponse> {
    let store = state.store.lock().await;
    Json(RegisterResponse::snapshot(&store))
}

pub async fn set_range(
    State(state): State<AppState>,
    Json(payload): Json<RangeRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let start = parse_date(&payload.start)
        .ok_or_else(|| AppError::bad_request("start must be a YYYY-MM-DD date"))?;
    let end = parse_date(&payload.end)
        .ok_or_else(|| AppError::bad_request("end must be a YYYY-MM-DD date"))?;

    let mut store = state.store.lock().await;
    store.set_range(start, end).await?;
    info!(%start, %end, days = store.day_count(), "range updated");
    Ok(Json(RegisterResponse::snapshot(&store)))
}

pub async fn add_student(State(state): State<AppState>) -> Json<AddStudentResponse> {
    let mut store = state.store.lock().await;
    let index = store.mutate(|roster, days| roster.add_student(days)).await;
    Json(AddStudentResponse {
        index,
        register: RegisterResponse::snapshot(&store),
    })
}

pub async fn set_name(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let mut store = state.store.lock().await;
    check_student(&store, index)?;
    store
        .mutate(|roster, _| roster.set_name(index, payload.name))
        .await;
    Ok(Json(RegisterResponse::snapshot(&store)))
}

pub async fn commit_names(
    State(state): State<AppState>,
    payload: Option<Json<CommitNameRequest>>,
) -> Result<Json<RegisterResponse>, AppError> {
    let mut store = state.store.lock().await;
    let edit = payload.map(|Json(edit)| edit);
    if let Some(edit) = &edit {
        check_student(&store, edit.index)?;
    }
    store
        .mutate(|roster, _| {
            if let Some(edit) = edit {
                roster.set_name(edit.index, edit.name);
            }
            roster.commit_name_edit();
        })
        .await;
    Ok(Json(RegisterResponse::snapshot(&store)))
}

pub async fn toggle_attendance(
    State(state): State<AppState>,
    Path((index, day)): Path<(usize, usize)>,
) -> Result<Json<RegisterResponse>, AppError> {
    let mut store = state.store.lock().await;
    check_student(&store, index)?;
    if day >= store.day_count() {
        return Err(AppError::bad_request(format!("no day at index {day}")));
    }
    store
        .mutate(|roster, _| roster.toggle_attendance(index, day))
        .await;
    Ok(Json(RegisterResponse::snapshot(&store)))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<RegisterResponse>, AppError> {
    let mut store = state.store.lock().await;
    check_student(&store, index)?;
    let removed = store.mutate(|roster, _| roster.delete_student(index)).await;
    info!(name = %removed.name, "student deleted");
    Ok(Json(RegisterResponse::snapshot(&store)))
}

pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.store.lock().await;
    let body = store.export_csv().map_err(AppError::internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REMOTE_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}

pub async fn import_csv(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let mut store = state.store.lock().await;
    match store.import_csv(&body, HeaderMode::Raw).await {
        Ok(count) => {
            info!(students = count, "csv imported");
            Ok(Json(MessageResponse::new("Import successful!")))
        }
        Err(err) => {
            warn!("csv import rejected: {err}");
            Err(err.into())
        }
    }
}

pub async fn remote_status(State(state): State<AppState>) -> Json<RemoteStatusResponse> {
    Json(RemoteStatusResponse {
        enabled: state.drive.is_some(),
        signed_in: state.drive.as_ref().is_some_and(|drive| drive.is_authenticated()),
    })
}

pub async fn remote_sign_in(State(state): State<AppState>) -> Result<Json<RemoteStatusResponse>, AppError> {
    let drive = require_drive(&state)?;
    drive.sign_in().await.map_err(log_remote)?;
    Ok(remote_status(State(state)).await)
}

pub async fn remote_sign_out(State(state): State<AppState>) -> Result<Json<RemoteStatusResponse>, AppError> {
    let drive = require_drive(&state)?;
    drive.sign_out().await;
    Ok(remote_status(State(state)).await)
}

pub async fn remote_save(State(state): State<AppState>) -> Result<Json<MessageResponse>, AppError> {
    let drive = require_drive(&state)?;
    let body = {
        let store = state.store.lock().await;
        store.export_csv().map_err(AppError::internal)?
    };

    drive
        .upload(REMOTE_FILE_NAME, CSV_MIME_TYPE, body.into_bytes())
        .await
        .map_err(log_remote)?;
    Ok(Json(MessageResponse::new("Saved to remote drive.")))
}

/// Fetches the remote file and replaces the roster with it, whatever local
/// edits happened while the download was in flight.
pub async fn remote_load(State(state): State<AppState>) -> Result<Json<RegisterResponse>, AppError> {
    let drive = require_drive(&state)?;
    let bytes = drive.download(REMOTE_FILE_NAME).await.map_err(log_remote)?;

    let mut store = state.store.lock().await;
    let count = store.import_csv(&bytes, HeaderMode::Keyed).await?;
    info!(students = count, "roster loaded from remote drive");
    Ok(Json(RegisterResponse::snapshot(&store)))
}

fn check_student(store: &AttendanceStore, index: usize) -> Result<(), AppError> {
    if index >= store.roster().len() {
        return Err(AppError::bad_request(format!("no student at index {index}")));
    }
    Ok(())
}

fn require_drive(state: &AppState) -> Result<Arc<dyn RemoteDrive>, AppError> {
    state
        .drive
        .clone()
        .ok_or_else(|| AppError::unavailable("remote drive is not configured"))
}

fn log_remote(err: RemoteError) -> AppError {
    warn!("remote drive request failed: {err}");
    err.into()
}
