use crate::advice::MealIdea;
use crate::channel::DEFAULT_CHANNEL;
use crate::errors::AppError;
use crate::journal::HealthLogDraft;
use crate::media::Playback;
use crate::models::{
    AccountView, AdminEdit, AdminOverview, AskRequest, ChannelMessage, ChannelQuery, CoachResponse,
    Credentials, DashboardResponse, HealthLogEntry, ProfileUpdate, Registration,
    SendMessageRequest, SessionResponse, VideoEntry, VideoRequest,
};
use crate::state::AppState;
use crate::ui::render_index;
use crate::views::{Screen, View};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let hub = state.hub.lock().await;
    Html(render_index(&hub.snapshot()))
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(state.hub.lock().await.snapshot())
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut hub = state.hub.lock().await;
    hub.login(&payload)?;
    Ok(Json(hub.snapshot()))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Registration>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let mut hub = state.hub.lock().await;
    hub.register(payload).await?;
    Ok((StatusCode::CREATED, Json(hub.snapshot())))
}

pub async fn logout(State(state): State<AppState>) -> Json<SessionResponse> {
    let mut hub = state.hub.lock().await;
    hub.logout();
    Json(hub.snapshot())
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<AccountView>, AppError> {
    let mut hub = state.hub.lock().await;
    Ok(Json(hub.update_profile(payload).await?))
}

pub async fn navigate(
    State(state): State<AppState>,
    Path(view): Path<String>,
) -> Result<Json<Screen>, AppError> {
    let view: View = view.parse().map_err(AppError::bad_request)?;
    Ok(Json(state.hub.lock().await.navigate(view)))
}

pub async fn get_journal(State(state): State<AppState>) -> Result<Json<Vec<HealthLogEntry>>, AppError> {
    let hub = state.hub.lock().await;
    Ok(Json(hub.journal()?.to_vec()))
}

pub async fn log_vitals(
    State(state): State<AppState>,
    Json(payload): Json<HealthLogDraft>,
) -> Result<(StatusCode, Json<HealthLogEntry>), AppError> {
    let mut hub = state.hub.lock().await;
    let entry = hub.log_vitals(payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, AppError> {
    let hub = state.hub.lock().await;
    Ok(Json(hub.dashboard()?))
}

pub async fn get_media(State(state): State<AppState>) -> Result<Json<Vec<VideoEntry>>, AppError> {
    let hub = state.hub.lock().await;
    Ok(Json(hub.videos()?.to_vec()))
}

pub async fn add_video(
    State(state): State<AppState>,
    Json(payload): Json<VideoRequest>,
) -> Result<(StatusCode, Json<VideoEntry>), AppError> {
    let mut hub = state.hub.lock().await;
    let entry = hub.add_video(payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_playback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Playback>, AppError> {
    let hub = state.hub.lock().await;
    Ok(Json(hub.playback(&id)?))
}

pub async fn get_channel(
    State(state): State<AppState>,
    Query(query): Query<ChannelQuery>,
) -> Result<Json<Vec<ChannelMessage>>, AppError> {
    let code = query.code.unwrap_or_else(|| DEFAULT_CHANNEL.to_string());
    let hub = state.hub.lock().await;
    Ok(Json(hub.messages(&code)?))
}

pub async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChannelMessage>), AppError> {
    let code = payload.code.unwrap_or_else(|| DEFAULT_CHANNEL.to_string());
    let mut hub = state.hub.lock().await;
    let message = hub.send_message(&payload.text, &code).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn get_coach(State(state): State<AppState>) -> Result<Json<CoachResponse>, AppError> {
    let hub = state.hub.lock().await;
    let coach = hub.coach()?;
    Ok(Json(CoachResponse {
        pending: coach.is_pending(),
        transcript: coach.transcript().to_vec(),
        answer: None,
    }))
}

/// The provider call runs on its own task without holding the state lock, so a client
/// that goes away cannot leave the coach stuck in the pending state.
pub async fn ask_coach(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<CoachResponse>, AppError> {
    let (ticket, question, latest) = state.hub.lock().await.begin_advice(&payload.question)?;

    let task_state = state.clone();
    let answer = tokio::spawn(async move {
        let answer = task_state.advice.ask(latest.as_ref(), &question).await;
        task_state
            .hub
            .lock()
            .await
            .finish_advice(ticket, answer.clone());
        answer
    })
    .await
    .map_err(AppError::internal)?;

    let hub = state.hub.lock().await;
    let coach = hub.coach()?;
    Ok(Json(CoachResponse {
        pending: coach.is_pending(),
        transcript: coach.transcript().to_vec(),
        answer: Some(answer),
    }))
}

pub async fn meal_plan(State(state): State<AppState>) -> Result<Json<Vec<MealIdea>>, AppError> {
    let preferences = state.hub.lock().await.preferences()?;
    Ok(Json(state.advice.meal_plan(&preferences).await))
}

pub async fn admin_accounts(State(state): State<AppState>) -> Result<Json<AdminOverview>, AppError> {
    let hub = state.hub.lock().await;
    Ok(Json(hub.admin_overview()?))
}

pub async fn admin_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AdminEdit>,
) -> Result<Json<AccountView>, AppError> {
    let mut hub = state.hub.lock().await;
    Ok(Json(hub.admin_edit(&id, payload).await?))
}

pub async fn admin_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut hub = state.hub.lock().await;
    hub.admin_delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
