//! Home page

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{error::AppResult, AppState};

pub async fn index(State(state): State<AppState>) -> AppResult<Response> {
    let counts = state.services.site.home().await?;

    let context = json!({
        "title": "Local Library Home",
        "data": counts,
    });
    Ok(state.render("index", &context)?.into_response())
}
