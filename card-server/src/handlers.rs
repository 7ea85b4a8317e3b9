use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use card_assets::{resolve_avatar, resolve_badges};
use card_error::Result;
use card_stats::{aggregate, normalize};
use card_svg::{render_card, IconPosition, Theme};

use crate::error::{error_response, svg_response, CACHE_SUCCESS};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CardQuery {
    theme: Option<String>,
    icon: Option<String>,
}

/// Browsers probe these; an empty 204 beats an error image.
pub(crate) async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub(crate) async fn card(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
    Query(query): Query<CardQuery>,
) -> Response {
    respond(state, identifier, false, query).await
}

pub(crate) async fn card_with_specials(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
    Query(query): Query<CardQuery>,
) -> Response {
    respond(state, identifier, true, query).await
}

async fn respond(
    state: Arc<AppState>,
    identifier: String,
    include_special: bool,
    query: CardQuery,
) -> Response {
    if identifier.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    let theme = Theme::parse(query.theme.as_deref().unwrap_or(""));
    let icon = IconPosition::parse(query.icon.as_deref().unwrap_or(""));

    // A hit short-circuits the whole pipeline.
    let key = cache_key(&identifier, include_special, theme, icon);
    if let Some(body) = state.cache.lock().ok().and_then(|mut cache| cache.get(&key)) {
        return svg_response(StatusCode::OK, CACHE_SUCCESS, body);
    }

    match build_card(&state, &identifier, include_special, theme, icon).await {
        Ok(body) => {
            // Best-effort write; a poisoned lock must not fail the response.
            if let Ok(mut cache) = state.cache.lock() {
                cache.put(key, body.clone());
            }
            svg_response(StatusCode::OK, CACHE_SUCCESS, body)
        }
        Err(err) => {
            log::debug!("handler: request for \"{identifier}\" failed: {err}");
            error_response(&err, theme)
        }
    }
}

/// Normalized cache key: method + path + the two query flags that change
/// the rendered bytes. Everything else in the query is noise.
fn cache_key(identifier: &str, include_special: bool, theme: Theme, icon: IconPosition) -> String {
    format!(
        "GET /{identifier}{}?theme={}&icon={}",
        if include_special { "/s" } else { "" },
        theme.as_str(),
        icon.as_str()
    )
}

/// The pipeline: profile fetch gates everything, then aggregation, then
/// asset resolution (avatar and flags concurrently), then one render.
async fn build_card(
    state: &AppState,
    identifier: &str,
    include_special: bool,
    theme: Theme,
    icon: IconPosition,
) -> Result<String> {
    let raw = state.client.fetch_profile(identifier).await?;
    let stats = normalize(&raw, identifier);
    let aggregation = aggregate(&stats.courses, include_special, state.policy);
    let total_xp = state
        .policy
        .authoritative_total(aggregation.total_xp, stats.total_xp);

    let (avatar, badges) = tokio::join!(
        resolve_avatar(&state.client, stats.picture.as_deref()),
        resolve_badges(&state.client, &aggregation.badges, state.client.flag_base()),
    );

    Ok(render_card(&stats, total_xp, &badges, &avatar, theme, icon))
}
