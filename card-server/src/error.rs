use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use card_error::CardError;
use card_svg::{render_error_card, Theme};

/// Successful renders may be shared by edge caches for a bounded time.
pub(crate) const CACHE_SUCCESS: &str = "public, max-age=14400, s-maxage=14400";
pub(crate) const CACHE_NONE: &str = "no-store";

pub(crate) fn svg_response(
    status: StatusCode,
    cache_control: &'static str,
    body: String,
) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, cache_control),
        ],
        body,
    )
        .into_response()
}

/// One error card per failed request. The body is always a valid image so
/// the response stays embeddable wherever the card was.
pub(crate) fn error_response(err: &CardError, theme: Theme) -> Response {
    svg_response(
        status_for(err),
        CACHE_NONE,
        render_error_card(&message_for(err), theme),
    )
}

fn status_for(err: &CardError) -> StatusCode {
    match err {
        CardError::NotFound(_) => StatusCode::NOT_FOUND,
        CardError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        CardError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        CardError::Upstream { status, .. } => StatusCode::from_u16(*status)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        CardError::Io(_) | CardError::Parse | CardError::Other(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Upstream failures show what upstream disclosed; local failures collapse
/// to a generic message so internals never leak.
fn message_for(err: &CardError) -> String {
    match err {
        CardError::NotFound(_)
        | CardError::RateLimited
        | CardError::Timeout
        | CardError::Upstream { .. } => err.to_string(),
        CardError::Io(_) | CardError::Parse | CardError::Other(_) => "Internal error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CardError::NotFound("x".to_string()), StatusCode::NOT_FOUND)]
    #[case(CardError::RateLimited, StatusCode::TOO_MANY_REQUESTS)]
    #[case(CardError::Timeout, StatusCode::GATEWAY_TIMEOUT)]
    #[case(CardError::Upstream { status: 503, message: None }, StatusCode::SERVICE_UNAVAILABLE)]
    #[case(CardError::Upstream { status: 200, message: None }, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(CardError::Parse, StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_follows_error_kind(#[case] err: CardError, #[case] expected: StatusCode) {
        assert_eq!(status_for(&err), expected);
    }

    #[test]
    fn not_found_message_names_the_user() {
        let err = CardError::NotFound("x".to_string());
        assert_eq!(message_for(&err), "User \"x\" not found");
    }

    #[test]
    fn local_failures_stay_generic() {
        assert_eq!(message_for(&CardError::Parse), "Internal error");
        let err = CardError::Other(anyhow::anyhow!("secret pool handle 0x1234"));
        assert_eq!(message_for(&err), "Internal error");
    }

    #[test]
    fn error_cards_are_never_edge_cached() {
        let response = error_response(&CardError::RateLimited, Theme::Light);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let cache_control = response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert_eq!(cache_control, CACHE_NONE);
    }
}
