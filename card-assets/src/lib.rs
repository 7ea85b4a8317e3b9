use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use card_error::Result;
use card_stats::Badge;
use card_upstream::UpstreamClient;
use futures::future::join_all;
use once_cell::sync::Lazy;
use url::Url;

/// Avatar size variants, tried in order; first success wins.
const AVATAR_VARIANTS: [&str; 3] = ["/xlarge", "/large", ""];

/// Raster type assumed when an asset response has no Content-Type.
const FALLBACK_CONTENT_TYPE: &str = "image/png";

const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"><circle cx="32" cy="32" r="32" fill="#58cc02"/></svg>"##;

/// Placeholder avatar, encoded once per process.
static PLACEHOLDER_AVATAR: Lazy<String> =
    Lazy::new(|| data_uri(PLACEHOLDER_SVG.as_bytes(), "image/svg+xml"));

/// Byte provider for binary assets. Implemented by the upstream client;
/// tests substitute stubs.
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<(Vec<u8>, Option<String>)>;
}

#[async_trait]
impl AssetSource for UpstreamClient {
    async fn fetch(&self, url: &str) -> Result<(Vec<u8>, Option<String>)> {
        self.fetch_bytes(url).await
    }
}

/// One badge with its inline-embeddable flag image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeImage {
    pub code: String,
    pub data_uri: String,
}

pub fn data_uri(bytes: &[u8], content_type: &str) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}

pub fn placeholder_avatar() -> String {
    PLACEHOLDER_AVATAR.clone()
}

/// Protocol-relative references get an explicit secure scheme.
fn normalize_picture_ref(picture: &str) -> String {
    if let Some(rest) = picture.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        picture.to_string()
    }
}

/// Resolves the avatar to a data URI.
///
/// Tries size variants largest-first and falls back to the placeholder when
/// every variant fails or no reference was given. Never fails the request.
pub async fn resolve_avatar<S: AssetSource + ?Sized>(
    source: &S,
    picture: Option<&str>,
) -> String {
    let picture = match picture {
        Some(p) => normalize_picture_ref(p),
        None => return placeholder_avatar(),
    };

    for variant in AVATAR_VARIANTS {
        let url = format!("{picture}{variant}");
        match source.fetch(&url).await {
            Ok((bytes, content_type)) => {
                return data_uri(
                    &bytes,
                    content_type.as_deref().unwrap_or(FALLBACK_CONTENT_TYPE),
                );
            }
            Err(err) => {
                log::debug!("assets: avatar variant \"{url}\" failed: {err}");
            }
        }
    }
    log::debug!("assets: all avatar variants failed, using placeholder");
    placeholder_avatar()
}

/// Resolves flag images for the selected badges, concurrently.
///
/// Output order follows the badge selection, not fetch completion. A failed
/// fetch drops that badge from the result; it never fails the request.
pub async fn resolve_badges<S: AssetSource + ?Sized>(
    source: &S,
    badges: &[Badge],
    flag_base: &Url,
) -> Vec<BadgeImage> {
    let base = flag_base.as_str().trim_end_matches('/');
    let fetches = badges.iter().map(|badge| {
        let url = format!("{base}/{}.svg", badge.code);
        async move {
            match source.fetch(&url).await {
                Ok((bytes, content_type)) => Some(BadgeImage {
                    code: badge.code.clone(),
                    data_uri: data_uri(
                        &bytes,
                        content_type.as_deref().unwrap_or("image/svg+xml"),
                    ),
                }),
                Err(err) => {
                    log::debug!("assets: flag \"{}\" failed: {err}", badge.code);
                    None
                }
            }
        }
    });
    join_all(fetches).await.into_iter().flatten().collect()
}
