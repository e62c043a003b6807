/// Response headers for storefront and back-office responses
///
/// Built once from [`Config`] and applied as a stack of
/// `tower_http::set_header::SetResponseHeaderLayer`s. Product and category
/// images are served from `MEDIA_URL`; when that is an absolute URL its
/// origin is allowed in the `img-src` directive next to `'self'`.
///
/// ```text
/// X-Content-Type-Options: nosniff
/// X-Frame-Options: DENY
/// Referrer-Policy: strict-origin-when-cross-origin
/// Content-Security-Policy: default-src 'none'; img-src 'self' data: <media origin>; frame-ancestors 'none'
/// Strict-Transport-Security: max-age=31536000; includeSubDomains   (API_PRODUCTION=true)
/// ```

use axum::{
    http::{header, HeaderName, HeaderValue},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

use crate::config::Config;

const HSTS: &str = "max-age=31536000; includeSubDomains";

/// Headers added to every response
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl SecurityHeaders {
    /// Header set for the given configuration
    pub fn from_config(config: &Config) -> Self {
        let mut headers = vec![
            (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
            (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
            (
                header::REFERRER_POLICY,
                HeaderValue::from_static("strict-origin-when-cross-origin"),
            ),
            (
                header::CONTENT_SECURITY_POLICY,
                content_security_policy(&config.catalog.media_url),
            ),
        ];

        if config.api.production {
            headers.push((header::STRICT_TRANSPORT_SECURITY, HeaderValue::from_static(HSTS)));
        }

        Self { headers }
    }

    /// Value for `name`, if it is part of the set
    pub fn get(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Layers every header onto `router`, replacing values set by handlers
    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.headers.into_iter().fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(name, value))
        })
    }
}

/// Origin part (`scheme://host[:port]`) of an absolute http(s) URL
fn media_origin(media_url: &str) -> Option<&str> {
    let rest = media_url
        .strip_prefix("https://")
        .or_else(|| media_url.strip_prefix("http://"))?;
    let host_len = rest.find('/').unwrap_or(rest.len());
    if host_len == 0 {
        return None;
    }
    Some(&media_url[..media_url.len() - rest.len() + host_len])
}

fn content_security_policy(media_url: &str) -> HeaderValue {
    const SAME_ORIGIN: &str = "default-src 'none'; img-src 'self' data:; frame-ancestors 'none'";

    let Some(origin) = media_origin(media_url) else {
        return HeaderValue::from_static(SAME_ORIGIN);
    };

    let policy = format!(
        "default-src 'none'; img-src 'self' data: {}; frame-ancestors 'none'",
        origin
    );
    HeaderValue::from_str(&policy).unwrap_or_else(|_| {
        warn!(media_url, "MEDIA_URL origin is not a valid header value; images limited to 'self'");
        HeaderValue::from_static(SAME_ORIGIN)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, CatalogConfig, DatabaseConfig, JwtConfig};
    use axum::{body::Body, extract::Request, routing::get};
    use pcshop_shared::catalog::stats::SpendPolicy;
    use tower::Service as _;

    fn config(production: bool, media_url: &str) -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                production,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/pcshop_test".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            catalog: CatalogConfig {
                spend_policy: SpendPolicy::All,
                media_url: media_url.to_string(),
            },
        }
    }

    fn csp(headers: &SecurityHeaders) -> &str {
        headers
            .get(&header::CONTENT_SECURITY_POLICY)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[test]
    fn test_media_origin() {
        assert_eq!(
            media_origin("https://cdn.pcshop.example/media/"),
            Some("https://cdn.pcshop.example")
        );
        assert_eq!(media_origin("http://localhost:9000"), Some("http://localhost:9000"));
        assert_eq!(media_origin("/media/"), None);
        assert_eq!(media_origin("https:///media/"), None);
    }

    #[test]
    fn test_relative_media_url_keeps_images_same_origin() {
        let headers = SecurityHeaders::from_config(&config(false, "/media/"));
        assert_eq!(
            csp(&headers),
            "default-src 'none'; img-src 'self' data:; frame-ancestors 'none'"
        );
    }

    #[test]
    fn test_media_host_is_allowed_for_images() {
        let headers = SecurityHeaders::from_config(&config(false, "https://cdn.pcshop.example/media/"));
        assert!(csp(&headers).contains("img-src 'self' data: https://cdn.pcshop.example;"));
    }

    #[test]
    fn test_hsts_only_in_production() {
        let dev = SecurityHeaders::from_config(&config(false, "/media/"));
        assert!(dev.get(&header::STRICT_TRANSPORT_SECURITY).is_none());

        let prod = SecurityHeaders::from_config(&config(true, "/media/"));
        assert_eq!(prod.get(&header::STRICT_TRANSPORT_SECURITY).unwrap(), HSTS);
    }

    #[tokio::test]
    async fn test_headers_override_handler_values() {
        let mut app = SecurityHeaders::from_config(&config(true, "/media/")).apply(
            Router::new().route(
                "/product",
                get(|| async { ([(header::X_FRAME_OPTIONS, "SAMEORIGIN")], "ok") }),
            ),
        );

        let response = app
            .call(Request::builder().uri("/product").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert!(headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
    }
}
