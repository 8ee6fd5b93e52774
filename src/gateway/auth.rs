use axum::http::{HeaderMap, header};
use axum_extra::headers::{self, HeaderMapExt};

/// Preemptive basic authentication for the web service user
pub fn authenticated_headers(username: &str, password: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.typed_insert(headers::Authorization::basic(username, password));
    if let Some(auth) = map.get_mut(header::AUTHORIZATION) {
        auth.set_sensitive(true);
    }
    map.typed_insert(headers::ContentType::json());
    map
}
