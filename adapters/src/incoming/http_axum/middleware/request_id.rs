use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Webhook deliveries are worth an audit line each; everything else is left
/// to the trace layer.
fn is_webhook_endpoint(path: &str) -> bool {
    path == "/webhook" || path.ends_with("/webhook")
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|header| header.to_str().ok())
        .filter(|value| !value.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);

    let request_path = request.uri().path().to_string();
    let is_webhook = is_webhook_endpoint(&request_path);

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    if is_webhook {
        tracing::info!(
            request_id = %request_id,
            path = %request_path,
            "Webhook delivery received"
        );
    }

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    if is_webhook {
        tracing::info!(
            request_id = %request_id,
            status = %response.status(),
            path = %request_path,
            "Webhook delivery completed"
        );
    }

    response
}
