use axum::{
    body::{Body, HttpBody, to_bytes},
    http::{Request, header::CONTENT_LENGTH},
    middleware::Next,
    response::Response,
};
use tracing::error;

// 错误响应体最多读取的字节数
const MAX_LOGGED_BODY: usize = 16 * 1024;

pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    if !response.status().is_server_error() {
        return response;
    }

    // 长度未知或过大的响应体原样放行，只记录状态码
    let small_enough = response
        .body()
        .size_hint()
        .exact()
        .is_some_and(|len| len <= MAX_LOGGED_BODY as u64);
    if !small_enough {
        error!("{} {} failed - Status: {}", method, path, response.status());
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(b) => b,
        Err(e) => {
            error!("{} {} failed and its body could not be read: {}", method, path, e);
            return Response::from_parts(parts, Body::empty());
        }
    };

    error!(
        "{} {} failed - Status: {}, Body: {}",
        method,
        path,
        parts.status,
        String::from_utf8_lossy(&bytes)
    );

    // 重建响应体
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, middleware::from_fn, routing::get};
    use tower::ServiceExt;

    async fn body_of(router: Router, uri: &str) -> (StatusCode, usize) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let res = router.oneshot(req).await.unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, body.len())
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/small",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route(
                "/large",
                get(|| async { (StatusCode::BAD_GATEWAY, "x".repeat(MAX_LOGGED_BODY * 2)) }),
            )
            .route(
                "/streamed",
                get(|| async {
                    let chunks = futures_util::stream::iter(vec![
                        Ok::<_, std::io::Error>("part one, "),
                        Ok("part two"),
                    ]);
                    (StatusCode::INTERNAL_SERVER_ERROR, Body::from_stream(chunks))
                }),
            )
            .layer(from_fn(log_errors))
    }

    #[tokio::test]
    async fn small_error_bodies_are_kept() {
        assert_eq!(
            body_of(app(), "/small").await,
            (StatusCode::INTERNAL_SERVER_ERROR, 4)
        );
    }

    #[tokio::test]
    async fn oversized_error_bodies_pass_through_intact() {
        assert_eq!(
            body_of(app(), "/large").await,
            (StatusCode::BAD_GATEWAY, MAX_LOGGED_BODY * 2)
        );
    }

    #[tokio::test]
    async fn bodies_of_unknown_length_pass_through_intact() {
        assert_eq!(
            body_of(app(), "/streamed").await,
            (StatusCode::INTERNAL_SERVER_ERROR, "part one, part two".len())
        );
    }
}
