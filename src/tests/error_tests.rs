#[cfg(test)]
mod tests {
    use crate::error::{AppError, AppResult, GENERIC_FAILURE_MESSAGE};
    use crate::gate::StoreError;
    use crate::routes::catch_panic_layer;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let error = AppError::BadRequest("Invalid request body".to_string());
        assert_eq!(format!("{}", error), "Bad request: Invalid request body");

        let error = AppError::InvalidInput("Name is required".to_string());
        assert_eq!(format!("{}", error), "Invalid input: Name is required");

        let error = AppError::RateLimited { retry_after_seconds: 900 };
        assert_eq!(format!("{}", error), "Rate limited. Retry after 900 seconds");

        assert_eq!(format!("{}", AppError::Forbidden), "Forbidden");
    }

    #[test]
    fn test_app_error_status() {
        assert_eq!(AppError::BadRequest("x".into()).into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidInput("x".into()).into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Forbidden.into_response().status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::RateLimited { retry_after_seconds: 1 }.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(AppError::Database("x".into()).into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("x")).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let response = AppError::RateLimited { retry_after_seconds: 900 }.into_response();
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "900");
        let json = body_json(response).await;
        assert_eq!(json["error"], "Too many requests. Please try again later.");
    }

    #[tokio::test]
    async fn test_validation_message_is_verbatim() {
        let json = body_json(AppError::InvalidInput("Invalid email format".into()).into_response()).await;
        assert_eq!(json, serde_json::json!({ "error": "Invalid email format" }));
    }

    #[tokio::test]
    async fn test_internal_detail_never_reaches_client() {
        let response = AppError::Database("UNIQUE constraint failed: contact_messages.id (code 1555)".into())
            .into_response();
        let json = body_json(response).await;
        assert_eq!(json["error"], GENERIC_FAILURE_MESSAGE);

        let response = AppError::Internal(anyhow::anyhow!("token=secret")).into_response();
        let json = body_json(response).await;
        assert_eq!(json["error"], GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_error_conversions() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, AppError::Internal(_)));

        // Storage failures are always a 500, pool timeouts included
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Database(_)));

        let err: AppError = StoreError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_panicking_handler_becomes_generic_500() {
        let app = Router::new()
            .route("/boom", get(|| async {
                panic!("secret=hunter2");
                #[allow(unreachable_code)]
                ()
            }))
            .layer(catch_panic_layer());

        let response = app.oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({ "error": GENERIC_FAILURE_MESSAGE }));
    }

    #[test]
    fn test_app_result_propagates() {
        fn check(ok: bool) -> AppResult<u8> {
            if ok {
                Ok(1)
            } else {
                Err(AppError::Forbidden)
            }
        }
        fn outer() -> AppResult<u8> {
            let v = check(true)?;
            check(false).map(|w| v + w)
        }
        assert!(matches!(outer(), Err(AppError::Forbidden)));
    }
}
