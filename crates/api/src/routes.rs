use crate::handlers;
use crate::middleware;
use crate::AppState;
use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Layers run bottom-up: authenticate first, then resolve the tenant
    let talents = Router::new()
        .route(
            "/api/talents",
            get(handlers::talent::list_talents).post(handlers::talent::create_talent),
        )
        .route("/api/talents/count", get(handlers::talent::count_talents))
        .route("/api/talents/search", get(handlers::talent::search_talents))
        .route(
            "/api/talents/:id",
            get(handlers::talent::get_talent)
                .put(handlers::talent::update_talent)
                .delete(handlers::talent::delete_talent),
        )
        .route_layer(from_fn_with_state(state.clone(), middleware::resolve_tenant))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        .merge(talents)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::talent::ApiResponse;
    use crate::handlers::ErrorResponse;
    use crate::store::TalentStore;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use saas_auth::JwtService;
    use saas_database::InMemoryStore;
    use saas_models::{Talent, TenantId};
    use saas_tenant::TenantResolver;
    use serde::de::DeserializeOwned;
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-min-32-characters-long";

    fn app() -> Router {
        let state = AppState::new(
            JwtService::new(SECRET).unwrap(),
            TenantResolver::default(),
            TalentStore::Memory(InMemoryStore::new()),
        );
        create_router(Arc::new(state))
    }

    fn token_for(customer_id: Option<TenantId>) -> String {
        JwtService::new(SECRET)
            .unwrap()
            .generate_access_token(Uuid::new_v4(), "recruiter@example.com", customer_id, None)
            .unwrap()
    }

    fn request(method: Method, uri: &str, token: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token));

        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body<T: DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, token: &str, first_name: &str, email: &str) -> Talent {
        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/talents",
                token,
                Some(json!({ "first_name": first_name, "last_name": "Doe", "email": email })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: ApiResponse<Talent> = json_body(response).await;
        assert!(body.success);
        body.data.unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn talents_require_a_bearer_token() {
        let response = app()
            .oneshot(Request::builder().uri("/api/talents").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app()
            .oneshot(request(Method::GET, "/api/talents", "not-a-jwt", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn principal_without_customer_is_forbidden() {
        let response = app()
            .oneshot(request(Method::GET, "/api/talents", &token_for(None), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body: ErrorResponse = json_body(response).await;
        assert_eq!(body.error, "tenant_required");
    }

    #[tokio::test]
    async fn crud_within_one_customer() {
        let app = app();
        let token = token_for(Some(TenantId::generate()));

        let talent = create(&app, &token, "Grace", "grace@example.com").await;
        let uri = format!("/api/talents/{}", talent.id);

        let response = app.clone().oneshot(request(Method::GET, &uri, &token, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Talent = json_body(response).await;
        assert_eq!(fetched, talent);

        let response = app
            .clone()
            .oneshot(request(Method::PUT, &uri, &token, Some(json!({ "skills": "COBOL, compilers" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: ApiResponse<Talent> = json_body(response).await;
        assert_eq!(updated.data.unwrap().skills.as_deref(), Some("COBOL, compilers"));

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/talents/search?keyword=cobol", &token, None))
            .await
            .unwrap();
        let found: Vec<Talent> = json_body(response).await;
        assert_eq!(found.len(), 1);

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/talents/count", &token, None))
            .await
            .unwrap();
        let count: ApiResponse<i64> = json_body(response).await;
        assert_eq!(count.data, Some(1));

        let response = app.clone().oneshot(request(Method::DELETE, &uri, &token, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(request(Method::GET, &uri, &token, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn foreign_and_missing_ids_look_the_same() {
        let app = app();
        let token_a = token_for(Some(TenantId::generate()));
        let token_b = token_for(Some(TenantId::generate()));

        let talent = create(&app, &token_a, "Ada", "ada@example.com").await;
        let foreign = format!("/api/talents/{}", talent.id);
        let missing = format!("/api/talents/{}", Uuid::new_v4());

        for method in [Method::GET, Method::DELETE] {
            let a = app.clone().oneshot(request(method.clone(), &foreign, &token_b, None)).await.unwrap();
            let b = app.clone().oneshot(request(method, &missing, &token_b, None)).await.unwrap();

            assert_eq!(a.status(), StatusCode::NOT_FOUND);
            assert_eq!(b.status(), StatusCode::NOT_FOUND);

            let a = a.into_body().collect().await.unwrap().to_bytes();
            let b = b.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(a, b);
        }

        let response = app
            .clone()
            .oneshot(request(Method::PUT, &foreign, &token_b, Some(json!({ "first_name": "Mallory" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Still intact for its owner
        let response = app.oneshot(request(Method::GET, &foreign, &token_a, None)).await.unwrap();
        let fetched: Talent = json_body(response).await;
        assert_eq!(fetched.first_name, "Ada");
    }

    #[tokio::test]
    async fn listings_are_scoped_to_the_caller() {
        let app = app();
        let token_a = token_for(Some(TenantId::generate()));
        let token_b = token_for(Some(TenantId::generate()));

        create(&app, &token_a, "Alice", "alice@example.com").await;
        create(&app, &token_a, "Alan", "alan@example.com").await;
        create(&app, &token_b, "Bob", "bob@example.com").await;

        let response = app.clone().oneshot(request(Method::GET, "/api/talents", &token_b, None)).await.unwrap();
        let listed: Vec<Talent> = json_body(response).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].first_name, "Bob");

        let response = app
            .oneshot(request(Method::GET, "/api/talents/search?keyword=al", &token_b, None))
            .await
            .unwrap();
        let found: Vec<Talent> = json_body(response).await;
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn invalid_input_and_duplicates_are_bad_request() {
        let app = app();
        let token = token_for(Some(TenantId::generate()));
        create(&app, &token, "Grace", "grace@example.com").await;

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/talents",
                &token,
                Some(json!({ "first_name": "Grace", "last_name": "Hopper", "email": "GRACE@example.com" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = json_body(response).await;
        assert_eq!(body.error, "duplicate_entry");

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/talents",
                &token,
                Some(json!({ "first_name": "", "last_name": "Hopper", "email": "nope" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(request(Method::GET, "/api/talents/search?keyword=", &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
