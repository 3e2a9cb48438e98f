use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{auth as auth_api, balance, categories, entries, events, settings, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolve the bearer token to a session and stash it in the request
/// extensions for the handlers.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = auth_header.ok_or(StatusCode::UNAUTHORIZED)?;

    let session = state
        .engine
        .session(auth_header.token())
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/auth/signUp", post(auth_api::sign_up))
        .route("/auth/signIn", post(auth_api::sign_in))
        .route("/auth/resetPassword", post(auth_api::reset_request))
        .route("/auth/resetPassword/confirm", post(auth_api::reset_confirm));

    let protected = Router::new()
        .route("/auth/session", get(auth_api::session))
        .route("/auth/signOut", post(auth_api::sign_out))
        .route("/auth/password", put(auth_api::update_password))
        .route("/balance", get(balance::get))
        .route("/balance/recompute", post(balance::recompute))
        .route(
            "/incomes",
            get(entries::incomes_list).post(entries::income_new),
        )
        .route(
            "/expenses",
            get(entries::expenses_list).post(entries::expense_new),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            patch(transactions::update).delete(transactions::remove),
        )
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            patch(categories::update).delete(categories::remove),
        )
        .route("/profile", get(settings::profile_get).put(settings::profile_update))
        .route(
            "/preferences",
            get(settings::preferences_get).put(settings::preferences_update),
        )
        .route(
            "/security",
            get(settings::security_get).put(settings::security_update),
        )
        .route(
            "/paymentMethods",
            get(settings::payment_methods_list).post(settings::payment_method_new),
        )
        .route(
            "/paymentMethods/{id}",
            patch(settings::payment_method_update).delete(settings::payment_method_remove),
        )
        .route("/events", get(events::stream))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    public.merge(protected).with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode, header};
    use http_body_util::BodyExt;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();

        router(ServerState {
            engine: Arc::new(engine),
        })
    }

    fn post_json(uri: &str, body: Value) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn sign_up_and_in(app: &Router, email: &str, password: &str) -> String {
        let res = app
            .clone()
            .oneshot(post_json(
                "/auth/signUp",
                json!({ "email": email, "password": password }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .clone()
            .oneshot(post_json(
                "/auth/signIn",
                json!({ "email": email, "password": password }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = json_body(res).await;
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn sign_up_provisions_balance() {
        let app = test_router().await;
        let token = sign_up_and_in(&app, "mina@example.com", "secret1").await;

        let res = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/balance")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = json_body(res).await;
        assert_eq!(body["total_balance_minor"], 0);
        assert_eq!(body["last_earned_minor"], 0);
        assert_eq!(body["total_bonus_minor"], 0);
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = test_router().await;

        let res = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/balance")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = test_router().await;
        sign_up_and_in(&app, "mina@example.com", "secret1").await;

        let res = app
            .oneshot(post_json(
                "/auth/signIn",
                json!({ "email": "mina@example.com", "password": "wrong1" }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body = json_body(res).await;
        assert_eq!(body["error"], "invalid login credentials");
    }

    #[tokio::test]
    async fn duplicate_category_is_conflict() {
        let app = test_router().await;
        let token = sign_up_and_in(&app, "mina@example.com", "secret1").await;

        let payload = json!({ "name": "Market", "kind": "expense" });
        for expected in [StatusCode::OK, StatusCode::CONFLICT] {
            let mut request = post_json("/categories", payload.clone());
            request.headers_mut().insert(
                header::AUTHORIZATION,
                format!("Bearer {token}").parse().unwrap(),
            );

            let res = app.clone().oneshot(request).await.unwrap();
            assert_eq!(res.status(), expected);
        }
    }
}
