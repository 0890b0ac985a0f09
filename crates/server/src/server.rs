use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};

use std::sync::Arc;

use crate::mailer::Mailer;
use crate::{budgets, categories, expenses, groups, incomes, invitations, periods, profiles, summary};
use engine::Engine;

static USER_ID_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub mailer: Arc<Mailer>,
}

/// Identity of the authenticated caller, injected by the auth middleware.
///
/// Authentication itself happens upstream; this server trusts the
/// `x-user-id` header installed by the identity provider.
#[derive(Clone, Debug)]
pub struct AuthUser(pub String);

/// `TypedHeader` for the trusted identity header.
#[derive(Debug)]
struct XUserIdHeader(String);

impl Header for XUserIdHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        if value.trim().is_empty() {
            return Err(AxumError::invalid());
        }

        Ok(XUserIdHeader(value.trim().to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-user-id header"),
        }
    }
}

async fn auth(
    user_header: Option<TypedHeader<XUserIdHeader>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(XUserIdHeader(uid))) = user_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(AuthUser(uid));
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/users",
            post(profiles::create)
                .get(profiles::me)
                .patch(profiles::update)
                .delete(profiles::delete),
        )
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            patch(expenses::update).delete(expenses::remove),
        )
        .route("/incomes", get(incomes::list).post(incomes::create))
        .route(
            "/incomes/{id}",
            patch(incomes::update).delete(incomes::remove),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            patch(budgets::update).delete(budgets::remove),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            patch(categories::rename).delete(categories::remove),
        )
        .route(
            "/budget-periods",
            get(periods::list).post(periods::create),
        )
        .route("/budget-periods/{id}", delete(periods::remove))
        .route("/summary", get(summary::get))
        .route("/groups", post(groups::create).get(groups::current))
        .route("/groups/join", post(groups::join))
        .route("/groups/leave", post(groups::leave))
        .route("/groups/{id}/members", get(groups::members))
        .route(
            "/groups/{id}/members/{uid}",
            delete(groups::remove_member),
        )
        .route(
            "/groups/{id}/invitations",
            get(invitations::pending).post(invitations::send),
        )
        .route("/invitations/{id}", delete(invitations::revoke))
        .route_layer(middleware::from_fn(auth))
        .with_state(state)
}

pub async fn run(engine: Engine, mailer: Mailer) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, mailer, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    mailer: Mailer,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        mailer: Arc::new(mailer),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    mailer: Mailer,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, mailer, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use axum::response::Response;
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
            mailer: Arc::new(Mailer::disabled()),
        })
    }

    fn request(method: &str, uri: &str, uid: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(&USER_ID_HEADER, uid)
            .header(header::CONTENT_TYPE, "application/json");
        match body {
            Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_profile(app: &Router, uid: &str, email: &str) {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/users",
                uid,
                Some(json!({
                    "email": email,
                    "displayName": "Tester",
                    "currency": "USD",
                    "language": "en",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn missing_user_header_is_unauthorized() {
        let app = test_router().await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/expenses")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_user_is_unauthorized() {
        let app = test_router().await;
        let response = app
            .oneshot(request("GET", "/expenses", "ghost", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expense_crud_flow() {
        let app = test_router().await;
        create_profile(&app, "alice", "alice@example.com").await;

        let today = chrono::Utc::now().date_naive().to_string();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/expenses",
                "alice",
                Some(json!({
                    "date": today,
                    "category": "Food",
                    "itemName": "rice",
                    "quantity": 3.0,
                    "unit": "kg",
                    "price": 2.5,
                    "currency": "USD",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["totalCost"], json!(7.5));
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request(
                "PATCH",
                &format!("/expenses/{id}"),
                "alice",
                Some(json!({ "price": 4.0 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["totalCost"], json!(12.0));

        let response = app
            .clone()
            .oneshot(request("GET", "/expenses", "alice", None))
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/expenses/{id}"), "alice", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(request("DELETE", &format!("/expenses/{id}"), "alice", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_category_conflicts() {
        let app = test_router().await;
        create_profile(&app, "alice", "alice@example.com").await;

        // "Food" is seeded with the profile.
        let response = app
            .oneshot(request(
                "POST",
                "/categories",
                "alice",
                Some(json!({ "name": "food" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn group_membership_flow() {
        let app = test_router().await;
        create_profile(&app, "alice", "alice@example.com").await;
        create_profile(&app, "bob", "bob@example.com").await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/groups",
                "alice",
                Some(json!({ "name": "household" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let group = body_json(response).await;
        let group_id = group["id"].as_str().unwrap().to_string();
        let invite_code = group["inviteCode"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/groups/join",
                "bob",
                Some(json!({ "inviteCode": invite_code })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/groups/{group_id}/members"),
                "alice",
                None,
            ))
            .await
            .unwrap();
        let members = body_json(response).await;
        assert_eq!(members["members"].as_array().unwrap().len(), 2);

        // Only admins may remove members.
        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/groups/{group_id}/members/alice"),
                "bob",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/groups/{group_id}/members/bob"),
                "alice",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(request("GET", "/groups", "bob", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn joining_with_bad_invite_code_is_rejected() {
        let app = test_router().await;
        create_profile(&app, "bob", "bob@example.com").await;

        let response = app
            .oneshot(request(
                "POST",
                "/groups/join",
                "bob",
                Some(json!({ "inviteCode": "GR-NOPE1234" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn invitation_reports_mailer_outcome() {
        let app = test_router().await;
        create_profile(&app, "alice", "alice@example.com").await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/groups",
                "alice",
                Some(json!({ "name": "household" })),
            ))
            .await
            .unwrap();
        let group = body_json(response).await;
        let group_id = group["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(request(
                "POST",
                &format!("/groups/{group_id}/invitations"),
                "alice",
                Some(json!({ "email": "Carol@Example.com" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let invitation = body_json(response).await;
        assert_eq!(invitation["email"], json!("carol@example.com"));
        assert_eq!(invitation["status"], json!("pending"));
        assert_eq!(invitation["emailSent"], json!(false));
    }

    #[tokio::test]
    async fn summary_aggregates_by_currency() {
        let app = test_router().await;
        create_profile(&app, "alice", "alice@example.com").await;

        let today = chrono::Utc::now().date_naive().to_string();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/expenses",
                "alice",
                Some(json!({
                    "date": today,
                    "category": "Food",
                    "itemName": "rice",
                    "quantity": 2.0,
                    "unit": null,
                    "price": 5.0,
                    "currency": "USD",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/incomes",
                "alice",
                Some(json!({
                    "date": today,
                    "amount": 100.0,
                    "currency": "USD",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request("GET", "/summary?range=last30Days", "alice", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let summary = body_json(response).await;
        assert_eq!(summary["totalExpenses"]["USD"], json!(10.0));
        assert_eq!(summary["totalIncomes"]["USD"], json!(100.0));
        assert_eq!(summary["expenseCount"], json!(1));
        assert_eq!(summary["incomeCount"], json!(1));
        assert_eq!(summary["profitLoss"]["USD"], json!(90.0));
    }

    #[tokio::test]
    async fn summary_rejects_unknown_range_token() {
        let app = test_router().await;
        create_profile(&app, "alice", "alice@example.com").await;

        let response = app
            .oneshot(request("GET", "/summary?range=fortnight", "alice", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
