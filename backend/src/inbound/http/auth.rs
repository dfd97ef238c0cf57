//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/register {"name":"Alice","email":"alice@example.com","password":"secret1","role":"student"}
//! POST /api/v1/login {"email":"alice@example.com","password":"secret1"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    CredentialValidationError, Error, Identity, LoginCredentials, RegistrationRequest,
    RegistrationValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    /// Display name, at least three characters.
    pub name: String,
    /// Email address, unique across accounts.
    pub email: String,
    /// Password, at least six characters.
    pub password: String,
    /// Requested role, `student` or `admin`.
    pub role: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    /// Email address the account was registered with.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Identity payload returned by registration and login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityBody {
    /// Stable user identifier.
    pub id: i64,
    /// Role the account holds.
    pub role: String,
}

impl From<Identity> for IdentityBody {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            role: identity.role.as_str().to_owned(),
        }
    }
}

fn map_credential_error(err: CredentialValidationError) -> Error {
    let field = match err {
        CredentialValidationError::EmptyEmail | CredentialValidationError::MalformedEmail => {
            "email"
        }
        CredentialValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_registration_error(err: RegistrationValidationError) -> Error {
    let field = match err {
        RegistrationValidationError::NameTooShort => "name",
        RegistrationValidationError::Email(_) => "email",
        RegistrationValidationError::PasswordTooShort => "password",
        RegistrationValidationError::Role(_) => "role",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequestBody,
    responses(
        (status = 201, description = "Account created", body = IdentityBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequestBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let request = RegistrationRequest::try_from_parts(
        &payload.name,
        &payload.email,
        &payload.password,
        &payload.role,
    )
    .map_err(map_registration_error)?;

    let identity = state.registration.register(&request).await?;
    Ok(HttpResponse::Created().json(IdentityBody::from(identity)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Login success", body = IdentityBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_credential_error)?;

    let identity = state.login.authenticate(&credentials).await?;
    session.persist_user(identity.id)?;
    Ok(HttpResponse::Ok().json(IdentityBody::from(identity)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::IdentityService;
    use crate::domain::ports::FixtureUserDirectory;

    fn state_over_fixture_directory() -> HttpState {
        let identity = Arc::new(IdentityService::new(Arc::new(
            FixtureUserDirectory::default(),
        )));
        HttpState {
            login: Arc::clone(&identity) as _,
            registration: Arc::clone(&identity) as _,
            identities: identity,
            ..HttpState::fixtures()
        }
    }

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(web::scope("/api/v1").service(register).service(login))
    }

    fn register_body(email: &str, role: &str) -> RegisterRequestBody {
        RegisterRequestBody {
            name: "Alice".to_owned(),
            email: email.to_owned(),
            password: "secret1".to_owned(),
            role: role.to_owned(),
        }
    }

    #[actix_web::test]
    async fn register_then_login_sets_session_cookie() {
        let app = actix_test::init_service(test_app(state_over_fixture_directory())).await;

        let register_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body("alice@example.com", "student"))
                .to_request(),
        )
        .await;
        assert_eq!(register_res.status(), StatusCode::CREATED);

        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(LoginRequestBody {
                    email: "alice@example.com".to_owned(),
                    password: "secret1".to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(login_res.status(), StatusCode::OK);
        assert!(
            login_res
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(login_res).await).expect("json body");
        assert_eq!(body["role"], "student");
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_unauthorised() {
        let app = actix_test::init_service(test_app(state_over_fixture_directory())).await;

        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body("alice@example.com", "student"))
                .to_request(),
        )
        .await;

        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(LoginRequestBody {
                    email: "alice@example.com".to_owned(),
                    password: "wrong-password".to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(login_res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn duplicate_registration_is_rejected() {
        let app = actix_test::init_service(test_app(state_over_fixture_directory())).await;

        for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/register")
                    .set_json(register_body("alice@example.com", "student"))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), expected);
        }
    }

    #[rstest]
    #[case(RegisterRequestBody { name: "Al".into(), ..register_body("a@b.example", "student") }, "name")]
    #[case(register_body("not-an-email", "student"), "email")]
    #[case(RegisterRequestBody { password: "short".into(), ..register_body("a@b.example", "student") }, "password")]
    #[case(register_body("a@b.example", "warden"), "role")]
    #[actix_web::test]
    async fn register_reports_the_offending_field(
        #[case] body: RegisterRequestBody,
        #[case] field: &str,
    ) {
        let app = actix_test::init_service(test_app(state_over_fixture_directory())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("error payload");
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["field"], field);
    }
}
