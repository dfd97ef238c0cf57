//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. It
//! registers the auth, complaints, and health paths, the schema wrappers
//! that describe domain types without coupling them to utoipa, and the
//! session cookie security scheme. Swagger UI serves the document in debug
//! builds.

use crate::inbound::http::auth::{IdentityBody, LoginRequestBody, RegisterRequestBody};
use crate::inbound::http::complaints::{
    AppliedFiltersBody, ComplaintBody, ComplaintListBody, CreateComplaintBody, OwnerBody,
    UpdateStatusBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Complaint desk backend API",
        description = "HTTP interface for registering, filing, and tracking campus complaints.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::complaints::create_complaint,
        crate::inbound::http::complaints::list_complaints,
        crate::inbound::http::complaints::list_my_complaints,
        crate::inbound::http::complaints::update_complaint_status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        IdentityBody,
        RegisterRequestBody,
        LoginRequestBody,
        CreateComplaintBody,
        UpdateStatusBody,
        ComplaintBody,
        OwnerBody,
        ComplaintListBody,
        AppliedFiltersBody,
    )),
    tags(
        (name = "auth", description = "Registration and session management"),
        (name = "complaints", description = "Filing and tracking complaints"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_complaint_schema_uses_camel_case_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let complaint_schema = schemas.get("ComplaintBody").expect("complaint schema");

        assert_object_schema_has_field(complaint_schema, "attachmentRef");
        assert_object_schema_has_field(complaint_schema, "createdAt");
        assert_object_schema_has_field(complaint_schema, "owner");
    }

    #[test]
    fn openapi_registers_the_complaints_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/complaints"));
        assert!(doc.paths.paths.contains_key("/api/v1/complaints/my"));
        assert!(doc.paths.paths.contains_key("/api/v1/complaints/{id}"));
    }
}
