use orv_core::{
    create_response_validator, ApiSpec, OpenApiSpec, RecordedResponse, ResponseValidator,
    ValidationErrorCode,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const PETSTORE: &str = r##"
openapi: 3.0.3
info:
  title: Petstore
  version: 1.0.0
servers:
  - url: https://{region}.petstore.example.com/{version}/api
    variables:
      region:
        default: eu
        enum: [eu, us]
      version:
        default: v2
        enum: [v1, v2, v3]
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        "200":
          description: A list of pets
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/Pet"
  /pets/{petId}:
    get:
      operationId: showPetById
      responses:
        "200":
          description: A pet
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Pet"
        "404":
          $ref: "#/components/responses/NotFound"
  /pets/mine:
    get:
      operationId: myPets
      responses:
        "200":
          description: Mine
components:
  responses:
    NotFound:
      description: Not found
      content:
        application/json:
          schema:
            $ref: "#/components/schemas/Error"
  schemas:
    Pet:
      type: object
      required: [id, name]
      properties:
        id:
          type: integer
        name:
          type: string
        tag:
          type: string
          nullable: true
    Error:
      type: object
      required: [message]
      properties:
        message:
          type: string
"##;

fn validator() -> ResponseValidator<RecordedResponse> {
    let document: Value = serde_yaml::from_str(PETSTORE).unwrap();
    create_response_validator(document).unwrap()
}

fn validate(url: &str, method: &str, status: u16, body: Option<Value>) -> Option<ValidationErrorCode> {
    validator()
        .validate(RecordedResponse::new(url, status, body), method)
        .unwrap()
        .validation_error
        .map(|e| e.code)
}

#[test]
fn test_valid_responses_across_templated_servers() {
    for version in ["v1", "v2", "v3"] {
        let url = format!("https://us.petstore.example.com/{}/api/pets/1", version);
        assert_eq!(
            validate(&url, "GET", 200, Some(json!({"id": 1, "name": "Rex", "tag": null}))),
            None,
            "version {}",
            version
        );
    }
}

#[test]
fn test_unknown_server_version_short_circuits() {
    assert_eq!(
        validate(
            "https://eu.petstore.example.com/v4/api/pets/1",
            "GET",
            200,
            Some(json!("not even the right shape"))
        ),
        Some(ValidationErrorCode::ServerNotFound)
    );
}

#[test]
fn test_unknown_path() {
    assert_eq!(
        validate("https://eu.petstore.example.com/v2/api/owners", "GET", 200, None),
        Some(ValidationErrorCode::PathNotFound)
    );
}

#[test]
fn test_undeclared_method() {
    assert_eq!(
        validate("https://eu.petstore.example.com/v2/api/pets", "DELETE", 200, None),
        Some(ValidationErrorCode::MethodNotFound)
    );
}

#[test]
fn test_undeclared_status() {
    assert_eq!(
        validate("https://eu.petstore.example.com/v2/api/pets", "GET", 404, None),
        Some(ValidationErrorCode::StatusNotFound)
    );
}

#[test]
fn test_invalid_body_names_the_missing_property() {
    let result = validator()
        .validate(
            RecordedResponse::new(
                "https://eu.petstore.example.com/v2/api/pets/1",
                200,
                Some(json!({"name": "Rex"})),
            ),
            "get",
        )
        .unwrap();
    let error = result.validation_error.unwrap();
    assert_eq!(error.code, ValidationErrorCode::InvalidBody);
    assert_eq!(error.operation_id.as_deref(), Some("showPetById"));
    assert!(error.message.contains("id"), "{}", error.message);
}

#[test]
fn test_shared_response_reference_is_followed() {
    let url = "https://eu.petstore.example.com/v2/api/pets/9";
    assert_eq!(validate(url, "GET", 404, Some(json!({"message": "gone"}))), None);
    assert_eq!(
        validate(url, "GET", 404, Some(json!({"msg": "gone"}))),
        Some(ValidationErrorCode::InvalidBody)
    );
}

#[test]
fn test_literal_template_beats_parameterized() {
    // `/pets/mine` declares no schema, so any body passes only if it was chosen.
    assert_eq!(
        validate(
            "https://eu.petstore.example.com/v2/api/pets/mine",
            "GET",
            200,
            Some(json!("anything"))
        ),
        None
    );
}

#[test]
fn test_array_items_are_checked() {
    let url = "https://eu.petstore.example.com/v2/api/pets";
    assert_eq!(
        validate(url, "GET", 200, Some(json!([{"id": 1, "name": "a"}]))),
        None
    );
    assert_eq!(
        validate(url, "GET", 200, Some(json!([{"id": "1", "name": "a"}]))),
        Some(ValidationErrorCode::InvalidBody)
    );
}

#[test]
fn test_validation_is_repeatable() {
    let validator = validator();
    let run = || {
        validator
            .validate(
                RecordedResponse::new(
                    "https://eu.petstore.example.com/v2/api/pets/1",
                    200,
                    Some(json!({})),
                ),
                "GET",
            )
            .unwrap()
            .validation_error
    };
    assert_eq!(run(), run());
}

#[test]
fn test_validate_object_against_component() {
    let validator = validator();
    let schema = json!({"$ref": "#/components/schemas/Pet"});
    assert_eq!(validator.validate_object(&json!({"id": 1, "name": "x"}), &schema), None);

    let error = validator
        .validate_object(&json!({"id": 1}), &schema)
        .unwrap();
    assert_eq!(error.code, ValidationErrorCode::InvalidObject);
    assert!(error.operation_id.is_none());
    assert!(error.message.starts_with("object "), "{}", error.message);
}

#[test]
fn test_swagger_two_document() {
    let spec = ApiSpec::from_yaml(
        r##"
swagger: "2.0"
info: {title: Legacy, version: "1"}
basePath: /legacy
paths:
  /items/{id}:
    get:
      operationId: getItem
      responses:
        "200":
          description: ok
          schema:
            $ref: "#/definitions/Item"
        "500":
          description: boom
          schema:
            $ref: "#/responses/ServerError"
responses:
  ServerError:
    description: err
    schema:
      type: object
      required: [code]
      properties:
        code: {type: integer}
definitions:
  Item:
    type: object
    required: [id]
    properties:
      id: {type: integer}
      label: {type: string, x-nullable: true}
"##,
    )
    .unwrap();

    assert_eq!(
        spec.find_open_api_path_matching_pathname("/legacy/items/3").unwrap(),
        "/items/{id}"
    );

    let validator: ResponseValidator<RecordedResponse> = ResponseValidator::new(spec);
    let check = |status: u16, body: Value| {
        validator
            .validate(
                RecordedResponse::new("http://localhost/legacy/items/3", status, Some(body)),
                "GET",
            )
            .unwrap()
            .validation_error
            .map(|e| e.code)
    };

    assert_eq!(check(200, json!({"id": 3, "label": null})), None);
    assert_eq!(
        check(200, json!({"id": "3"})),
        Some(ValidationErrorCode::InvalidBody)
    );
    assert_eq!(check(500, json!({"code": 1})), None);
    assert_eq!(
        check(500, json!({})),
        Some(ValidationErrorCode::InvalidBody)
    );
}

#[test]
fn test_invalid_documents_are_rejected() {
    assert!(ApiSpec::from_yaml("openapi: 3.0.0\ninfo: {title: T, version: '1'}\npaths:\n  users: {}\n").is_err());
    assert!(ApiSpec::from_yaml("info: {title: T, version: '1'}\npaths: {}\n").is_err());
    assert!(ApiSpec::from_yaml(
        "openapi: 3.0.0\ninfo: {title: T, version: '1'}\nservers:\n  - url: https://x/{v}\npaths: {}\n"
    )
    .is_err());
}

#[test]
fn test_validate_object_needs_no_resolution() {
    let spec = ApiSpec::from_yaml("openapi: 3.1.0\ninfo: {title: Empty, version: '1'}\n").unwrap();
    let error = orv_core::validate_object(
        &spec,
        &json!({"foo": 1}),
        &json!({"type": "object", "properties": {"foo": {"type": "string"}}}),
    )
    .unwrap();
    assert_eq!(error.code, ValidationErrorCode::InvalidObject);
    assert!(error.message.contains("foo"), "{}", error.message);
}

#[test]
fn test_nullable_properties_named_like_keywords() {
    let spec = ApiSpec::from_yaml(
        r##"
openapi: 3.0.3
info: {title: Settings, version: "1"}
paths:
  /settings:
    get:
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: object
                properties:
                  default: {type: string, nullable: true}
                  example: {type: string, nullable: true}
                  name: {type: string, nullable: true}
"##,
    )
    .unwrap();
    let validator: ResponseValidator<RecordedResponse> = ResponseValidator::new(spec);
    for body in [json!({"default": null}), json!({"example": null}), json!({"name": null})] {
        let result = validator
            .validate(RecordedResponse::new("/settings", 200, Some(body.clone())), "GET")
            .unwrap();
        assert_eq!(result.validation_error, None, "{}", body);
    }
}
