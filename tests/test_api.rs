// 🌐 API Tests - router driven in-process with `oneshot` against an
// in-memory store

#![cfg(feature = "server")]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use recipe_catalog::server::{create_app, create_router, AppState, UploadPolicy};
use recipe_catalog::{RecipeStore, Taxonomy, DEFAULT_CATEGORIES};
use serde_json::{json, Value};
use tower::ServiceExt;

const BOUNDARY: &str = "recipe-catalog-test-boundary";

// ============================================================================
// Helpers
// ============================================================================

enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_request(method: Method, uri: &str, parts: &[Part]) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn form_request(method: Method, uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn create_test_app() -> Router {
    let store = RecipeStore::open_in_memory(Taxonomy::with_defaults()).unwrap();
    create_router(AppState::new(store, UploadPolicy::default()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn recipe_parts<'a>(title: &'a str, categories: &'a str, difficulty: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("title", title),
        Part::Text("ingredients", r#"["2 cups flour", "1/2 tsp salt", "salt to taste"]"#),
        Part::Text("steps", r#"["Mix the dry ingredients", "Bake for 30 minutes"]"#),
        Part::Text("prepTime", "45"),
        Part::Text("servings", "8"),
        Part::Text("difficulty", difficulty),
        Part::Text("categories", categories),
    ]
}

async fn create_recipe(app: &Router, title: &str, categories: &str, difficulty: &str) -> Value {
    let (status, body) = send(
        app,
        multipart_request(Method::POST, "/api/recipes", &recipe_parts(title, categories, difficulty)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body
}

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send(&app, empty_request(Method::GET, "/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_create_returns_normalized_recipe() {
    let app = create_test_app();
    let body = create_recipe(&app, "Chocolate Cake", r#"["Dessert", "Baking"]"#, "Medium").await;

    assert!(uuid::Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    assert_eq!(body["title"], "Chocolate Cake");
    assert_eq!(
        body["ingredients"][0],
        json!({ "text": "2 cups flour", "quantity": 2.0, "unit": "cups", "name": "flour" })
    );
    assert_eq!(body["ingredients"][1]["quantity"], 0.5);
    assert_eq!(body["ingredients"][2], json!({ "text": "salt to taste" }));
    assert_eq!(body["steps"][1], json!({ "stepNumber": 2, "description": "Bake for 30 minutes" }));
    assert_eq!(body["servings"], 8);
    assert_eq!(body["difficulty"], "Medium");
    assert_eq!(body["createdAt"], body["updatedAt"]);
    assert!(body.get("image").is_none());

    let id = body["id"].as_str().unwrap();
    let (status, fetched) = send(&app, empty_request(Method::GET, &format!("/api/recipes/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_create_from_urlencoded_form() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        form_request(
            Method::POST,
            "/api/recipes",
            &[
                ("title", "Pancakes"),
                ("ingredients", r#"["1 cup milk"]"#),
                ("steps", r#"["Whisk", "Fry"]"#),
                ("prepTime", "15"),
                ("servings", "2"),
                ("difficulty", "Easy"),
                ("categories", r#"["Breakfast"]"#),
            ],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["ingredients"][0]["unit"], "cup");
}

#[tokio::test]
async fn test_validation_failures_report_every_field() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        multipart_request(
            Method::POST,
            "/api/recipes",
            &[
                Part::Text("title", ""),
                Part::Text("ingredients", "[]"),
                Part::Text("steps", r#"["Stir"]"#),
                Part::Text("prepTime", "0"),
                Part::Text("servings", "2.5"),
                Part::Text("difficulty", "Extreme"),
                Part::Text("categories", r#"["Dessert", "Dessert"]"#),
            ],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    let details = &body["details"];
    assert_eq!(details["title"], "Title is required");
    assert_eq!(details["ingredients"], "At least one ingredient is required");
    assert_eq!(details["prepTime"], "Preparation time must be a positive number");
    assert_eq!(details["servings"], "Servings must be a whole number");
    assert_eq!(details["difficulty"], "Difficulty must be Easy, Medium, or Hard");
    assert_eq!(details["categories"], "Duplicate categories are not allowed");
    assert!(details.get("steps").is_none());

    let (_, list) = send(&app, empty_request(Method::GET, "/api/recipes")).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_unknown_and_missing_categories_rejected() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        multipart_request(Method::POST, "/api/recipes", &recipe_parts("Cake", "[]", "Easy")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["categories"], "At least one category is required");

    let (status, body) = send(
        &app,
        multipart_request(Method::POST, "/api/recipes", &recipe_parts("Cake", r#"["Brunch"]"#, "Easy")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"]["categories"],
        "All categories must be from the predefined taxonomy"
    );
}

#[tokio::test]
async fn test_malformed_array_field() {
    let app = create_test_app();
    let mut parts = recipe_parts("Cake", r#"["Dessert"]"#, "Easy");
    parts[2] = Part::Text("steps", "[not json");

    let (status, body) = send(&app, multipart_request(Method::POST, "/api/recipes", &parts)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "Validation failed", "details": { "steps": "Invalid steps format" } })
    );
}

#[tokio::test]
async fn test_unknown_or_malformed_id_is_not_found() {
    let app = create_test_app();
    let missing = format!("/api/recipes/{}", uuid::Uuid::new_v4());

    for uri in ["/api/recipes/not-an-id", missing.as_str()] {
        let (status, body) = send(&app, empty_request(Method::GET, uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Recipe not found" }));

        let (status, _) = send(&app, empty_request(Method::DELETE, uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, form_request(Method::PUT, uri, &[("title", "X")])).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_list_filters_and_sorting() {
    let app = create_test_app();
    create_recipe(&app, "Chocolate Cake", r#"["Dessert"]"#, "Medium").await;
    create_recipe(&app, "Hot Chocolate", r#"["Beverage", "Quick"]"#, "Easy").await;
    create_recipe(&app, "Beef Stew", r#"["Dinner"]"#, "Hard").await;

    let (status, body) = send(&app, empty_request(Method::GET, "/api/recipes?search=choc")).await;
    assert_eq!(status, StatusCode::OK);
    let mut found = titles(&body);
    found.sort();
    assert_eq!(found, vec!["Chocolate Cake", "Hot Chocolate"]);

    // Summaries only
    assert!(body[0].get("ingredients").is_none());
    assert!(body[0].get("steps").is_none());

    let (_, body) = send(&app, empty_request(Method::GET, "/api/recipes?categories=Dinner,Quick")).await;
    let mut found = titles(&body);
    found.sort();
    assert_eq!(found, vec!["Beef Stew", "Hot Chocolate"]);

    let (_, body) = send(&app, empty_request(Method::GET, "/api/recipes?difficulty=Hard")).await;
    assert_eq!(titles(&body), vec!["Beef Stew"]);

    let (_, body) = send(&app, empty_request(Method::GET, "/api/recipes?sort=alphabetical")).await;
    assert_eq!(titles(&body), vec!["Beef Stew", "Chocolate Cake", "Hot Chocolate"]);

    let (_, body) = send(
        &app,
        empty_request(Method::GET, "/api/recipes?search=&categories=&difficulty=&sort=newest"),
    )
    .await;
    assert_eq!(titles(&body).len(), 3);
    assert_eq!(titles(&body)[0], "Beef Stew");
}

#[tokio::test]
async fn test_partial_update_keeps_unsent_fields() {
    let app = create_test_app();
    let created = create_recipe(&app, "Cake", r#"["Dessert"]"#, "Easy").await;
    let uri = format!("/api/recipes/{}", created["id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        form_request(Method::PUT, &uri, &[("title", "Lemon Cake"), ("ingredients", "")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["title"], "Lemon Cake");
    assert_eq!(updated["ingredients"], created["ingredients"]);
    assert_eq!(updated["steps"], created["steps"]);
    assert_eq!(updated["categories"], created["categories"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, updated) = send(
        &app,
        form_request(Method::PUT, &uri, &[("categories", r#"["Quick", "Snack"]"#)]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["categories"], json!(["Quick", "Snack"]));

    let (status, body) = send(&app, form_request(Method::PUT, &uri, &[("servings", "-1")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["servings"], "Servings must be a positive number");
}

#[tokio::test]
async fn test_image_round_trip_and_removal() {
    let app = create_test_app();
    let png: Vec<u8> = (0u8..=255).cycle().take(2048).collect();

    let mut parts = recipe_parts("Tart", r#"["Dessert"]"#, "Hard");
    parts.push(Part::File {
        name: "image",
        filename: "tart.png",
        content_type: "image/png",
        data: &png,
    });

    let (status, created) = send(&app, multipart_request(Method::POST, "/api/recipes", &parts)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["imageContentType"], "image/png");
    let decoded = STANDARD.decode(created["image"].as_str().unwrap()).unwrap();
    assert_eq!(decoded, png);

    let uri = format!("/api/recipes/{}", created["id"].as_str().unwrap());

    // Listing carries the image too
    let (_, list) = send(&app, empty_request(Method::GET, "/api/recipes")).await;
    assert_eq!(list[0]["image"], created["image"]);

    let (status, updated) = send(&app, form_request(Method::PUT, &uri, &[("removeImage", "true")])).await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated.get("image").is_none());
    assert!(updated.get("imageContentType").is_none());

    let (_, fetched) = send(&app, empty_request(Method::GET, &uri)).await;
    assert!(fetched.get("image").is_none());
}

#[tokio::test]
async fn test_empty_file_part_means_no_image() {
    let app = create_test_app();
    let mut parts = recipe_parts("Salad", r#"["Salad"]"#, "Easy");
    parts.push(Part::File {
        name: "image",
        filename: "",
        content_type: "application/octet-stream",
        data: &[],
    });

    let (status, created) = send(&app, multipart_request(Method::POST, "/api/recipes", &parts)).await;

    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert!(created.get("image").is_none());
}

#[tokio::test]
async fn test_upload_policy_rejections() {
    let app = create_test_app();

    let mut parts = recipe_parts("Tart", r#"["Dessert"]"#, "Hard");
    parts.push(Part::File {
        name: "image",
        filename: "menu.pdf",
        content_type: "application/pdf",
        data: b"%PDF-1.4",
    });
    let (status, body) = send(&app, multipart_request(Method::POST, "/api/recipes", &parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Only image files are allowed" }));

    let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
    let mut parts = recipe_parts("Tart", r#"["Dessert"]"#, "Hard");
    parts.push(Part::File {
        name: "image",
        filename: "huge.jpg",
        content_type: "image/jpeg",
        data: &oversized,
    });
    let (status, body) = send(&app, multipart_request(Method::POST, "/api/recipes", &parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Image file size must be under 5MB" }));

    let (_, list) = send(&app, empty_request(Method::GET, "/api/recipes")).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_delete_is_permanent() {
    let app = create_test_app();
    let created = create_recipe(&app, "Soup", r#"["Soup"]"#, "Easy").await;
    let uri = format!("/api/recipes/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Recipe deleted successfully" }));

    let (status, _) = send(&app, empty_request(Method::GET, &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_categories_endpoint_lists_taxonomy() {
    let app = create_test_app();
    let (status, body) = send(&app, empty_request(Method::GET, "/api/categories")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(DEFAULT_CATEGORIES));
}

#[tokio::test]
async fn test_custom_taxonomy_is_enforced() {
    let store = RecipeStore::open_in_memory(Taxonomy::new(["Tapas"])).unwrap();
    let app = create_router(AppState::new(store, UploadPolicy::default()));

    let (status, _) = send(
        &app,
        multipart_request(Method::POST, "/api/recipes", &recipe_parts("Patatas", r#"["Tapas"]"#, "Easy")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        multipart_request(Method::POST, "/api/recipes", &recipe_parts("Pie", r#"["Dessert"]"#, "Easy")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_static_client_with_spa_fallback() {
    let dir = std::env::temp_dir().join(format!("recipe-catalog-static-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<html>catalog</html>").unwrap();

    let store = RecipeStore::open_in_memory(Taxonomy::with_defaults()).unwrap();
    let app = create_app(AppState::new(store, UploadPolicy::default()), &dir);

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/recipes/some-client-route"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>catalog</html>");

    let (status, _) = send(&app, empty_request(Method::GET, "/api/health")).await;
    assert_eq!(status, StatusCode::OK);

    std::fs::remove_dir_all(&dir).ok();
}
