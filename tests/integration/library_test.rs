//! Library listing tests: authorization, pagination, filtering,
//! soft-delete exclusion, and rename propagation.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

async fn seed_asset(app: &TestApp, token: &str, folder_id: Option<&str>, name: &str) -> String {
    let response = app
        .request(
            "POST",
            "/api/assets",
            Some(json!({
                "folderId": folder_id,
                "name": name,
                "originalName": name,
                "mimeType": "image/png",
                "sizeBytes": 1024,
                "url": format!("https://cdn.example/{name}")
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn listing_requires_a_session() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/library", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn listing_requires_the_admin_role() {
    let app = TestApp::new().await;
    let editor = app.create_test_user("editor", "editor").await;
    let token = app.create_session(editor).await;

    let response = app.request("GET", "/api/library", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn pagination_covers_all_assets_without_duplicates() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    for i in 0..5 {
        seed_asset(&app, &token, None, &format!("asset-{i}.png")).await;
    }

    let mut seen = std::collections::HashSet::new();
    let first = app
        .request("GET", "/api/library?limit=2&page=1", None, Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.data()["pagination"]["totalAssets"], 5);
    assert_eq!(first.data()["pagination"]["totalPages"], 3);

    for page in 1..=3 {
        let response = app
            .request(
                "GET",
                &format!("/api/library?limit=2&page={page}"),
                None,
                Some(&token),
            )
            .await;
        for asset in response.data()["assets"].as_array().unwrap() {
            assert!(
                seen.insert(asset["id"].as_str().unwrap().to_string()),
                "duplicate asset across pages"
            );
        }
    }
    assert_eq!(seen.len(), 5);
}

#[tokio::test]
async fn query_filters_across_asset_fields() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    seed_asset(&app, &token, None, "sunrise.png").await;
    seed_asset(&app, &token, None, "invoice.pdf.png").await;

    let response = app
        .request("GET", "/api/library?query=SUNRISE", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let assets = response.data()["assets"].as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["name"], "sunrise.png");
}

#[tokio::test]
async fn soft_deleted_assets_are_excluded_from_listings() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let asset_id = seed_asset(&app, &token, None, "ghost.png").await;

    app.request(
        "POST",
        "/api/library/delete",
        Some(json!({ "itemIds": [asset_id] })),
        Some(&token),
    )
    .await;

    let listing = app.request("GET", "/api/library", None, Some(&token)).await;
    assert_eq!(listing.data()["assets"].as_array().unwrap().len(), 0);
    assert_eq!(listing.data()["pagination"]["totalAssets"], 0);

    // The row still exists, marked.
    let (deleted_at,): (Option<chrono::DateTime<chrono::Utc>>,) =
        sqlx::query_as("SELECT deleted_at FROM assets WHERE id = $1::uuid")
            .bind(&asset_id)
            .fetch_one(&app.db_pool)
            .await
            .expect("row should still exist");
    assert!(deleted_at.is_some());
}

#[tokio::test]
async fn renaming_a_folder_rewrites_descendant_paths_but_not_id_paths() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    // /A (f1) -> /A/B (f2) containing x.png
    let f1 = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "A" })),
            Some(&token),
        )
        .await
        .data()
        .clone();
    let f2 = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "B", "parentId": f1["id"] })),
            Some(&token),
        )
        .await
        .data()
        .clone();
    seed_asset(&app, &token, f2["id"].as_str(), "x.png").await;

    let rename = app
        .request(
            "PUT",
            &format!("/api/folders/{}", f1["id"].as_str().unwrap()),
            Some(json!({ "name": "A2" })),
            Some(&token),
        )
        .await;
    assert_eq!(rename.status, StatusCode::OK, "{:?}", rename.body);
    assert_eq!(rename.data()["path"], "/A2");

    let f2_after = app
        .request(
            "GET",
            &format!("/api/folders/{}", f2["id"].as_str().unwrap()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(f2_after.data()["path"], "/A2/B");
    assert_eq!(f2_after.data()["idPath"], f2["idPath"]);

    // The asset is still reachable by listing f2.
    let listing = app
        .request(
            "GET",
            &format!("/api/library?folderId={}", f2["id"].as_str().unwrap()),
            None,
            Some(&token),
        )
        .await;
    let assets = listing.data()["assets"].as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["name"], "x.png");
}

#[tokio::test]
async fn listing_joins_uploader_display_names() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    seed_asset(&app, &token, None, "named.png").await;

    let listing = app.request("GET", "/api/library", None, Some(&token)).await;
    let assets = listing.data()["assets"].as_array().unwrap();
    assert_eq!(assets[0]["uploadedByName"], "admin");
}
