//! Folder hierarchy tests: path derivation, sibling uniqueness,
//! recursive deletion, soft-delete idempotence.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

async fn create_folder(
    app: &TestApp,
    token: &str,
    name: &str,
    parent_id: Option<&str>,
) -> serde_json::Value {
    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": name, "parentId": parent_id })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data().clone()
}

#[tokio::test]
async fn creating_nested_folders_derives_both_paths() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let images = create_folder(&app, &token, "Images", None).await;
    assert_eq!(images["path"], "/Images");
    assert_eq!(
        images["idPath"],
        format!("/{}", images["id"].as_str().unwrap())
    );

    let photos = create_folder(&app, &token, "Photos", images["id"].as_str()).await;
    assert_eq!(photos["path"], "/Images/Photos");
    assert_eq!(
        photos["idPath"],
        format!(
            "/{}/{}",
            images["id"].as_str().unwrap(),
            photos["id"].as_str().unwrap()
        )
    );
    assert_eq!(photos["parentId"], images["id"]);
}

#[tokio::test]
async fn sibling_names_must_be_unique_among_live_rows() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let first = create_folder(&app, &token, "Docs", None).await;

    let dup = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Docs" })),
            Some(&token),
        )
        .await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(dup.body["error"], "CONFLICT");

    // Trash the original; the name becomes available again.
    let del = app
        .request(
            "POST",
            "/api/library/delete",
            Some(json!({ "itemIds": [first["id"]] })),
            Some(&token),
        )
        .await;
    assert_eq!(del.status, StatusCode::OK);

    let again = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Docs" })),
            Some(&token),
        )
        .await;
    assert_eq!(again.status, StatusCode::OK, "{:?}", again.body);
}

#[tokio::test]
async fn recursive_delete_removes_descendants_before_root_and_their_assets() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let a = create_folder(&app, &token, "A", None).await;
    let b = create_folder(&app, &token, "B", a["id"].as_str()).await;
    let c = create_folder(&app, &token, "C", b["id"].as_str()).await;

    let asset = app
        .request(
            "POST",
            "/api/assets",
            Some(json!({
                "folderId": c["id"],
                "name": "deep.png",
                "originalName": "deep.png",
                "mimeType": "image/png",
                "sizeBytes": 42,
                "url": "https://cdn.example/deep.png"
            })),
            Some(&token),
        )
        .await;
    assert_eq!(asset.status, StatusCode::OK, "{:?}", asset.body);

    let del = app
        .request(
            "DELETE",
            &format!("/api/folders/{}?recursive=true", a["id"].as_str().unwrap()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(del.status, StatusCode::OK, "{:?}", del.body);
    assert_eq!(del.data()["folders"], 3);
    assert_eq!(del.data()["assets"], 1);

    for folder in [&a, &b, &c] {
        let lookup = app
            .request(
                "GET",
                &format!("/api/folders/{}", folder["id"].as_str().unwrap()),
                None,
                Some(&token),
            )
            .await;
        assert_eq!(lookup.status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn non_recursive_delete_refuses_non_empty_folders() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let a = create_folder(&app, &token, "A", None).await;
    create_folder(&app, &token, "B", a["id"].as_str()).await;

    let del = app
        .request(
            "DELETE",
            &format!("/api/folders/{}", a["id"].as_str().unwrap()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(del.status, StatusCode::BAD_REQUEST);
    assert_eq!(del.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn soft_delete_is_idempotent() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let folder = create_folder(&app, &token, "Temp", None).await;
    let ids = json!({ "itemIds": [folder["id"]] });

    let first = app
        .request("POST", "/api/library/delete", Some(ids.clone()), Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.data()["folders"], 1);

    // The second call must not fail; the row is already marked.
    let second = app
        .request("POST", "/api/library/delete", Some(ids), Some(&token))
        .await;
    assert_eq!(second.status, StatusCode::OK, "{:?}", second.body);
    assert_eq!(second.data()["folders"], 0);
}

#[tokio::test]
async fn restore_brings_a_trashed_subtree_back() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let a = create_folder(&app, &token, "A", None).await;
    let b = create_folder(&app, &token, "B", a["id"].as_str()).await;

    app.request(
        "POST",
        "/api/library/delete",
        Some(json!({ "itemIds": [a["id"]] })),
        Some(&token),
    )
    .await;

    let gone = app
        .request(
            "GET",
            &format!("/api/folders/{}", b["id"].as_str().unwrap()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let restore = app
        .request(
            "POST",
            "/api/library/restore",
            Some(json!({ "itemIds": [a["id"]] })),
            Some(&token),
        )
        .await;
    assert_eq!(restore.status, StatusCode::OK, "{:?}", restore.body);
    assert_eq!(restore.data()["folders"], 2);

    let back = app
        .request(
            "GET",
            &format!("/api/folders/{}", b["id"].as_str().unwrap()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(back.status, StatusCode::OK);
}
