//! Move cascade tests: subtree relocation, self/descendant rejection,
//! and the maintenance passes over denormalized state.

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
async fn moving_a_folder_to_root_rewrites_path_and_id_path() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    // /A (f1) -> /A/B (f2) with asset x.png in f2.
    let f1 = create_folder(&app, &token, "A", None).await;
    let f2 = create_folder(&app, &token, "B", f1["id"].as_str()).await;

    let asset = app
        .request(
            "POST",
            "/api/assets",
            Some(json!({
                "folderId": f2["id"],
                "name": "x.png",
                "originalName": "x.png",
                "mimeType": "image/png",
                "sizeBytes": 7,
                "url": "https://cdn.example/x.png"
            })),
            Some(&token),
        )
        .await;
    let asset_id = asset.data()["id"].as_str().unwrap().to_string();

    let moved = app
        .request(
            "POST",
            "/api/library/move",
            Some(json!({ "itemIds": [f2["id"]], "targetFolderId": null })),
            Some(&token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);
    assert_eq!(moved.data()["movedFolders"], 1);
    assert_eq!(moved.data()["movedAssets"], 0);
    assert_eq!(moved.data()["totalItems"], 1);

    let f2_after = app
        .request(
            "GET",
            &format!("/api/folders/{}", f2["id"].as_str().unwrap()),
            None,
            Some(&token),
        )
        .await;
    assert!(f2_after.data()["parentId"].is_null());
    assert_eq!(f2_after.data()["path"], "/B");
    assert_eq!(
        f2_after.data()["idPath"],
        format!("/{}", f2["id"].as_str().unwrap())
    );

    // The asset rode along: still in f2, now reachable under the root tree.
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
    assert_eq!(assets[0]["id"], asset_id.as_str());
}

#[tokio::test]
async fn moving_a_subtree_rewrites_descendants_under_the_new_parent() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let a = create_folder(&app, &token, "A", None).await;
    let b = create_folder(&app, &token, "B", a["id"].as_str()).await;
    let c = create_folder(&app, &token, "C", b["id"].as_str()).await;
    let dest = create_folder(&app, &token, "Dest", None).await;

    let moved = app
        .request(
            "POST",
            "/api/library/move",
            Some(json!({ "itemIds": [b["id"]], "targetFolderId": dest["id"] })),
            Some(&token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);

    let c_after = app
        .request(
            "GET",
            &format!("/api/folders/{}", c["id"].as_str().unwrap()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(c_after.data()["path"], "/Dest/B/C");
    assert_eq!(
        c_after.data()["idPath"],
        format!(
            "/{}/{}/{}",
            dest["id"].as_str().unwrap(),
            b["id"].as_str().unwrap(),
            c["id"].as_str().unwrap()
        )
    );
}

#[tokio::test]
async fn moving_a_folder_into_itself_or_a_descendant_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let a = create_folder(&app, &token, "A", None).await;
    let b = create_folder(&app, &token, "B", a["id"].as_str()).await;

    let into_self = app
        .request(
            "POST",
            "/api/library/move",
            Some(json!({ "itemIds": [a["id"]], "targetFolderId": a["id"] })),
            Some(&token),
        )
        .await;
    assert_eq!(into_self.status, StatusCode::BAD_REQUEST);
    assert_eq!(into_self.body["error"], "VALIDATION_ERROR");

    let into_descendant = app
        .request(
            "POST",
            "/api/library/move",
            Some(json!({ "itemIds": [a["id"]], "targetFolderId": b["id"] })),
            Some(&token),
        )
        .await;
    assert_eq!(into_descendant.status, StatusCode::BAD_REQUEST);

    // Nothing mutated.
    let a_after = app
        .request(
            "GET",
            &format!("/api/folders/{}", a["id"].as_str().unwrap()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(a_after.data()["path"], "/A");
    assert!(a_after.data()["parentId"].is_null());
}

#[tokio::test]
async fn moving_unknown_items_is_rejected_before_mutation() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/api/library/move",
            Some(json!({
                "itemIds": [uuid::Uuid::new_v4()],
                "targetFolderId": null
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn counter_reconciliation_restores_exact_counts() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let a = create_folder(&app, &token, "A", None).await;
    create_folder(&app, &token, "B", a["id"].as_str()).await;

    // Drift the counters behind the library's back.
    sqlx::query("UPDATE folders SET child_count = 99, asset_count = 99")
        .execute(&app.db_pool)
        .await
        .unwrap();

    let response = app
        .request(
            "POST",
            "/api/admin/maintenance/counters",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let a_after = app
        .request(
            "GET",
            &format!("/api/folders/{}", a["id"].as_str().unwrap()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(a_after.data()["childCount"], 1);
    assert_eq!(a_after.data()["assetCount"], 0);
}

#[tokio::test]
async fn path_repair_fixes_a_manually_drifted_subtree() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let a = create_folder(&app, &token, "A", None).await;
    let b = create_folder(&app, &token, "B", a["id"].as_str()).await;

    // Simulate an interrupted cascade: the child keeps a stale prefix.
    sqlx::query("UPDATE folders SET path = '/stale/B' WHERE id = $1::uuid")
        .bind(b["id"].as_str().unwrap())
        .execute(&app.db_pool)
        .await
        .unwrap();

    let check = app
        .request(
            "GET",
            "/api/admin/maintenance/consistency",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(
        check.data()["pathInconsistencies"].as_array().unwrap().len(),
        1
    );

    let repair = app
        .request("POST", "/api/admin/maintenance/repair", None, Some(&token))
        .await;
    assert_eq!(repair.status, StatusCode::OK);
    assert_eq!(repair.data()["planned"], 1);

    let b_after = app
        .request(
            "GET",
            &format!("/api/folders/{}", b["id"].as_str().unwrap()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(b_after.data()["path"], "/A/B");
}
