mod common;

use axum::http::StatusCode;
use clubhouse_types::models::MemberFields;
use serde_json::json;

use common::{FakeAllowList, FakeStore, Part, TestApp};

const ALICE: &str = "alice@club.org";

fn provisioned() -> FakeAllowList {
    FakeAllowList::default().with(ALICE, 41, false)
}

#[tokio::test]
async fn first_update_creates_one_member() {
    let app = TestApp::with_allow_list(provisioned());
    let (status, body) = app
        .post_json("/profile-update/", json!({"email": ALICE, "name": "Alice"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let member = &body["member"];
    assert_eq!(member["email"], ALICE);
    assert_eq!(member["name"], "Alice");
    assert_eq!(member["board"], false);
    assert_eq!(member["image"], "");
    assert_eq!(member["linkedIn"], "");

    let members = app.db().list_members().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, member["id"].as_i64().unwrap());
}

#[tokio::test]
async fn later_updates_reuse_the_row() {
    let app = TestApp::with_allow_list(provisioned());
    app.post_json("/profile-update/", json!({"email": ALICE, "name": "Alice"}))
        .await;
    let (status, body) = app
        .post_json(
            "/profile-update/",
            json!({"email": ALICE, "title": "Treasurer", "linkedIn": "https://linkedin.com/in/alice"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["name"], "Alice");
    assert_eq!(body["member"]["title"], "Treasurer");
    assert_eq!(body["member"]["linkedIn"], "https://linkedin.com/in/alice");
    assert_eq!(app.db().list_members().unwrap().len(), 1);
}

#[tokio::test]
async fn board_flag_survives_profile_updates() {
    let app = TestApp::with_allow_list(provisioned());
    app.db()
        .create_member(&MemberFields {
            email: Some(ALICE.into()),
            name: "Alice".into(),
            board: true,
            ..MemberFields::default()
        })
        .unwrap();

    let (_, body) = app
        .post_json("/profile-update/", json!({"email": ALICE, "name": "Alice B."}))
        .await;
    assert_eq!(body["member"]["board"], true);
    assert_eq!(body["member"]["name"], "Alice B.");
}

#[tokio::test]
async fn unprovisioned_email_writes_nothing() {
    let app = TestApp::new();

    for path in ["/profile-update/", "/get-member-by-email/"] {
        let (status, body) = app
            .post_json(path, json!({"email": "ghost@club.org", "name": "Ghost"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "User email not found in allowed emails. Something went wrong."})
        );
    }
    assert!(app.db().list_members().unwrap().is_empty());
}

#[tokio::test]
async fn missing_email_is_rejected() {
    let app = TestApp::with_allow_list(provisioned());
    let (status, body) = app.post_json("/profile-update/", json!({"name": "Alice"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Email is required"}));
}

#[tokio::test]
async fn invalid_fields_are_rejected_before_writing() {
    let app = TestApp::with_allow_list(provisioned());
    let (status, body) = app
        .post_json(
            "/profile-update/",
            json!({"email": ALICE, "name": " A ", "linkedIn": "linkedin.com/in/alice"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["name"], json!(["Name must be at least 2 characters long"]));
    assert_eq!(body["linkedIn"], json!(["LinkedIn must be a valid URL"]));
    assert!(app.db().list_members().unwrap().is_empty());
}

#[tokio::test]
async fn image_is_stored_under_the_allow_list_id() {
    let app = TestApp::with_allow_list(provisioned());
    let (status, body) = app
        .post_multipart(
            "/profile-update/",
            &[
                Part::Text("email", ALICE),
                Part::Text("name", "Alice"),
                Part::File {
                    name: "image",
                    file_name: "headshot.JPG",
                    content_type: "image/jpeg",
                    data: b"jpeg",
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["image"], "profile/41.JPG");

    // A second upload overwrites the same key.
    app.post_multipart(
        "/profile-update/",
        &[
            Part::Text("email", ALICE),
            Part::File {
                name: "image",
                file_name: "new.JPG",
                content_type: "image/jpeg",
                data: b"jpeg2",
            },
        ],
    )
    .await;
    let keys: Vec<String> = app.store.uploads().into_iter().map(|u| u.key).collect();
    assert_eq!(keys, ["profile/41.JPG", "profile/41.JPG"]);
}

#[tokio::test]
async fn non_image_profile_upload_is_rejected() {
    let app = TestApp::with_allow_list(provisioned());
    let (status, body) = app
        .post_multipart(
            "/profile-update/",
            &[
                Part::Text("email", ALICE),
                Part::File {
                    name: "image",
                    file_name: "cv.pdf",
                    content_type: "application/pdf",
                    data: b"%PDF",
                },
            ],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "File must be an image"}));
    assert!(app.db().list_members().unwrap().is_empty());
}

#[tokio::test]
async fn failed_image_upload_keeps_the_created_row_only() {
    let app = TestApp::build(provisioned(), FakeStore::rejecting(500, "boom"), 1024);
    let (status, body) = app
        .post_multipart(
            "/profile-update/",
            &[
                Part::Text("email", ALICE),
                Part::Text("title", "Secretary"),
                Part::File {
                    name: "image",
                    file_name: "me.png",
                    content_type: "image/png",
                    data: b"png",
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Image upload failed: 500 - boom"}));

    let members = app.db().list_members().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].image.as_deref(), Some(""));
}

#[tokio::test]
async fn urlencoded_bodies_are_accepted() {
    let app = TestApp::with_allow_list(provisioned());
    let request = axum::http::Request::post("/profile-update/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(axum::body::Body::from("email=alice%40club.org&name=Alice"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["name"], "Alice");
}

#[tokio::test]
async fn member_lookup_returns_blank_member_before_first_update() {
    let app = TestApp::with_allow_list(provisioned());
    let (status, body) = app.post_json("/get-member-by-email/", json!({"email": ALICE})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "member": {
                "id": null,
                "email": ALICE,
                "name": "",
                "linkedIn": "",
                "title": "",
                "board": false,
                "image": ""
            }
        })
    );
    assert!(app.db().list_members().unwrap().is_empty());
}

#[tokio::test]
async fn member_lookup_returns_stored_member() {
    let app = TestApp::with_allow_list(provisioned());
    app.post_json("/profile-update/", json!({"email": ALICE, "name": "Alice"}))
        .await;

    let (status, body) = app.post_json("/get-member-by-email/", json!({"email": ALICE})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["name"], "Alice");
    assert!(body["member"]["id"].is_i64());
}

#[tokio::test]
async fn directories_in_image_file_name_are_ignored() {
    let app = TestApp::with_allow_list(provisioned());
    let (status, body) = app
        .post_multipart(
            "/profile-update/",
            &[
                Part::Text("email", ALICE),
                Part::File {
                    name: "image",
                    file_name: "me./evil/one",
                    content_type: "image/png",
                    data: b"png",
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["image"], "profile/41.png");
    let keys: Vec<String> = app.store.uploads().into_iter().map(|u| u.key).collect();
    assert_eq!(keys, ["profile/41.png"]);
}
