use ::common::ObjectKey;
use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

mod upload {
    use super::*;

    #[tokio::test]
    async fn issues_presigned_url_and_creates_record() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::UPLOAD,
                &json!({
                    "filename": "harbour.webp",
                    "contentType": "image/webp",
                    "size": 2048,
                }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let key = res.body["key"].as_str().unwrap();
        assert!(key.ends_with("-harbour.webp"));
        assert!(res.body["presignedUrl"].as_str().unwrap().contains(key));
        assert_eq!(
            res.body["imageUrl"].as_str().unwrap(),
            format!("memory://media-test/{key}")
        );

        let list = app.get(routes::IMAGES).await;
        let image = &list.body[0];
        assert_eq!(image["storageKey"], key);
        assert_eq!(image["title"], "harbour.webp");
        assert_eq!(image["url"], res.body["imageUrl"]);
        assert_eq!(TestResponse::category_names(image), ["Uncategorized"]);
    }

    #[tokio::test]
    async fn same_filename_gets_distinct_keys() {
        let app = TestApp::spawn().await;

        let first = app.upload_image("dup.webp", &[]).await;
        let second = app.upload_image("dup.webp", &[]).await;

        assert_ne!(first["key"], second["key"]);
        assert_eq!(app.store.len().await, 2);
    }

    #[tokio::test]
    async fn explicit_title_and_categories() {
        let app = TestApp::spawn().await;
        let travel = app.create_category("Travel").await;

        let res = app
            .post(
                routes::UPLOAD,
                &json!({
                    "filename": "beach.webp",
                    "contentType": "image/webp",
                    "size": 10,
                    "title": "Beach day",
                    "categoryIds": [travel],
                }),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let list = app.get(routes::IMAGES).await;
        assert_eq!(list.body[0]["title"], "Beach day");
        assert_eq!(TestResponse::category_names(&list.body[0]), ["Travel"]);
    }

    #[tokio::test]
    async fn unknown_category_creates_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::UPLOAD,
                &json!({
                    "filename": "beach.webp",
                    "contentType": "image/webp",
                    "size": 10,
                    "categoryIds": [31337],
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["details"][0]["path"], "categoryIds.0");
        assert_eq!(app.get(routes::IMAGES).await.body, json!([]));
    }

    #[tokio::test]
    async fn rejects_non_image_content() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::UPLOAD,
                &json!({
                    "filename": "notes.pdf",
                    "contentType": "application/pdf",
                    "size": 10,
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["details"][0]["path"], "contentType");
    }

    #[tokio::test]
    async fn rejects_oversized_file() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::UPLOAD,
                &json!({
                    "filename": "huge.png",
                    "contentType": "image/png",
                    "size": 10 * 1024 * 1024 + 1,
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["details"][0]["path"], "size");
    }

    #[tokio::test]
    async fn rejects_path_in_filename() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::UPLOAD,
                &json!({
                    "filename": "../../etc/passwd.png",
                    "contentType": "image/png",
                    "size": 10,
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["details"][0]["path"], "filename");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::UPLOAD, &json!({ "filename": "a.png" }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn removes_record_and_object() {
        let app = TestApp::spawn().await;
        let upload = app.upload_image("gone.webp", &[]).await;
        let key = upload["key"].as_str().unwrap();

        let res = app
            .delete_with_body(routes::DELETE, &json!({ "key": key }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["message"].as_str().is_some());
        assert_eq!(app.get(routes::IMAGES).await.body, json!([]));
        assert!(app.store.is_empty().await);
    }

    #[tokio::test]
    async fn removes_record_when_object_never_uploaded() {
        let app = TestApp::spawn().await;
        let res = app
            .post(
                routes::UPLOAD,
                &json!({ "filename": "abandoned.png", "contentType": "image/png", "size": 5 }),
            )
            .await;
        let key = res.body["key"].as_str().unwrap().to_string();

        let res = app
            .delete_with_body(routes::DELETE, &json!({ "key": key }))
            .await;

        assert_eq!(res.status, 200);
        let key = ObjectKey::parse(&key).unwrap();
        assert!(app.store.get(&key).await.is_err());
    }

    #[tokio::test]
    async fn storage_failure_after_row_removal_is_internal_error() {
        let app = TestApp::spawn().await;
        let upload = app.upload_image("stuck.webp", &[]).await;
        let key = ObjectKey::parse(upload["key"].as_str().unwrap()).unwrap();
        app.fail_object_deletes();

        let res = app
            .delete_with_body(routes::DELETE, &json!({ "key": key.as_str() }))
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "INTERNAL_ERROR");
        assert_eq!(res.body["message"], "An unexpected error occurred");
        // The row is gone but the object is left behind.
        assert_eq!(app.get(routes::IMAGES).await.body, json!([]));
        assert!(app.store.get(&key).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_key_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .delete_with_body(routes::DELETE, &json!({ "key": "no-such-key.png" }))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let app = TestApp::spawn().await;
        let upload = app.upload_image("twice.webp", &[]).await;
        let body = json!({ "key": upload["key"] });

        assert_eq!(app.delete_with_body(routes::DELETE, &body).await.status, 200);
        assert_eq!(app.delete_with_body(routes::DELETE, &body).await.status, 404);
    }

    #[tokio::test]
    async fn empty_key_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .delete_with_body(routes::DELETE, &json!({ "key": "" }))
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn deletion_keeps_categories() {
        let app = TestApp::spawn().await;
        let travel = app.create_category("Travel").await;
        let upload = app.upload_image("beach.webp", &[travel]).await;

        app.delete_with_body(routes::DELETE, &json!({ "key": upload["key"] }))
            .await;

        let names: Vec<_> = app
            .get(routes::CATEGORIES)
            .await
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Travel", "Uncategorized"]);
    }
}
