use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

mod list_images {
    use super::*;

    #[tokio::test]
    async fn empty_library() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::IMAGES).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn newest_first() {
        let app = TestApp::spawn().await;
        app.upload_image("first.webp", &[]).await;
        app.upload_image("second.webp", &[]).await;
        app.upload_image("third.webp", &[]).await;

        let res = app.get(routes::IMAGES).await;

        let titles: Vec<_> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["third.webp", "second.webp", "first.webp"]);
    }

    #[tokio::test]
    async fn limit_and_offset_page_through_results() {
        let app = TestApp::spawn().await;
        for i in 0..5 {
            app.upload_image(&format!("img{i}.webp"), &[]).await;
        }

        let first = app.get(&format!("{}?limit=2&offset=0", routes::IMAGES)).await;
        let second = app.get(&format!("{}?limit=2&offset=2", routes::IMAGES)).await;
        let last = app.get(&format!("{}?limit=2&offset=4", routes::IMAGES)).await;

        assert_eq!(first.body.as_array().unwrap().len(), 2);
        assert_eq!(second.body.as_array().unwrap().len(), 2);
        assert_eq!(last.body.as_array().unwrap().len(), 1);
        assert_eq!(first.body[0]["title"], "img4.webp");
        assert_eq!(second.body[0]["title"], "img2.webp");
        assert_eq!(last.body[0]["title"], "img0.webp");
    }

    #[tokio::test]
    async fn zero_limit_returns_empty_page() {
        let app = TestApp::spawn().await;
        app.upload_image("only.webp", &[]).await;

        let res = app.get(&format!("{}?limit=0", routes::IMAGES)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn category_filter() {
        let app = TestApp::spawn().await;
        let travel = app.create_category("Travel").await;
        let food = app.create_category("Food").await;
        app.upload_image("beach.webp", &[travel]).await;
        app.upload_image("pasta.webp", &[food]).await;
        app.upload_image("market.webp", &[travel, food]).await;

        let res = app
            .get(&format!("{}?categoryId={travel}", routes::IMAGES))
            .await;

        let images = res.body.as_array().unwrap();
        let titles: Vec<_> = images.iter().map(|i| i["title"].as_str().unwrap()).collect();
        assert_eq!(titles, ["market.webp", "beach.webp"]);
        // The filter restricts images, not the categories shown for them.
        assert_eq!(
            TestResponse::category_names(&images[0]),
            ["Food", "Travel"]
        );
    }

    #[tokio::test]
    async fn non_numeric_category_filter_is_ignored() {
        let app = TestApp::spawn().await;
        app.upload_image("a.webp", &[]).await;
        app.upload_image("b.webp", &[]).await;

        let res = app.get(&format!("{}?categoryId=abc", routes::IMAGES)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn malformed_limit_is_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get(&format!("{}?limit=many", routes::IMAGES)).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod update_image {
    use super::*;

    async fn uploaded(app: &TestApp, categories: &[i32]) -> i32 {
        let body = app.upload_image("photo.webp", categories).await;
        body["imageId"].as_i64().unwrap() as i32
    }

    #[tokio::test]
    async fn updates_title() {
        let app = TestApp::spawn().await;
        let id = uploaded(&app, &[]).await;

        let res = app
            .patch(&routes::image(id), &json!({ "title": "  Harbour at dusk " }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Harbour at dusk");
        assert_eq!(
            TestResponse::category_names(&res.body),
            ["Uncategorized"]
        );
    }

    #[tokio::test]
    async fn replaces_category_set() {
        let app = TestApp::spawn().await;
        let a = app.create_category("A").await;
        let b = app.create_category("B").await;
        let c = app.create_category("C").await;
        let id = uploaded(&app, &[b, c]).await;

        let res = app
            .patch(&routes::image(id), &json!({ "categoryIds": [a, b] }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "photo.webp");
        assert_eq!(TestResponse::category_names(&res.body), ["A", "B"]);
    }

    #[tokio::test]
    async fn empty_category_list_clears_categories() {
        let app = TestApp::spawn().await;
        let id = uploaded(&app, &[]).await;

        let res = app
            .patch(&routes::image(id), &json!({ "categoryIds": [] }))
            .await;

        assert_eq!(res.status, 200);
        assert!(TestResponse::category_names(&res.body).is_empty());
    }

    #[tokio::test]
    async fn empty_body_changes_nothing() {
        let app = TestApp::spawn().await;
        let id = uploaded(&app, &[]).await;

        let res = app.patch(&routes::image(id), &json!({})).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "photo.webp");
        assert_eq!(
            TestResponse::category_names(&res.body),
            ["Uncategorized"]
        );
    }

    #[tokio::test]
    async fn unknown_category_is_rejected_without_changes() {
        let app = TestApp::spawn().await;
        let id = uploaded(&app, &[]).await;

        let res = app
            .patch(
                &routes::image(id),
                &json!({ "title": "Renamed", "categoryIds": [app.default_category_id, 424242] }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["details"][0]["path"], "categoryIds.1");

        let list = app.get(routes::IMAGES).await;
        assert_eq!(list.body[0]["title"], "photo.webp");
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let app = TestApp::spawn().await;
        let id = uploaded(&app, &[]).await;

        let res = app.patch(&routes::image(id), &json!({ "title": "  " })).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["details"][0]["path"], "title");
    }

    #[tokio::test]
    async fn unknown_image_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .patch(&routes::image(999_999), &json!({ "title": "x" }))
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn malformed_body_is_validation_error() {
        let app = TestApp::spawn().await;
        let id = uploaded(&app, &[]).await;

        let res = app
            .patch(&routes::image(id), &json!({ "categoryIds": "all" }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
