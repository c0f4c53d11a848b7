mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use common::{bearer, init_app, location, Fixture};

#[actix_web::test]
async fn follow_and_unfollow_toggle_profile_flag() {
    let fx = Fixture::new().await;
    let app = init_app(fx.store.clone(), 10).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/mia/follow/")
            .insert_header(bearer(&fx.leo))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/mia/");
    assert!(fx.store.is_following(fx.leo.id, fx.mia.id).await.unwrap());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/mia/")
            .insert_header(bearer(&fx.leo))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["following"], true);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/mia/unfollow/")
            .insert_header(bearer(&fx.leo))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(!fx.store.is_following(fx.leo.id, fx.mia.id).await.unwrap());
}

#[actix_web::test]
async fn following_twice_keeps_one_edge() {
    let fx = Fixture::new().await;
    fx.post(&fx.mia, "by mia", None).await;
    let app = init_app(fx.store.clone(), 10).await;

    for _ in 0..2 {
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/profile/mia/follow/")
                .insert_header(bearer(&fx.leo))
                .to_request(),
        )
        .await;
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/follow/")
            .insert_header(bearer(&fx.leo))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["page_obj"]["count"], 1);
}

#[actix_web::test]
async fn self_follow_is_ignored() {
    let fx = Fixture::new().await;
    let app = init_app(fx.store.clone(), 10).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/leo/follow/")
            .insert_header(bearer(&fx.leo))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo/");
    assert!(!fx.store.is_following(fx.leo.id, fx.leo.id).await.unwrap());
}

#[actix_web::test]
async fn follow_feed_shows_only_followed_authors() {
    let fx = Fixture::new().await;
    let max = fx.store.create_author("max").await.unwrap();
    fx.post(&fx.mia, "by mia", None).await;
    fx.post(&max, "by max", None).await;
    fx.post(&fx.leo, "by leo", None).await;
    fx.store.insert_follow(fx.leo.id, fx.mia.id).await.unwrap();
    let app = init_app(fx.store.clone(), 10).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/follow/")
            .insert_header(bearer(&fx.leo))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let list = body["page_obj"]["object_list"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["text"], "by mia");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/follow/")
            .insert_header(bearer(&max))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["page_obj"]["count"], 0);
}

#[actix_web::test]
async fn follow_unknown_author_is_not_found() {
    let fx = Fixture::new().await;
    let app = init_app(fx.store.clone(), 10).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/ghost/follow/")
            .insert_header(bearer(&fx.leo))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
