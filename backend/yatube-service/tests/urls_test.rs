mod common;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;

use common::{bearer, init_app, location, token, Fixture, COOKIE, SECRET};
use yatube_service::db::Scope;
use yatube_service::models::AuthorRef;
use yatube_service::session::SessionKeys;

#[actix_web::test]
async fn public_pages_are_open_to_anonymous() {
    let fx = Fixture::new().await;
    let post = fx.post(&fx.leo, "hello", Some(&fx.cats)).await;
    let app = init_app(fx.store.clone(), 10).await;

    let detail = format!("/posts/{}/", post.id);
    for uri in ["/", "/group/cats/", "/profile/leo/", detail.as_str()] {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {}", uri);
    }
}

#[actix_web::test]
async fn unknown_resources_answer_not_found() {
    let fx = Fixture::new().await;
    let app = init_app(fx.store.clone(), 10).await;

    for uri in [
        "/unexisting_page/",
        "/group/birds/",
        "/profile/ghost/",
        "/posts/9999/",
        "/posts/abc/",
    ] {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "GET {}", uri);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 404);
    }
}

#[actix_web::test]
async fn anonymous_is_sent_to_login_with_next() {
    let fx = Fixture::new().await;
    let post = fx.post(&fx.leo, "hello", None).await;
    let app = init_app(fx.store.clone(), 10).await;

    let edit = format!("/posts/{}/edit/", post.id);
    for uri in ["/create/", "/follow/", "/profile/leo/follow/", edit.as_str()] {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "GET {}", uri);
        assert_eq!(location(&resp), format!("/auth/login/?next={}", uri));
    }

    let comment = format!("/posts/{}/comment/", post.id);
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&comment)
            .set_form([("text", "hi")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/auth/login/?next={}", comment));
}

#[actix_web::test]
async fn author_may_open_edit_page() {
    let fx = Fixture::new().await;
    let post = fx.post(&fx.leo, "hello", None).await;
    let app = init_app(fx.store.clone(), 10).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(bearer(&fx.leo))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn non_author_edit_redirects_to_post() {
    let fx = Fixture::new().await;
    let post = fx.post(&fx.leo, "hello", None).await;
    let app = init_app(fx.store.clone(), 10).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(bearer(&fx.mia))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
}

#[actix_web::test]
async fn session_cookie_authenticates() {
    let fx = Fixture::new().await;
    let app = init_app(fx.store.clone(), 10).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/create/")
            .cookie(Cookie::new(COOKIE, token(&fx.leo)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn bad_token_is_treated_as_anonymous() {
    let fx = Fixture::new().await;
    let app = init_app(fx.store.clone(), 10).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", "Bearer garbage"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/create/")
            .insert_header(("Authorization", "Bearer garbage"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[actix_web::test]
async fn health_and_metrics_endpoints() {
    let fx = Fixture::new().await;
    let app = init_app(fx.store.clone(), 10).await;

    for uri in ["/health", "/health/ready", "/health/live", "/metrics"] {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {}", uri);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/ready").to_request(),
    )
    .await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["ready"], true);
    assert_eq!(body["checks"]["store"]["status"], "healthy");
}

#[actix_web::test]
async fn anonymous_writes_redirect_whatever_the_body() {
    let fx = Fixture::new().await;
    let post = fx.post(&fx.leo, "hello", None).await;
    let app = init_app(fx.store.clone(), 10).await;

    let edit = format!("/posts/{}/edit/", post.id);
    let comment = format!("/posts/{}/comment/", post.id);
    for uri in ["/create/", edit.as_str(), comment.as_str()] {
        let resp =
            test::call_service(&app, test::TestRequest::post().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "empty POST {}", uri);
        assert_eq!(location(&resp), format!("/auth/login/?next={}", uri));

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(uri)
                .set_json(serde_json::json!({"text": "sneaky"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND, "JSON POST {}", uri);
        assert_eq!(location(&resp), format!("/auth/login/?next={}", uri));
    }

    assert_eq!(fx.store.count_posts(Scope::All).await.unwrap(), 1);
    assert!(fx.store.list_comments(post.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn token_for_unknown_author_is_anonymous() {
    let fx = Fixture::new().await;
    let app = init_app(fx.store.clone(), 10).await;
    let ghost = SessionKeys::new(SECRET)
        .issue(
            &AuthorRef {
                id: 4242,
                username: "ghost".into(),
            },
            3600,
        )
        .unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .insert_header(("Authorization", format!("Bearer {}", ghost)))
            .set_form([("text", "from nowhere")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");
    assert_eq!(fx.store.count_posts(Scope::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn stored_username_wins_over_token_username() {
    let fx = Fixture::new().await;
    let app = init_app(fx.store.clone(), 10).await;
    let stale = SessionKeys::new(SECRET)
        .issue(
            &AuthorRef {
                id: fx.leo.id,
                username: "leo_old".into(),
            },
            3600,
        )
        .unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .insert_header(("Authorization", format!("Bearer {}", stale)))
            .set_form([("text", "still me")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo/");
}
