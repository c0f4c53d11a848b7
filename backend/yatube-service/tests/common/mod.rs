#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{test, web, App};
use std::sync::Arc;

use yatube_service::db::{ContentStore, MemoryContentStore};
use yatube_service::middleware::SessionMiddleware;
use yatube_service::models::{Author, Group, NewGroup, NewPost, PostEntry};
use yatube_service::pagination::Paginator;
use yatube_service::session::SessionKeys;
use yatube_service::{routes, AppState};

pub const SECRET: &str = "test-secret";
pub const COOKIE: &str = "sessionid";
pub const LOGIN_URL: &str = "/auth/login/";

/// Authors and groups most tests start from.
pub struct Fixture {
    pub store: Arc<dyn ContentStore>,
    pub leo: Author,
    pub mia: Author,
    pub cats: Group,
    pub dogs: Group,
}

impl Fixture {
    pub async fn new() -> Self {
        let store: Arc<dyn ContentStore> = Arc::new(MemoryContentStore::new());
        let leo = store.create_author("leo").await.expect("create leo");
        let mia = store.create_author("mia").await.expect("create mia");
        let cats = store
            .create_group(NewGroup {
                title: "Cats".into(),
                slug: "cats".into(),
                description: "All about cats".into(),
            })
            .await
            .expect("create cats");
        let dogs = store
            .create_group(NewGroup {
                title: "Dogs".into(),
                slug: "dogs".into(),
                description: "All about dogs".into(),
            })
            .await
            .expect("create dogs");

        Self {
            store,
            leo,
            mia,
            cats,
            dogs,
        }
    }

    pub async fn post(&self, author: &Author, text: &str, group: Option<&Group>) -> PostEntry {
        self.store
            .insert_post(NewPost {
                author_id: author.id,
                text: text.into(),
                group_id: group.map(|g| g.id),
                image: None,
            })
            .await
            .expect("insert post")
    }

    pub async fn posts(&self, author: &Author, count: usize, group: Option<&Group>) {
        for i in 0..count {
            self.post(author, &format!("post {}", i), group).await;
        }
    }
}

pub async fn init_app(
    store: Arc<dyn ContentStore>,
    page_size: usize,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    let state = AppState::new(store, Paginator::new(page_size), LOGIN_URL);
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(SessionMiddleware::new(SessionKeys::new(SECRET), COOKIE))
            .configure(routes::configure),
    )
    .await
}

pub fn token(author: &Author) -> String {
    SessionKeys::new(SECRET)
        .issue(&author.to_ref(), 3600)
        .expect("issue token")
}

pub fn bearer(author: &Author) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token(author)))
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
