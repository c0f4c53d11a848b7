//! Page contexts.
//!
//! HTML is produced elsewhere; a page response is the JSON context plus the
//! name of the template that renders it.

use actix_web::HttpResponse;
use serde::Serialize;

use crate::forms::FormView;
use crate::models::{Author, CommentEntry, Group, PostEntry};
use crate::pagination::Page;

pub const INDEX_TEMPLATE: &str = "posts/index.html";
pub const GROUP_TEMPLATE: &str = "posts/group_list.html";
pub const PROFILE_TEMPLATE: &str = "posts/profile.html";
pub const POST_DETAIL_TEMPLATE: &str = "posts/post_detail.html";
pub const POST_FORM_TEMPLATE: &str = "posts/create_post.html";
pub const FOLLOW_TEMPLATE: &str = "posts/follow.html";

#[derive(Debug, Serialize)]
struct Rendered<C> {
    template: &'static str,
    #[serde(flatten)]
    context: C,
}

/// `200 OK` with `context` tagged by `template`.
pub fn render<C: Serialize>(template: &'static str, context: C) -> HttpResponse {
    HttpResponse::Ok().json(Rendered { template, context })
}

#[derive(Debug, Serialize)]
pub struct FeedContext {
    pub page_obj: Page<PostEntry>,
}

#[derive(Debug, Serialize)]
pub struct GroupContext {
    pub group: Group,
    pub page_obj: Page<PostEntry>,
}

#[derive(Debug, Serialize)]
pub struct ProfileContext {
    pub author: Author,
    pub posts_count: u64,
    pub following: bool,
    pub page_obj: Page<PostEntry>,
}

#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub post: PostEntry,
    pub author_posts_count: u64,
    pub comments: Vec<CommentEntry>,
    pub form: FormView,
}

#[derive(Debug, Serialize)]
pub struct PostFormContext {
    pub form: FormView,
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
}
