use actix_web::{web, HttpRequest, HttpResponse};

use super::AppState;
use crate::error::Result;
use crate::middleware::{login_redirect, Caller};
use crate::pagination::PageQuery;
use crate::views::{
    render, FeedContext, GroupContext, ProfileContext, FOLLOW_TEMPLATE, GROUP_TEMPLATE,
    INDEX_TEMPLATE, PROFILE_TEMPLATE,
};

/// GET / - every post, newest first
pub async fn index(
    state: web::Data<AppState>,
    query: PageQuery,
) -> Result<HttpResponse> {
    let page_obj = state.feeds().index(query.number()).await?;
    Ok(render(INDEX_TEMPLATE, FeedContext { page_obj }))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: PageQuery,
) -> Result<HttpResponse> {
    let (group, page_obj) = state.feeds().group(&slug, query.number()).await?;
    Ok(render(GROUP_TEMPLATE, GroupContext { group, page_obj }))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    query: PageQuery,
    caller: Caller,
) -> Result<HttpResponse> {
    let (author, page_obj) = state.feeds().profile(&username, query.number()).await?;
    let following = state
        .follows()
        .is_following(caller.author(), &author)
        .await?;

    Ok(render(
        PROFILE_TEMPLATE,
        ProfileContext {
            author,
            posts_count: page_obj.count,
            following,
            page_obj,
        },
    ))
}

/// GET /follow/ - posts by the authors the caller follows
pub async fn follow_index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: PageQuery,
    caller: Caller,
) -> Result<HttpResponse> {
    let caller = state.resolve_caller(caller).await?;
    let Some(me) = caller.author() else {
        return Ok(login_redirect(&req, &state.login_url));
    };

    let page_obj = state.feeds().followed(me.id, query.number()).await?;
    Ok(render(FOLLOW_TEMPLATE, FeedContext { page_obj }))
}
