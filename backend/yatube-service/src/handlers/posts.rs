/// Post handlers - detail, create and author-only edit
use actix_web::{web, HttpRequest, HttpResponse};

use super::{post_url, profile_url, submitted, AppState};
use crate::error::Result;
use crate::forms::{comment_form, post_form, CommentFormData, FieldErrors, PostFormData};
use crate::metrics::content::FORM_REJECTIONS_TOTAL;
use crate::middleware::{check_post_edit, login_redirect, redirect, Caller, EditPermission};
use crate::models::Group;
use crate::views::{
    render, PostDetailContext, PostFormContext, POST_DETAIL_TEMPLATE, POST_FORM_TEMPLATE,
};

fn form_page(
    groups: &[Group],
    data: &PostFormData,
    current_image: Option<&str>,
    errors: Option<&FieldErrors>,
    post_id: Option<i64>,
) -> HttpResponse {
    render(
        POST_FORM_TEMPLATE,
        PostFormContext {
            form: post_form(groups, data, current_image, errors),
            is_edit: post_id.is_some(),
            post_id,
        },
    )
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let detail = state.posts().detail(*post_id).await?;

    Ok(render(
        POST_DETAIL_TEMPLATE,
        PostDetailContext {
            post: detail.post,
            author_posts_count: detail.author_posts_count,
            comments: detail.comments,
            form: comment_form(&CommentFormData::default(), None),
        },
    ))
}

/// GET /create/ - empty post form
pub async fn post_create_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse> {
    if !state.resolve_caller(caller).await?.is_authenticated() {
        return Ok(login_redirect(&req, &state.login_url));
    }

    let groups = state.posts().group_choices().await?;
    Ok(form_page(&groups, &PostFormData::default(), None, None, None))
}

/// POST /create/
pub async fn post_create(
    req: HttpRequest,
    state: web::Data<AppState>,
    caller: Caller,
    form: actix_web::Result<web::Form<PostFormData>>,
) -> Result<HttpResponse> {
    let caller = state.resolve_caller(caller).await?;
    let Some(me) = caller.author() else {
        return Ok(login_redirect(&req, &state.login_url));
    };
    let form = submitted(form, "post");

    let posts = state.posts();
    let groups = posts.group_choices().await?;
    let cleaned = match form.clean(&groups) {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            FORM_REJECTIONS_TOTAL.with_label_values(&["post"]).inc();
            return Ok(form_page(&groups, &form, None, Some(&errors), None));
        }
    };

    posts.create_post(me, cleaned).await?;
    Ok(redirect(&profile_url(&me.username)))
}

/// GET /posts/{post_id}/edit/ - form pre-filled with the post
pub async fn post_edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    caller: Caller,
) -> Result<HttpResponse> {
    let caller = state.resolve_caller(caller).await?;
    if !caller.is_authenticated() {
        return Ok(login_redirect(&req, &state.login_url));
    }

    let posts = state.posts();
    let post = posts.get_post(*post_id).await?;
    match check_post_edit(&caller, &post) {
        EditPermission::Allowed => {}
        EditPermission::RedirectToLogin => return Ok(login_redirect(&req, &state.login_url)),
        EditPermission::RedirectToPost => return Ok(redirect(&post_url(post.id))),
    }

    let groups = posts.group_choices().await?;
    Ok(form_page(
        &groups,
        &PostFormData::from_post(&post),
        post.image.as_deref(),
        None,
        Some(post.id),
    ))
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    caller: Caller,
    form: actix_web::Result<web::Form<PostFormData>>,
) -> Result<HttpResponse> {
    let caller = state.resolve_caller(caller).await?;
    if !caller.is_authenticated() {
        return Ok(login_redirect(&req, &state.login_url));
    }

    let posts = state.posts();
    let post = posts.get_post(*post_id).await?;
    match check_post_edit(&caller, &post) {
        EditPermission::Allowed => {}
        EditPermission::RedirectToLogin => return Ok(login_redirect(&req, &state.login_url)),
        EditPermission::RedirectToPost => {
            tracing::warn!(post_id = post.id, caller = ?caller.author().map(|a| &a.username), "edit by non-author refused");
            return Ok(redirect(&post_url(post.id)));
        }
    }

    let form = submitted(form, "post");
    let groups = posts.group_choices().await?;
    let cleaned = match form.clean(&groups) {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            FORM_REJECTIONS_TOTAL.with_label_values(&["post"]).inc();
            return Ok(form_page(
                &groups,
                &form,
                post.image.as_deref(),
                Some(&errors),
                Some(post.id),
            ));
        }
    };

    let updated = posts.update_post(post.id, cleaned).await?;
    Ok(redirect(&post_url(updated.id)))
}
