/// Comment handlers
use actix_web::{web, HttpRequest, HttpResponse};

use super::{post_url, submitted, AppState};
use crate::error::Result;
use crate::forms::{comment_form, CommentFormData};
use crate::metrics::content::FORM_REJECTIONS_TOTAL;
use crate::middleware::{login_redirect, redirect, Caller};
use crate::views::{render, PostDetailContext, POST_DETAIL_TEMPLATE};

/// POST /posts/{post_id}/comment/
///
/// A blank comment re-renders the post detail with the form errors.
pub async fn add_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    caller: Caller,
    form: actix_web::Result<web::Form<CommentFormData>>,
) -> Result<HttpResponse> {
    let caller = state.resolve_caller(caller).await?;
    let Some(me) = caller.author() else {
        return Ok(login_redirect(&req, &state.login_url));
    };
    let post_id = post_id.into_inner();
    let form: CommentFormData = submitted(form, "comment");

    match form.clean() {
        Ok(text) => {
            state.comments().add_comment(post_id, me, text).await?;
            Ok(redirect(&post_url(post_id)))
        }
        Err(errors) => {
            let detail = state.posts().detail(post_id).await?;
            FORM_REJECTIONS_TOTAL.with_label_values(&["comment"]).inc();

            Ok(render(
                POST_DETAIL_TEMPLATE,
                PostDetailContext {
                    post: detail.post,
                    author_posts_count: detail.author_posts_count,
                    comments: detail.comments,
                    form: comment_form(&form, Some(&errors)),
                },
            ))
        }
    }
}
