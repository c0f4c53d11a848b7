/// Authorization helpers for yatube-service
///
/// Denials never produce an error page. Anonymous callers are sent to the
/// login entry point with a `next` parameter; a signed-in caller who may not
/// edit a post is sent back to the post itself.
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};

use super::Caller;
use crate::models::PostEntry;

/// Outcome of the author-only edit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPermission {
    Allowed,
    RedirectToLogin,
    RedirectToPost,
}

/// Only the post's author may edit it
pub fn check_post_edit(caller: &Caller, post: &PostEntry) -> EditPermission {
    if !caller.is_authenticated() {
        EditPermission::RedirectToLogin
    } else if caller.is(&post.author) {
        EditPermission::Allowed
    } else {
        EditPermission::RedirectToPost
    }
}

/// `302 Found` to `location`
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

/// Percent-encode a `next` value, keeping path separators readable.
pub fn encode_next(path: &str) -> String {
    urlencoding::encode(path).replace("%2F", "/")
}

/// Login entry point carrying `next` back to `path`
pub fn login_location(login_url: &str, path: &str) -> String {
    let separator = if login_url.contains('?') { '&' } else { '?' };
    format!("{}{}next={}", login_url, separator, encode_next(path))
}

/// Redirect the request's full path through the login entry point
pub fn login_redirect(req: &HttpRequest, login_url: &str) -> HttpResponse {
    let path = match req.query_string() {
        "" => req.path().to_string(),
        query => format!("{}?{}", req.path(), query),
    };
    redirect(&login_location(login_url, &path))
}
