/// Follow handlers
use actix_web::{web, HttpRequest, HttpResponse};

use super::{profile_url, AppState};
use crate::error::Result;
use crate::middleware::{login_redirect, redirect, Caller};

/// GET|POST /profile/{username}/follow/
pub async fn profile_follow(
    req: HttpRequest,
    state: web::Data<AppState>,
    username: web::Path<String>,
    caller: Caller,
) -> Result<HttpResponse> {
    let caller = state.resolve_caller(caller).await?;
    let Some(me) = caller.author() else {
        return Ok(login_redirect(&req, &state.login_url));
    };

    let author = state.follows().follow(me, &username).await?;
    Ok(redirect(&profile_url(&author.username)))
}

/// GET|POST /profile/{username}/unfollow/
pub async fn profile_unfollow(
    req: HttpRequest,
    state: web::Data<AppState>,
    username: web::Path<String>,
    caller: Caller,
) -> Result<HttpResponse> {
    let caller = state.resolve_caller(caller).await?;
    let Some(me) = caller.author() else {
        return Ok(login_redirect(&req, &state.login_url));
    };

    let author = state.follows().unfollow(me, &username).await?;
    Ok(redirect(&profile_url(&author.username)))
}
