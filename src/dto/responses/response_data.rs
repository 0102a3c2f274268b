use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use serde_derive::Serialize;

use super::response_meta::ResponseMeta;

#[derive(Serialize)]
pub struct Response<D: serde::Serialize, M: serde::Serialize> {
    success: bool,
    data: D,
    meta: ResponseMeta<M>,
}

impl<D: serde::Serialize, M: serde::Serialize> IntoResponse for Response<D, M> {
    fn into_response(self) -> axum::response::Response {
        axum::response::Json(self).into_response()
    }
}

pub fn http_resp<D: serde::Serialize, M: serde::Serialize>(
    data: D,
    meta: M,
    start: tokio::time::Instant,
) -> Response<D, M> {
    Response {
        success: true,
        data,
        meta: ResponseMeta::from(start, meta),
    }
}

pub fn http_resp_with_cookies<D: serde::Serialize, M: serde::Serialize>(
    data: D,
    meta: M,
    start: tokio::time::Instant,
    add_cookies: Option<Vec<Cookie<'static>>>,
    remove_cookies: Option<Vec<Cookie<'static>>>,
) -> impl IntoResponse {
    let mut jar = CookieJar::new();

    if let Some(cookies) = add_cookies {
        for cookie in cookies {
            jar = jar.add(cookie);
        }
    }

    if let Some(cookies) = remove_cookies {
        for cookie in cookies {
            jar = jar.remove(cookie);
        }
    }

    (jar, http_resp(data, meta, start))
}
