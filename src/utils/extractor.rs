//! 路径参数安全提取器
//!
//! 非法或非正数的 ID 直接返回 400 JSON 响应，不进入处理函数。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError, http::StatusCode,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(name: &str) -> actix_web::Error {
    let response = HttpResponse::build(StatusCode::BAD_REQUEST).json(
        ApiResponse::<()>::error_empty(ErrorCode::BadRequest, format!("Invalid path parameter: {name}")),
    );
    InternalError::from_response(format!("invalid path parameter {name}"), response).into()
}

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    req.match_info()
        .get(name)
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| bad_path_param(name))
}

macro_rules! define_safe_id_extractor {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_id(req, $param).map($name))
            }
        }
    };
}

define_safe_id_extractor!(
    /// 路径中的 `{id}`
    SafeIDI64,
    "id"
);
define_safe_id_extractor!(
    /// 路径中的 `{course_id}`
    SafeCourseIdI64,
    "course_id"
);
define_safe_id_extractor!(
    /// 路径中的 `{user_id}`
    SafeUserIdI64,
    "user_id"
);
