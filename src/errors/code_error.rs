use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde_derive::Serialize;
use std::error::Error;
use std::fmt;
use utoipa::ToSchema;

pub type HandlerResponse<T> = Result<T, CodeErrorResp>;

pub struct CodeError {
    pub success: bool,
    pub error_code: u16,
    pub http_status_code: StatusCode,
    pub message: &'static str,
}

impl CodeError {
    pub const POOL_ERROR: CodeError = CodeError {
        success: false,
        error_code: 0,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Could not get conn out of pool!",
    };
    pub const DB_QUERY_ERROR: CodeError = CodeError {
        success: false,
        error_code: 1,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Database query failed!",
    };
    pub const DB_INSERTION_ERROR: CodeError = CodeError {
        success: false,
        error_code: 2,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Database insertion failed!",
    };
    pub const DB_UPDATE_ERROR: CodeError = CodeError {
        success: false,
        error_code: 3,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Database update failed!",
    };
    pub const DB_DELETION_ERROR: CodeError = CodeError {
        success: false,
        error_code: 4,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Database deletion failed!",
    };
    pub const DB_TRANSACTION_ERROR: CodeError = CodeError {
        success: false,
        error_code: 5,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Database transaction failed!",
    };
    pub const UNAUTHORIZED_ACCESS: CodeError = CodeError {
        success: false,
        error_code: 10,
        http_status_code: StatusCode::UNAUTHORIZED,
        message: "Unauthorized access!",
    };
    pub const SESSION_ID_ALREADY_EXISTS: CodeError = CodeError {
        success: false,
        error_code: 11,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Session could not be created!",
    };
    pub const IS_NOT_ADMIN: CodeError = CodeError {
        success: false,
        error_code: 12,
        http_status_code: StatusCode::FORBIDDEN,
        message: "Admin access required!",
    };
    pub const IS_NOT_SUPERADMIN: CodeError = CodeError {
        success: false,
        error_code: 13,
        http_status_code: StatusCode::FORBIDDEN,
        message: "Superadmin access required!",
    };
    pub const USER_NOT_VERIFIED: CodeError = CodeError {
        success: false,
        error_code: 14,
        http_status_code: StatusCode::FORBIDDEN,
        message: "Account is not verified for posting!",
    };
    pub const USER_NOT_FOUND: CodeError = CodeError {
        success: false,
        error_code: 20,
        http_status_code: StatusCode::NOT_FOUND,
        message: "User not found!",
    };
    pub const POST_NOT_FOUND: CodeError = CodeError {
        success: false,
        error_code: 21,
        http_status_code: StatusCode::NOT_FOUND,
        message: "Post not found!",
    };
    pub const COMMENT_NOT_FOUND: CodeError = CodeError {
        success: false,
        error_code: 22,
        http_status_code: StatusCode::NOT_FOUND,
        message: "Comment not found!",
    };
    pub const REPORT_NOT_FOUND: CodeError = CodeError {
        success: false,
        error_code: 23,
        http_status_code: StatusCode::NOT_FOUND,
        message: "Report not found!",
    };
    pub const VERIFICATION_NOT_FOUND: CodeError = CodeError {
        success: false,
        error_code: 24,
        http_status_code: StatusCode::NOT_FOUND,
        message: "Verification request not found!",
    };
    pub const ROUTE_NOT_FOUND: CodeError = CodeError {
        success: false,
        error_code: 25,
        http_status_code: StatusCode::NOT_FOUND,
        message: "No such route!",
    };
    pub const NOT_CONTENT_OWNER: CodeError = CodeError {
        success: false,
        error_code: 30,
        http_status_code: StatusCode::FORBIDDEN,
        message: "Not the owner of this content!",
    };
    pub const ANNOUNCEMENT_REQUIRES_ADMIN: CodeError = CodeError {
        success: false,
        error_code: 31,
        http_status_code: StatusCode::FORBIDDEN,
        message: "Only admins may publish announcements!",
    };
    pub const EMPTY_CONTENT: CodeError = CodeError {
        success: false,
        error_code: 32,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Content must not be empty!",
    };
    pub const INVALID_REPORT_TARGET: CodeError = CodeError {
        success: false,
        error_code: 33,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Report must target exactly one post or comment!",
    };
    pub const REPORT_ALREADY_DECIDED: CodeError = CodeError {
        success: false,
        error_code: 34,
        http_status_code: StatusCode::CONFLICT,
        message: "Report has already been decided!",
    };
    pub const INVALID_REPORT_STATUS: CodeError = CodeError {
        success: false,
        error_code: 35,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Invalid report resolution status!",
    };
    pub const EMAIL_INVALID: CodeError = CodeError {
        success: false,
        error_code: 40,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Email address is invalid!",
    };
    pub const EMAIL_NOT_CAMPUS: CodeError = CodeError {
        success: false,
        error_code: 41,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Email address is not a campus address!",
    };
    pub const INVALID_CLASS_NUMBER: CodeError = CodeError {
        success: false,
        error_code: 42,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Class number must be exactly four digits!",
    };
    pub const INVALID_REAL_NAME: CodeError = CodeError {
        success: false,
        error_code: 43,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Real name must not be empty!",
    };
    pub const INVALID_IMAGE_URL: CodeError = CodeError {
        success: false,
        error_code: 44,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Proof image URL is invalid!",
    };
    pub const VERIFICATION_ALREADY_DECIDED: CodeError = CodeError {
        success: false,
        error_code: 45,
        http_status_code: StatusCode::CONFLICT,
        message: "Verification request has already been decided!",
    };
    pub const VERIFICATION_ALREADY_PENDING: CodeError = CodeError {
        success: false,
        error_code: 46,
        http_status_code: StatusCode::CONFLICT,
        message: "A verification request is already pending!",
    };
    pub const ROSTER_NO_MATCH: CodeError = CodeError {
        success: false,
        error_code: 47,
        http_status_code: StatusCode::UNPROCESSABLE_ENTITY,
        message: "Name and email did not match the campus roster!",
    };
    pub const ROSTER_PROVIDER_ERROR: CodeError = CodeError {
        success: false,
        error_code: 48,
        http_status_code: StatusCode::BAD_GATEWAY,
        message: "Campus roster service is unavailable!",
    };
    pub const IDENTITY_PROVIDER_ERROR: CodeError = CodeError {
        success: false,
        error_code: 50,
        http_status_code: StatusCode::BAD_GATEWAY,
        message: "Identity provider request failed!",
    };
    pub const INVALID_SESSION_TOKEN: CodeError = CodeError {
        success: false,
        error_code: 51,
        http_status_code: StatusCode::UNAUTHORIZED,
        message: "Session token could not be verified!",
    };
    pub const WEBHOOK_HEADERS_MISSING: CodeError = CodeError {
        success: false,
        error_code: 52,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Webhook signature headers missing!",
    };
    pub const WEBHOOK_SIGNATURE_INVALID: CodeError = CodeError {
        success: false,
        error_code: 53,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Webhook signature verification failed!",
    };
    pub const WEBHOOK_PAYLOAD_INVALID: CodeError = CodeError {
        success: false,
        error_code: 54,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Webhook payload could not be parsed!",
    };
    pub const INVALID_ROLE: CodeError = CodeError {
        success: false,
        error_code: 55,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Role must be 'user' or 'admin'!",
    };
    pub const FILE_UPLOAD_ERROR: CodeError = CodeError {
        success: false,
        error_code: 60,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "File upload failed!",
    };
    pub const COULD_NOT_PROCESS_IMAGE: CodeError = CodeError {
        success: false,
        error_code: 61,
        http_status_code: StatusCode::UNPROCESSABLE_ENTITY,
        message: "Could not process uploaded image!",
    };
    pub const BLOB_STORAGE_ERROR: CodeError = CodeError {
        success: false,
        error_code: 62,
        http_status_code: StatusCode::BAD_GATEWAY,
        message: "Could not store uploaded file!",
    };
}

pub fn code_err<E: fmt::Display>(cerr: CodeError, e: E) -> CodeErrorResp {
    CodeErrorResp {
        success: cerr.success,
        error_code: cerr.error_code,
        http_status_code: cerr.http_status_code,
        message: cerr.message.to_string(),
        error_message: e.to_string(),
    }
}

impl From<CodeError> for CodeErrorResp {
    fn from(cerr: CodeError) -> Self {
        CodeErrorResp {
            success: cerr.success,
            error_code: cerr.error_code,
            http_status_code: cerr.http_status_code,
            message: cerr.message.to_string(),
            error_message: String::new(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CodeErrorResp {
    pub success: bool,
    pub error_code: u16,
    #[serde(serialize_with = "serialize_status_code")]
    #[schema(value_type = u16)]
    pub http_status_code: StatusCode,
    pub message: String,
    pub error_message: String,
}

fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

impl fmt::Display for CodeErrorResp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.error_message)
    }
}

impl Error for CodeErrorResp {}

impl IntoResponse for CodeErrorResp {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::to_string(&self).unwrap_or_else(|_| "{}".to_string());
        let mut response = (self.http_status_code, body).into_response();

        // Hand the error details to the logging middleware via headers;
        // it strips them again before the response leaves the server.
        let headers = response.headers_mut();
        let log_level = if self.http_status_code.is_server_error() {
            "ERROR"
        } else {
            "INFO"
        };
        headers.insert("x-error-log-level", HeaderValue::from_static(log_level));
        if let Ok(v) = HeaderValue::from_str(&self.http_status_code.as_u16().to_string()) {
            headers.insert("x-error-status-code", v);
        }
        if let Ok(v) = HeaderValue::from_str(&self.error_code.to_string()) {
            headers.insert("x-error-code", v);
        }
        if let Ok(v) = HeaderValue::from_str(&self.message) {
            headers.insert("x-error-message", v);
        }
        if let Ok(v) = HeaderValue::from_str(&self.error_message) {
            headers.insert("x-error-detail", v);
        }

        response
    }
}
