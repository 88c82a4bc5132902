//! Canonical error taxonomy
//!
//! Every outcome that crosses the service boundary is described by one
//! [`ErrorKind`]. The kind, not the Rust error type, decides what the client
//! sees: the status name, the default message, the HTTP status and the
//! severity the response is logged at. The codes are client-facing, not
//! log-facing; the causal error travels separately and is never serialized.
//!
//! The mapping follows the Google API design guide error model.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use tracing::Level;

/// Canonical error kinds, numbered as in the client contract (`OK` = 0 ... `DATA_LOSS` = 16)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// Not an error; returned on success
    Ok = 0,
    /// The operation was cancelled, typically by the caller
    Cancelled = 1,
    /// Unknown server error
    Unknown = 2,
    /// The client specified an argument that is invalid regardless of system state
    InvalidArgument = 3,
    /// The deadline expired before the operation could complete
    DeadlineExceeded = 4,
    /// The requested entity was not found
    NotFound = 5,
    /// The entity the client attempted to create already exists
    AlreadyExists = 6,
    /// The caller lacks permission for the operation
    PermissionDenied = 7,
    /// The request lacks valid authentication credentials
    Unauthenticated = 8,
    /// A quota or rate limit was exhausted
    ResourceExhausted = 9,
    /// The system is not in a state required for the operation
    FailedPrecondition = 10,
    /// Concurrency conflict such as a read-modify-write abort
    Aborted = 11,
    /// The operation was attempted past the valid range
    OutOfRange = 12,
    /// The operation is not implemented or not enabled
    Unimplemented = 13,
    /// An invariant expected by the system has been broken
    Internal = 14,
    /// The service is currently unavailable
    Unavailable = 15,
    /// Unrecoverable data loss or corruption
    DataLoss = 16,
}

impl ErrorKind {
    /// All kinds in numeric order
    pub const ALL: [ErrorKind; 17] = [
        ErrorKind::Ok,
        ErrorKind::Cancelled,
        ErrorKind::Unknown,
        ErrorKind::InvalidArgument,
        ErrorKind::DeadlineExceeded,
        ErrorKind::NotFound,
        ErrorKind::AlreadyExists,
        ErrorKind::PermissionDenied,
        ErrorKind::Unauthenticated,
        ErrorKind::ResourceExhausted,
        ErrorKind::FailedPrecondition,
        ErrorKind::Aborted,
        ErrorKind::OutOfRange,
        ErrorKind::Unimplemented,
        ErrorKind::Internal,
        ErrorKind::Unavailable,
        ErrorKind::DataLoss,
    ];

    /// Numeric code sent to clients
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a kind by its numeric code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Whether this kind denotes success
    pub fn is_ok(self) -> bool {
        self == ErrorKind::Ok
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(describe(*self).status)
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for ErrorKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        ErrorKind::from_code(code)
            .ok_or_else(|| de::Error::custom(format!("undefined error code: {}", code)))
    }
}

/// Everything a response needs to know about an [`ErrorKind`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDetail {
    pub kind: ErrorKind,
    /// Client-facing status name
    pub status: &'static str,
    /// Default message (Chinese, the service's primary audience)
    pub message: &'static str,
    /// Default message in English
    pub message_en: &'static str,
    pub http_status: u16,
    /// Severity the response is logged at
    pub log_level: Level,
}

// Indexed by `ErrorKind as usize`; `describe` relies on that order.
static CODE_DETAILS: [CodeDetail; 17] = [
    CodeDetail {
        kind: ErrorKind::Ok,
        status: "OK",
        message: "成功",
        message_en: "Success",
        http_status: 200,
        log_level: Level::INFO,
    },
    CodeDetail {
        kind: ErrorKind::Cancelled,
        status: "CANCELLED",
        message: "客户端取消请求",
        message_en: "The request was cancelled by the client",
        http_status: 499,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::Unknown,
        status: "UNKNOWN",
        message: "未知的服务器错误",
        message_en: "Unknown server error",
        http_status: 500,
        log_level: Level::ERROR,
    },
    CodeDetail {
        kind: ErrorKind::InvalidArgument,
        status: "INVALID_ARGUMENT",
        message: "客户端指定了无效的参数",
        message_en: "The client specified an invalid argument",
        http_status: 400,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::DeadlineExceeded,
        status: "DEADLINE_EXCEEDED",
        message: "已超过请求期限",
        message_en: "The request deadline was exceeded",
        http_status: 504,
        log_level: Level::ERROR,
    },
    CodeDetail {
        kind: ErrorKind::NotFound,
        status: "NOT_FOUND",
        message: "找不到指定的资源",
        message_en: "The requested resource was not found",
        http_status: 404,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::AlreadyExists,
        status: "ALREADY_EXISTS",
        message: "客户端尝试创建的资源已存在",
        message_en: "The resource the client tried to create already exists",
        http_status: 409,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::PermissionDenied,
        status: "PERMISSION_DENIED",
        message: "客户端没有足够的权限",
        message_en: "The client does not have sufficient permission",
        http_status: 403,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::Unauthenticated,
        status: "UNAUTHENTICATED",
        message: "请求未通过身份验证",
        message_en: "The request is not authenticated",
        http_status: 401,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::ResourceExhausted,
        status: "RESOURCE_EXHAUSTED",
        message: "资源配额达到速率限制",
        message_en: "Resource quota or rate limit exhausted",
        http_status: 429,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::FailedPrecondition,
        status: "FAILED_PRECONDITION",
        message: "请求不能在当前系统状态下执行",
        message_en: "The request cannot be executed in the current system state",
        http_status: 400,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::Aborted,
        status: "ABORTED",
        message: "并发冲突",
        message_en: "Concurrency conflict",
        http_status: 409,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::OutOfRange,
        status: "OUT_OF_RANGE",
        message: "客户端指定了无效的范围",
        message_en: "The client specified an invalid range",
        http_status: 400,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::Unimplemented,
        status: "NOT_IMPLEMENTED",
        message: "服务器未实现该API方法",
        message_en: "The API method is not implemented by the server",
        http_status: 501,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::Internal,
        status: "INTERNAL",
        message: "内部服务错误",
        message_en: "Internal server error",
        http_status: 500,
        log_level: Level::ERROR,
    },
    CodeDetail {
        kind: ErrorKind::Unavailable,
        status: "UNAVAILABLE",
        message: "暂停服务",
        message_en: "The service is currently unavailable",
        http_status: 503,
        log_level: Level::WARN,
    },
    CodeDetail {
        kind: ErrorKind::DataLoss,
        status: "DATA_LOSS",
        message: "不可恢复的数据丢失或数据损坏",
        message_en: "Unrecoverable data loss or corruption",
        http_status: 500,
        log_level: Level::ERROR,
    },
];

/// Describe an error kind: status name, default message, HTTP status and log level
pub fn describe(kind: ErrorKind) -> &'static CodeDetail {
    &CODE_DETAILS[kind as usize]
}

/// Describe a raw numeric code, falling back to `INTERNAL` for undefined codes
pub fn describe_code(code: u8) -> &'static CodeDetail {
    match ErrorKind::from_code(code) {
        Some(kind) => describe(kind),
        None => describe(ErrorKind::Internal),
    }
}
