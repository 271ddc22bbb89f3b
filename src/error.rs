use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("already exists")]
    AlreadyExists,

    #[error("token lookup collision")]
    TokenLookupCollision,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("invalid token format")]
    InvalidTokenFormat,

    #[error("token expired")]
    TokenExpired,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    // Assignment key codec
    #[error("invalid assignment kind: {0}")]
    InvalidAssignmentKind(String),

    #[error("malformed assignment key: {0}")]
    MalformedAssignmentKey(String),

    #[error("invalid course code: {0}")]
    InvalidCourseCode(String),

    // Assignment registry
    #[error("invalid assignee: {0}")]
    InvalidAssignee(String),

    #[error("subject assignments require a subject")]
    MissingSubject,

    #[error("course {0} already has an active homeroom teacher")]
    DuplicateHomeroom(String),

    #[error("assignment already exists")]
    DuplicateAssignment,

    // Access gate
    #[error("course {0} is outside the caller's assigned courses")]
    ForbiddenCourse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
