use crate::server::response::ApiError;

const MAX_COURSE_CODE_LEN: usize = 32;
const MAX_DISPLAY_NAME_LEN: usize = 100;
const MAX_SUBJECT_LEN: usize = 64;
const MAX_TITLE_LEN: usize = 200;

fn is_valid_course_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
}

fn validate_text(value: &str, field: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    if value.chars().count() > max_len {
        return Err(format!("{field} cannot exceed {max_len} characters"));
    }
    if value.chars().any(char::is_control) {
        return Err(format!("{field} cannot contain control characters"));
    }
    Ok(())
}

pub fn validate_course_code(course: &str) -> Result<(), ApiError> {
    if course.is_empty() {
        return Err(ApiError::bad_request("Course code cannot be empty"));
    }
    if course.len() > MAX_COURSE_CODE_LEN {
        return Err(ApiError::bad_request(format!(
            "Course code cannot exceed {MAX_COURSE_CODE_LEN} characters"
        )));
    }
    if !course.chars().all(is_valid_course_char) {
        return Err(ApiError::bad_request(
            "Course code can only contain alphanumeric characters, hyphens, underscores, and periods",
        ));
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), ApiError> {
    validate_text(name, "Display name", MAX_DISPLAY_NAME_LEN).map_err(ApiError::bad_request)
}

pub fn validate_subject(subject: &str) -> Result<(), ApiError> {
    validate_text(subject, "Subject", MAX_SUBJECT_LEN).map_err(ApiError::bad_request)
}

pub fn validate_title(title: &str) -> Result<(), ApiError> {
    validate_text(title, "Title", MAX_TITLE_LEN).map_err(ApiError::bad_request)
}

pub fn validate_score(score: f64, max_score: f64) -> Result<(), ApiError> {
    if !score.is_finite() || !max_score.is_finite() {
        return Err(ApiError::bad_request("Scores must be finite numbers"));
    }
    if max_score <= 0.0 {
        return Err(ApiError::bad_request("max_score must be greater than zero"));
    }
    if !(0.0..=max_score).contains(&score) {
        return Err(ApiError::bad_request("score must be between 0 and max_score"));
    }
    Ok(())
}
