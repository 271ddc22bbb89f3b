//! Compound assignment key.
//!
//! A course and its assignment kind fold into one string so the store can
//! index both access paths (by staff, by course) on the same column:
//!
//! ```text
//! <course>#homeroom
//! <course>#subject#<subject>
//! ```
//!
//! `%` and `#` inside components are escaped as `%25` and `%23`, so the first
//! `#` of a key always ends the course. All keys of a course therefore sort
//! inside `[<course>#, <course>$)`.

use std::fmt;

use crate::error::{Error, Result};
use crate::types::{Assignment, AssignmentKind};

const SEPARATOR: char = '#';
/// First character after `SEPARATOR`; closes a course's key range.
const RANGE_END: char = '$';
const HOMEROOM_TAG: &str = "homeroom";
const SUBJECT_TAG: &str = "subject";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssignmentKey {
    Homeroom { course: String },
    Subject { course: String, subject: String },
}

impl AssignmentKey {
    /// Builds a key from loose parts, validating them the way `encode` needs.
    pub fn new(course: &str, kind: AssignmentKind, subject: Option<&str>) -> Result<Self> {
        if course.is_empty() {
            return Err(Error::InvalidCourseCode("course code cannot be empty".into()));
        }
        match kind {
            AssignmentKind::Homeroom => Ok(Self::Homeroom {
                course: course.to_string(),
            }),
            AssignmentKind::Subject => match subject {
                Some(s) if !s.is_empty() => Ok(Self::Subject {
                    course: course.to_string(),
                    subject: s.to_string(),
                }),
                _ => Err(Error::InvalidAssignmentKind(
                    "subject assignment without a subject".into(),
                )),
            },
        }
    }

    pub fn course(&self) -> &str {
        match self {
            Self::Homeroom { course } | Self::Subject { course, .. } => course,
        }
    }

    pub fn kind(&self) -> AssignmentKind {
        match self {
            Self::Homeroom { .. } => AssignmentKind::Homeroom,
            Self::Subject { .. } => AssignmentKind::Subject,
        }
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Homeroom { .. } => None,
            Self::Subject { subject, .. } => Some(subject),
        }
    }

    #[must_use]
    pub fn encode(&self) -> String {
        let mut key = escape(self.course());
        key.push(SEPARATOR);
        match self {
            Self::Homeroom { .. } => key.push_str(HOMEROOM_TAG),
            Self::Subject { subject, .. } => {
                key.push_str(SUBJECT_TAG);
                key.push(SEPARATOR);
                key.push_str(&escape(subject));
            }
        }
        key
    }

    pub fn decode(key: &str) -> Result<Self> {
        let malformed = || Error::MalformedAssignmentKey(key.to_string());

        let segments: Vec<&str> = key.split(SEPARATOR).collect();
        let course = unescape(segments[0]).ok_or_else(malformed)?;
        if course.is_empty() {
            return Err(malformed());
        }

        match segments.as_slice() {
            [_, HOMEROOM_TAG] => Ok(Self::Homeroom { course }),
            [_, SUBJECT_TAG, subject] => {
                let subject = unescape(subject).ok_or_else(malformed)?;
                if subject.is_empty() {
                    return Err(malformed());
                }
                Ok(Self::Subject { course, subject })
            }
            _ => Err(malformed()),
        }
    }

    /// Half-open key range holding every assignment of `course`.
    #[must_use]
    pub fn course_range(course: &str) -> (String, String) {
        let escaped = escape(course);
        (
            format!("{escaped}{SEPARATOR}"),
            format!("{escaped}{RANGE_END}"),
        )
    }
}

impl fmt::Display for AssignmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Encodes loose parts into a compound key string.
pub fn encode(course: &str, kind: &str, subject: Option<&str>) -> Result<String> {
    let kind = AssignmentKind::parse(kind)
        .ok_or_else(|| Error::InvalidAssignmentKind(kind.to_string()))?;
    Ok(AssignmentKey::new(course, kind, subject)?.encode())
}

/// Decodes a compound key string into `(course, kind, subject)`.
pub fn decode(key: &str) -> Result<(String, AssignmentKind, Option<String>)> {
    let key = AssignmentKey::decode(key)?;
    let kind = key.kind();
    Ok(match key {
        AssignmentKey::Homeroom { course } => (course, kind, None),
        AssignmentKey::Subject { course, subject } => (course, kind, Some(subject)),
    })
}

impl Assignment {
    #[must_use]
    pub fn key(&self) -> AssignmentKey {
        match self.kind {
            AssignmentKind::Homeroom => AssignmentKey::Homeroom {
                course: self.course.clone(),
            },
            AssignmentKind::Subject => AssignmentKey::Subject {
                course: self.course.clone(),
                subject: self.subject.clone().unwrap_or_default(),
            },
        }
    }
}

fn escape(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for c in component.chars() {
        match c {
            '%' => out.push_str("%25"),
            '#' => out.push_str("%23"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(component: &str) -> Option<String> {
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match (chars.next(), chars.next()) {
            (Some('2'), Some('5')) => out.push('%'),
            (Some('2'), Some('3')) => out.push('#'),
            _ => return None,
        }
    }
    Some(out)
}
