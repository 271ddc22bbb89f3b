use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ffi, params, params_from_iter};

use super::schema::SCHEMA;
use super::{RecordQuery, Store};
use crate::access::codec::AssignmentKey;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

const DATE_FORMAT: &str = "%Y-%m-%d";

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn get_parsed<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let value: String = row.get(idx)?;
    parse(&value).ok_or_else(|| conversion_error(idx, format!("unexpected value '{value}'")))
}

fn get_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let value: String = row.get(idx)?;
    NaiveDate::parse_from_str(&value, DATE_FORMAT)
        .map_err(|e| conversion_error(idx, format!("invalid date '{value}': {e}")))
}

/// Extended result code of a constraint violation, if `err` is one.
fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

const ACCOUNT_COLUMNS: &str = "id, display_name, role, active, created_at, updated_at";

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        display_name: row.get(1)?,
        role: get_parsed(row, 2, Role::parse)?,
        active: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        updated_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

const TOKEN_COLUMNS: &str =
    "id, token_hash, token_lookup, is_admin, account_id, created_at, expires_at, last_used_at";

fn token_from_row(row: &Row<'_>) -> rusqlite::Result<Token> {
    Ok(Token {
        id: row.get(0)?,
        token_hash: row.get(1)?,
        token_lookup: row.get(2)?,
        is_admin: row.get(3)?,
        account_id: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        expires_at: row.get::<_, Option<String>>(6)?.map(|s| parse_datetime(&s)),
        last_used_at: row.get::<_, Option<String>>(7)?.map(|s| parse_datetime(&s)),
    })
}

const ASSIGNMENT_COLUMNS: &str = "staff_id, assignment_key, label, active, assigned_at";

/// Course, kind and subject come from the compound key, not the
/// denormalized index columns.
fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<Assignment> {
    let key: String = row.get(1)?;
    let key = AssignmentKey::decode(&key)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    Ok(Assignment {
        staff_id: row.get(0)?,
        course: key.course().to_string(),
        kind: key.kind(),
        subject: key.subject().map(str::to_string),
        label: row.get(2)?,
        active: row.get(3)?,
        assigned_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn guardian_link_from_row(row: &Row<'_>) -> rusqlite::Result<GuardianLink> {
    Ok(GuardianLink {
        guardian_id: row.get(0)?,
        student_id: row.get(1)?,
        created_at: parse_datetime(&row.get::<_, String>(2)?),
    })
}

fn enrollment_from_row(row: &Row<'_>) -> rusqlite::Result<Enrollment> {
    Ok(Enrollment {
        student_id: row.get(0)?,
        course: row.get(1)?,
        enrolled_at: parse_datetime(&row.get::<_, String>(2)?),
    })
}

fn attendance_from_row(row: &Row<'_>) -> rusqlite::Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        id: row.get(0)?,
        student_id: row.get(1)?,
        course: row.get(2)?,
        date: get_date(row, 3)?,
        status: get_parsed(row, 4, AttendanceStatus::parse)?,
        note: row.get(5)?,
        recorded_by: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn grade_from_row(row: &Row<'_>) -> rusqlite::Result<GradeRecord> {
    Ok(GradeRecord {
        id: row.get(0)?,
        student_id: row.get(1)?,
        course: row.get(2)?,
        subject: row.get(3)?,
        assessment: row.get(4)?,
        score: row.get(5)?,
        max_score: row.get(6)?,
        recorded_by: row.get(7)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

fn material_from_row(row: &Row<'_>) -> rusqlite::Result<Material> {
    Ok(Material {
        id: row.get(0)?,
        course: row.get(1)?,
        subject: row.get(2)?,
        title: row.get(3)?,
        url: row.get(4)?,
        created_by: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn placeholders(start: usize, count: usize) -> String {
    (start + 1..=start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the WHERE clause for a record listing.
/// Returns None when the scope cannot match any row.
fn record_filter(query: &RecordQuery, has_student: bool) -> Option<(String, Vec<String>)> {
    let mut clauses = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(course) = &query.course {
        values.push(course.clone());
        clauses.push(format!("course = ?{}", values.len()));
    }
    if let Some(courses) = &query.courses {
        if courses.is_empty() {
            return None;
        }
        clauses.push(format!("course IN ({})", placeholders(values.len(), courses.len())));
        values.extend(courses.iter().cloned());
    }

    if has_student {
        if let Some(student_id) = &query.student_id {
            values.push(student_id.clone());
            clauses.push(format!("student_id = ?{}", values.len()));
        }
        if let Some(students) = &query.students {
            if students.is_empty() {
                return None;
            }
            clauses.push(format!(
                "student_id IN ({})",
                placeholders(values.len(), students.len())
            ));
            values.extend(students.iter().cloned());
        }
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    Some((where_clause, values))
}

impl SqliteStore {
    fn list_records<T>(
        &self,
        select: &str,
        order_by: &str,
        query: &RecordQuery,
        has_student: bool,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let Some((where_clause, values)) = record_filter(query, has_student) else {
            return Ok(Vec::new());
        };

        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{select}{where_clause} ORDER BY {order_by}"))?;
        let rows = stmt.query_map(params_from_iter(values.iter()), map)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Account operations

    fn create_account(&self, account: &Account) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO accounts (id, display_name, role, active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account.id,
                account.display_name,
                account.role.as_str(),
                account.active,
                format_datetime(&account.created_at),
                format_datetime(&account.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_account(&self, id: &str) -> Result<Option<Account>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"),
            params![id],
            account_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_accounts(&self, cursor: &str, limit: i32) -> Result<Vec<Account>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id > ?1 ORDER BY id LIMIT ?2"
        ))?;

        let rows = stmt.query_map(params![cursor, limit], account_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_account(&self, account: &Account) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE accounts SET display_name = ?1, active = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                account.display_name,
                account.active,
                format_datetime(&Utc::now()),
                account.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Token operations

    fn create_token(&self, token: &Token) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO tokens (id, token_hash, token_lookup, is_admin, account_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                token.id,
                token.token_hash,
                token.token_lookup,
                token.is_admin,
                token.account_id,
                format_datetime(&token.created_at),
                token.expires_at.as_ref().map(format_datetime),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::TokenLookupCollision)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_token_by_id(&self, id: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {TOKEN_COLUMNS} FROM tokens WHERE id = ?1"),
            params![id],
            token_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {TOKEN_COLUMNS} FROM tokens WHERE token_lookup = ?1"),
            params![lookup],
            token_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_tokens(&self, cursor: &str, limit: i32) -> Result<Vec<Token>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens WHERE id > ?1 ORDER BY id LIMIT ?2"
        ))?;

        let rows = stmt.query_map(params![cursor, limit], token_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_account_tokens(&self, account_id: &str) -> Result<Vec<Token>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens WHERE account_id = ?1 ORDER BY created_at DESC"
        ))?;

        let rows = stmt.query_map(params![account_id], token_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_token(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM tokens WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn update_token_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE tokens SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    // Assignment operations

    fn insert_assignment(&self, assignment: &Assignment) -> Result<()> {
        let key = assignment.key();
        let result = self.conn().execute(
            "INSERT INTO assignments (staff_id, assignment_key, course, kind, subject, label, active, assigned_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (staff_id, assignment_key) DO UPDATE
             SET active = excluded.active, label = excluded.label, assigned_at = excluded.assigned_at
             WHERE assignments.active = 0",
            params![
                assignment.staff_id,
                key.encode(),
                key.course(),
                key.kind().as_str(),
                key.subject(),
                assignment.label,
                assignment.active,
                format_datetime(&assignment.assigned_at),
            ],
        );

        match result {
            Ok(0) => Err(Error::DuplicateAssignment),
            Ok(_) => Ok(()),
            Err(e) => match constraint_code(&e) {
                // The only unique index besides the primary key is the
                // active-homeroom one; primary key conflicts take the upsert path.
                Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                    Err(Error::DuplicateHomeroom(key.course().to_string()))
                }
                Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Err(Error::InvalidAssignee(format!(
                    "no account {}",
                    assignment.staff_id
                ))),
                _ => Err(Error::from(e)),
            },
        }
    }

    fn get_assignment(&self, staff_id: &str, key: &AssignmentKey) -> Result<Option<Assignment>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
                 WHERE staff_id = ?1 AND assignment_key = ?2"
            ),
            params![staff_id, key.encode()],
            assignment_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_staff_assignments(&self, staff_id: &str) -> Result<Vec<Assignment>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
             WHERE staff_id = ?1 ORDER BY assignment_key"
        ))?;

        let rows = stmt.query_map(params![staff_id], assignment_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_course_assignments(&self, course: &str) -> Result<Vec<Assignment>> {
        let (start, end) = AssignmentKey::course_range(course);
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
             WHERE assignment_key >= ?1 AND assignment_key < ?2
             ORDER BY assignment_key, staff_id"
        ))?;

        let rows = stmt.query_map(params![start, end], assignment_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn set_assignment_active(
        &self,
        staff_id: &str,
        key: &AssignmentKey,
        active: bool,
    ) -> Result<bool> {
        let result = self.conn().execute(
            "UPDATE assignments SET active = ?1 WHERE staff_id = ?2 AND assignment_key = ?3",
            params![active, staff_id, key.encode()],
        );

        match result {
            Ok(rows) => Ok(rows > 0),
            Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                Err(Error::DuplicateHomeroom(key.course().to_string()))
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn set_homeroom_label(&self, course: &str, label: Option<&str>) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE assignments SET label = ?1
             WHERE course = ?2 AND kind = 'homeroom' AND active = 1",
            params![label, course],
        )?;
        Ok(rows > 0)
    }

    fn delete_assignment(&self, staff_id: &str, key: &AssignmentKey) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM assignments WHERE staff_id = ?1 AND assignment_key = ?2",
            params![staff_id, key.encode()],
        )?;
        Ok(rows > 0)
    }

    // Guardian link operations

    fn create_guardian_link(&self, link: &GuardianLink) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO guardian_links (guardian_id, student_id, created_at) VALUES (?1, ?2, ?3)",
            params![
                link.guardian_id,
                link.student_id,
                format_datetime(&link.created_at)
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn delete_guardian_link(&self, guardian_id: &str, student_id: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM guardian_links WHERE guardian_id = ?1 AND student_id = ?2",
            params![guardian_id, student_id],
        )?;
        Ok(rows > 0)
    }

    fn list_guardian_links(&self, guardian_id: &str) -> Result<Vec<GuardianLink>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT guardian_id, student_id, created_at FROM guardian_links
             WHERE guardian_id = ?1 ORDER BY student_id",
        )?;

        let rows = stmt.query_map(params![guardian_id], guardian_link_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Roster operations

    fn create_enrollment(&self, enrollment: &Enrollment) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO enrollments (student_id, course, enrolled_at) VALUES (?1, ?2, ?3)",
            params![
                enrollment.student_id,
                enrollment.course,
                format_datetime(&enrollment.enrolled_at)
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_enrollment(&self, student_id: &str, course: &str) -> Result<Option<Enrollment>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT student_id, course, enrolled_at FROM enrollments
             WHERE student_id = ?1 AND course = ?2",
            params![student_id, course],
            enrollment_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_enrollment(&self, student_id: &str, course: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM enrollments WHERE student_id = ?1 AND course = ?2",
            params![student_id, course],
        )?;
        Ok(rows > 0)
    }

    fn list_enrollments(&self, query: &RecordQuery) -> Result<Vec<Enrollment>> {
        self.list_records(
            "SELECT student_id, course, enrolled_at FROM enrollments",
            "course, student_id",
            query,
            true,
            enrollment_from_row,
        )
    }

    // Record operations

    fn create_attendance(&self, record: &AttendanceRecord) -> Result<()> {
        self.conn().execute(
            "INSERT INTO attendance (id, student_id, course, date, status, note, recorded_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.student_id,
                record.course,
                record.date.format(DATE_FORMAT).to_string(),
                record.status.as_str(),
                record.note,
                record.recorded_by,
                format_datetime(&record.created_at),
            ],
        )?;
        Ok(())
    }

    fn list_attendance(&self, query: &RecordQuery) -> Result<Vec<AttendanceRecord>> {
        self.list_records(
            "SELECT id, student_id, course, date, status, note, recorded_by, created_at FROM attendance",
            "date, course, student_id",
            query,
            true,
            attendance_from_row,
        )
    }

    fn create_grade(&self, record: &GradeRecord) -> Result<()> {
        self.conn().execute(
            "INSERT INTO grades (id, student_id, course, subject, assessment, score, max_score, recorded_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.student_id,
                record.course,
                record.subject,
                record.assessment,
                record.score,
                record.max_score,
                record.recorded_by,
                format_datetime(&record.created_at),
            ],
        )?;
        Ok(())
    }

    fn list_grades(&self, query: &RecordQuery) -> Result<Vec<GradeRecord>> {
        self.list_records(
            "SELECT id, student_id, course, subject, assessment, score, max_score, recorded_by, created_at FROM grades",
            "course, student_id, created_at",
            query,
            true,
            grade_from_row,
        )
    }

    fn create_material(&self, material: &Material) -> Result<()> {
        self.conn().execute(
            "INSERT INTO materials (id, course, subject, title, url, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                material.id,
                material.course,
                material.subject,
                material.title,
                material.url,
                material.created_by,
                format_datetime(&material.created_at),
            ],
        )?;
        Ok(())
    }

    fn list_materials(&self, query: &RecordQuery) -> Result<Vec<Material>> {
        self.list_records(
            "SELECT id, course, subject, title, url, created_by, created_at FROM materials",
            "course, created_at",
            query,
            false,
            material_from_row,
        )
    }

    fn has_admin_token(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM tokens WHERE is_admin = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open() -> (TempDir, SqliteStore) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        (temp, store)
    }

    fn account(id: &str, role: Role) -> Account {
        Account {
            id: id.to_string(),
            display_name: format!("Account {id}"),
            role,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn homeroom(staff_id: &str, course: &str) -> Assignment {
        Assignment {
            staff_id: staff_id.to_string(),
            course: course.to_string(),
            kind: AssignmentKind::Homeroom,
            subject: None,
            label: None,
            active: true,
            assigned_at: Utc::now(),
        }
    }

    fn subject(staff_id: &str, course: &str, name: &str) -> Assignment {
        Assignment {
            kind: AssignmentKind::Subject,
            subject: Some(name.to_string()),
            ..homeroom(staff_id, course)
        }
    }

    #[test]
    fn test_initialize_creates_tables() {
        let (_temp, store) = open();

        let conn = store.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        for table in [
            "accounts",
            "tokens",
            "assignments",
            "guardian_links",
            "enrollments",
            "attendance",
            "grades",
            "materials",
        ] {
            assert!(tables.contains(&table.to_string()), "missing table {table}");
        }
    }

    #[test]
    fn test_account_crud() {
        let (_temp, store) = open();

        store.create_account(&account("t1", Role::Teacher)).unwrap();
        assert!(matches!(
            store.create_account(&account("t1", Role::Teacher)),
            Err(Error::AlreadyExists)
        ));

        let mut fetched = store.get_account("t1").unwrap().unwrap();
        assert_eq!(fetched.role, Role::Teacher);
        assert!(fetched.active);

        fetched.active = false;
        fetched.display_name = "Ms. Example".to_string();
        store.update_account(&fetched).unwrap();

        let updated = store.get_account("t1").unwrap().unwrap();
        assert!(!updated.active);
        assert_eq!(updated.display_name, "Ms. Example");

        assert!(store.get_account("missing").unwrap().is_none());
        assert!(matches!(
            store.update_account(&account("missing", Role::Teacher)),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_token_lookup_collision() {
        let (_temp, store) = open();

        let token1 = Token {
            id: "token-1".to_string(),
            token_hash: "hash1".to_string(),
            token_lookup: "lookup12".to_string(),
            is_admin: true,
            account_id: None,
            created_at: Utc::now(),
            expires_at: None,
            last_used_at: None,
        };
        store.create_token(&token1).unwrap();

        let token2 = Token {
            id: "token-2".to_string(),
            token_hash: "hash2".to_string(),
            ..token1.clone()
        };

        let result = store.create_token(&token2);
        assert!(matches!(result, Err(Error::TokenLookupCollision)));
        assert!(store.has_admin_token().unwrap());
    }

    #[test]
    fn test_second_active_homeroom_is_rejected_by_the_write() {
        let (_temp, store) = open();
        store.create_account(&account("t1", Role::Teacher)).unwrap();
        store.create_account(&account("t2", Role::Teacher)).unwrap();

        store.insert_assignment(&homeroom("t1", "3B")).unwrap();
        assert!(matches!(
            store.insert_assignment(&homeroom("t2", "3B")),
            Err(Error::DuplicateHomeroom(course)) if course == "3B"
        ));

        // An inactive homeroom does not hold the slot.
        let key = homeroom("t1", "3B").key();
        assert!(store.set_assignment_active("t1", &key, false).unwrap());
        store.insert_assignment(&homeroom("t2", "3B")).unwrap();

        // Reactivating the old one would make two.
        assert!(matches!(
            store.set_assignment_active("t1", &key, true),
            Err(Error::DuplicateHomeroom(_))
        ));
    }

    #[test]
    fn test_insert_reactivates_inactive_row() {
        let (_temp, store) = open();
        store.create_account(&account("t1", Role::Teacher)).unwrap();

        let math = subject("t1", "3B", "Math");
        store.insert_assignment(&math).unwrap();
        assert!(matches!(
            store.insert_assignment(&math),
            Err(Error::DuplicateAssignment)
        ));

        store.set_assignment_active("t1", &math.key(), false).unwrap();
        store.insert_assignment(&math).unwrap();

        let fetched = store.get_assignment("t1", &math.key()).unwrap().unwrap();
        assert!(fetched.active);
        assert_eq!(store.list_staff_assignments("t1").unwrap().len(), 1);
    }

    #[test]
    fn test_insert_for_unknown_staff_is_invalid_assignee() {
        let (_temp, store) = open();
        assert!(matches!(
            store.insert_assignment(&homeroom("ghost", "3B")),
            Err(Error::InvalidAssignee(_))
        ));
    }

    #[test]
    fn test_course_listing_uses_exact_course_range() {
        let (_temp, store) = open();
        store.create_account(&account("t1", Role::Teacher)).unwrap();
        store.create_account(&account("t2", Role::Teacher)).unwrap();

        store.insert_assignment(&homeroom("t1", "3B")).unwrap();
        store.insert_assignment(&subject("t2", "3B", "Math")).unwrap();
        store.insert_assignment(&subject("t1", "3B", "Art")).unwrap();
        store.insert_assignment(&homeroom("t2", "3BX")).unwrap();
        store.insert_assignment(&subject("t1", "3", "Math")).unwrap();

        let rows = store.list_course_assignments("3B").unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|a| a.course == "3B"));
        assert_eq!(rows[0].kind, AssignmentKind::Homeroom);
        assert_eq!(rows[1].subject.as_deref(), Some("Art"));
        assert_eq!(rows[2].subject.as_deref(), Some("Math"));
    }

    #[test]
    fn test_homeroom_label_only_touches_active_homeroom() {
        let (_temp, store) = open();
        store.create_account(&account("t1", Role::Teacher)).unwrap();

        assert!(!store.set_homeroom_label("3B", Some("Room 12")).unwrap());

        store.insert_assignment(&homeroom("t1", "3B")).unwrap();
        store.insert_assignment(&subject("t1", "3B", "Math")).unwrap();
        assert!(store.set_homeroom_label("3B", Some("Room 12")).unwrap());

        let rows = store.list_course_assignments("3B").unwrap();
        assert_eq!(rows[0].label.as_deref(), Some("Room 12"));
        assert_eq!(rows[1].label, None);
    }

    #[test]
    fn test_record_query_prefilter() {
        let (_temp, store) = open();
        store.create_account(&account("s1", Role::Student)).unwrap();
        store.create_account(&account("s2", Role::Student)).unwrap();

        for (student, course) in [("s1", "3B"), ("s2", "3B"), ("s2", "4A")] {
            store
                .create_enrollment(&Enrollment {
                    student_id: student.to_string(),
                    course: course.to_string(),
                    enrolled_at: Utc::now(),
                })
                .unwrap();
        }

        let all = store.list_enrollments(&RecordQuery::default()).unwrap();
        assert_eq!(all.len(), 3);

        let scoped = store
            .list_enrollments(&RecordQuery {
                courses: Some(vec!["4A".to_string()]),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].student_id, "s2");

        let combined = store
            .list_enrollments(&RecordQuery {
                course: Some("3B".to_string()),
                students: Some(vec!["s2".to_string()]),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(combined.len(), 1);

        let nothing = store
            .list_enrollments(&RecordQuery {
                courses: Some(Vec::new()),
                ..Default::default()
            })
            .unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_attendance_round_trips_date_and_status() {
        let (_temp, store) = open();
        store.create_account(&account("s1", Role::Student)).unwrap();

        let record = AttendanceRecord {
            id: "a1".to_string(),
            student_id: "s1".to_string(),
            course: "3B".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 9, 14).unwrap(),
            status: AttendanceStatus::Late,
            note: Some("bus".to_string()),
            recorded_by: "t1".to_string(),
            created_at: Utc::now(),
        };
        store.create_attendance(&record).unwrap();

        let rows = store.list_attendance(&RecordQuery::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, record.date);
        assert_eq!(rows[0].status, AttendanceStatus::Late);
        assert_eq!(rows[0].note.as_deref(), Some("bus"));
    }
}
