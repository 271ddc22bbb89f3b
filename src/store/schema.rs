pub const SCHEMA: &str = r#"
-- Accounts form the staff directory and the identity source
CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('admin', 'supervisor', 'teacher', 'guardian', 'student')),
    active INTEGER NOT NULL DEFAULT 1,  -- inactive accounts cannot authenticate
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Tokens are auth credentials; non-admin tokens must belong to an account
CREATE TABLE IF NOT EXISTS tokens (
    id TEXT PRIMARY KEY,
    token_hash TEXT NOT NULL,          -- argon2id hash with embedded salt
    token_lookup TEXT NOT NULL,        -- first 8 chars of ID for fast lookup
    is_admin INTEGER NOT NULL DEFAULT 0,

    -- Account binding (NULL only for the bootstrap admin token)
    account_id TEXT REFERENCES accounts(id) ON DELETE CASCADE,

    -- Lifecycle
    created_at TEXT DEFAULT (datetime('now')),
    expires_at TEXT,            -- NULL = never
    last_used_at TEXT
);

-- Teacher to course assignments
CREATE TABLE IF NOT EXISTS assignments (
    staff_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    assignment_key TEXT NOT NULL,      -- <course>#homeroom | <course>#subject#<subject>
    course TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('homeroom', 'subject')),
    subject TEXT,                      -- NULL for homeroom
    label TEXT,                        -- homeroom only
    active INTEGER NOT NULL DEFAULT 1,
    assigned_at TEXT NOT NULL,
    PRIMARY KEY (staff_id, assignment_key),
    CHECK ((kind = 'homeroom' AND subject IS NULL) OR (kind = 'subject' AND subject IS NOT NULL))
);

-- Guardian to student relation
CREATE TABLE IF NOT EXISTS guardian_links (
    guardian_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    student_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    created_at TEXT DEFAULT (datetime('now')),
    PRIMARY KEY (guardian_id, student_id)
);

-- Roster
CREATE TABLE IF NOT EXISTS enrollments (
    student_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    course TEXT NOT NULL,
    enrolled_at TEXT DEFAULT (datetime('now')),
    PRIMARY KEY (student_id, course)
);

CREATE TABLE IF NOT EXISTS attendance (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    course TEXT NOT NULL,
    date TEXT NOT NULL,                -- YYYY-MM-DD
    status TEXT NOT NULL CHECK (status IN ('present', 'absent', 'late', 'excused')),
    note TEXT,
    recorded_by TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS grades (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    course TEXT NOT NULL,
    subject TEXT NOT NULL,
    assessment TEXT NOT NULL,
    score REAL NOT NULL,
    max_score REAL NOT NULL,
    recorded_by TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS materials (
    id TEXT PRIMARY KEY,
    course TEXT NOT NULL,
    subject TEXT,
    title TEXT NOT NULL,
    url TEXT,
    created_by TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Create indexes
CREATE UNIQUE INDEX IF NOT EXISTS idx_tokens_lookup ON tokens(token_lookup);
CREATE INDEX IF NOT EXISTS idx_tokens_account ON tokens(account_id);
CREATE INDEX IF NOT EXISTS idx_assignments_key ON assignments(assignment_key);
-- At most one active homeroom per course; the conditional write for homeroom creation
CREATE UNIQUE INDEX IF NOT EXISTS idx_assignments_active_homeroom
    ON assignments(course) WHERE kind = 'homeroom' AND active = 1;
CREATE INDEX IF NOT EXISTS idx_guardian_links_guardian ON guardian_links(guardian_id);
CREATE INDEX IF NOT EXISTS idx_enrollments_course ON enrollments(course);
CREATE INDEX IF NOT EXISTS idx_attendance_course ON attendance(course);
CREATE INDEX IF NOT EXISTS idx_attendance_student ON attendance(student_id);
CREATE INDEX IF NOT EXISTS idx_grades_course ON grades(course);
CREATE INDEX IF NOT EXISTS idx_grades_student ON grades(student_id);
CREATE INDEX IF NOT EXISTS idx_materials_course ON materials(course);
"#;
