//! SQL schema for the Gia Phả SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.
//!
//! The marriage and parent-record rules are repeated here as hard
//! constraints: two writers that both passed the service-level checks cannot
//! both commit.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Read-only reference lists (birthplaces, occupations, ...).
CREATE TABLE IF NOT EXISTS lookups (
    id     INTEGER PRIMARY KEY,
    kind   TEXT NOT NULL,
    label  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS trees (
    tree_id     TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    founder_id  TEXT REFERENCES persons(person_id) DEFERRABLE INITIALLY DEFERRED,
    head_id     TEXT REFERENCES persons(person_id) DEFERRABLE INITIALLY DEFERRED,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS persons (
    person_id       TEXT PRIMARY KEY,
    full_name       TEXT NOT NULL,
    gender          TEXT NOT NULL CHECK (gender IN ('male', 'female', 'other')),
    born_at         TEXT NOT NULL,   -- RFC 3339 UTC
    address         TEXT,
    birthplace_id   INTEGER REFERENCES lookups(id),
    occupation_id   INTEGER REFERENCES lookups(id),
    generation      INTEGER NOT NULL CHECK (generation >= 0),
    tree_id         TEXT REFERENCES trees(tree_id),   -- NULL: not in any tree
    died_at         TEXT,                             -- NULL: living
    death_cause_id  INTEGER REFERENCES lookups(id),
    burial_site_id  INTEGER REFERENCES lookups(id),
    created_at      TEXT NOT NULL,
    CHECK (died_at IS NOT NULL OR (death_cause_id IS NULL AND burial_site_id IS NULL))
);

-- One parent record per child, progressively completed.
CREATE TABLE IF NOT EXISTS parent_child (
    child_id        TEXT PRIMARY KEY REFERENCES persons(person_id),
    father_id       TEXT REFERENCES persons(person_id),
    mother_id       TEXT REFERENCES persons(person_id),
    established_on  TEXT,            -- ISO 8601 date
    CHECK (father_id IS NOT NULL OR mother_id IS NOT NULL),
    CHECK (child_id != father_id AND child_id != mother_id)
);

CREATE TABLE IF NOT EXISTS marriages (
    person_a    TEXT NOT NULL REFERENCES persons(person_id),
    person_b    TEXT NOT NULL REFERENCES persons(person_id),
    start_date  TEXT NOT NULL,       -- ISO 8601 date
    end_date    TEXT,                -- NULL: ongoing
    PRIMARY KEY (person_a, person_b),
    CHECK (person_a != person_b),
    CHECK (end_date IS NULL OR end_date >= start_date)
);

-- At most one record per unordered pair.
CREATE UNIQUE INDEX IF NOT EXISTS marriages_pair_idx
    ON marriages (min(person_a, person_b), max(person_a, person_b));

-- At most one open marriage per person, on either side.
CREATE TRIGGER IF NOT EXISTS marriages_open_insert
BEFORE INSERT ON marriages
WHEN NEW.end_date IS NULL
BEGIN
    SELECT RAISE(ABORT, 'open_marriage:a')
    WHERE EXISTS (
        SELECT 1 FROM marriages
        WHERE end_date IS NULL
          AND (person_a = NEW.person_a OR person_b = NEW.person_a)
    );
    SELECT RAISE(ABORT, 'open_marriage:b')
    WHERE EXISTS (
        SELECT 1 FROM marriages
        WHERE end_date IS NULL
          AND (person_a = NEW.person_b OR person_b = NEW.person_b)
    );
END;

CREATE TRIGGER IF NOT EXISTS marriages_open_reopen
BEFORE UPDATE OF end_date ON marriages
WHEN NEW.end_date IS NULL AND OLD.end_date IS NOT NULL
BEGIN
    SELECT RAISE(ABORT, 'open_marriage:a')
    WHERE EXISTS (
        SELECT 1 FROM marriages
        WHERE end_date IS NULL
          AND NOT (person_a = OLD.person_a AND person_b = OLD.person_b)
          AND (person_a = NEW.person_a OR person_b = NEW.person_a)
    );
    SELECT RAISE(ABORT, 'open_marriage:b')
    WHERE EXISTS (
        SELECT 1 FROM marriages
        WHERE end_date IS NULL
          AND NOT (person_a = OLD.person_a AND person_b = OLD.person_b)
          AND (person_a = NEW.person_b OR person_b = NEW.person_b)
    );
END;

CREATE TABLE IF NOT EXISTS accounts (
    account_id  TEXT PRIMARY KEY,
    login       TEXT NOT NULL UNIQUE,
    person_id   TEXT UNIQUE REFERENCES persons(person_id),
    role        TEXT NOT NULL CHECK (role IN ('admin', 'owner', 'user')),
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS achievements (
    achievement_id  TEXT PRIMARY KEY,
    person_id       TEXT NOT NULL REFERENCES persons(person_id),
    type_id         INTEGER NOT NULL REFERENCES lookups(id),
    achieved_on     TEXT NOT NULL,
    description     TEXT,
    recorded_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS lookups_kind_idx          ON lookups(kind);
CREATE INDEX IF NOT EXISTS persons_tree_idx          ON persons(tree_id);
CREATE INDEX IF NOT EXISTS persons_name_idx          ON persons(full_name);
CREATE INDEX IF NOT EXISTS parent_child_father_idx   ON parent_child(father_id);
CREATE INDEX IF NOT EXISTS parent_child_mother_idx   ON parent_child(mother_id);
CREATE INDEX IF NOT EXISTS marriages_person_b_idx    ON marriages(person_b);
CREATE INDEX IF NOT EXISTS achievements_person_idx   ON achievements(person_id);

PRAGMA user_version = 1;
";
