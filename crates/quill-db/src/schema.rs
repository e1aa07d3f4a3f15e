use std::fmt;

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::Result;

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS account (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        username    TEXT NOT NULL UNIQUE,
        password    TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS blog (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT NOT NULL,
        content     TEXT NOT NULL,
        author_id   INTEGER NOT NULL REFERENCES account(id),
        time        TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS comment (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        blog_id     INTEGER NOT NULL REFERENCES blog(id),
        author_id   INTEGER NOT NULL REFERENCES account(id),
        content     TEXT NOT NULL,
        time        TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_blog_author ON blog(author_id);
    CREATE INDEX IF NOT EXISTS idx_comment_blog ON comment(blog_id);
    CREATE INDEX IF NOT EXISTS idx_comment_author ON comment(author_id);
";

// Children first so the implicit DELETE of each DROP never trips a foreign key.
const DROP_TABLES: &str = "
    DROP TABLE IF EXISTS comment;
    DROP TABLE IF EXISTS blog;
    DROP TABLE IF EXISTS account;
";

/// Create any missing tables. Never touches existing rows.
pub fn ensure(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

/// Drop and recreate all tables. Run inside a transaction so a failure
/// leaves the old schema in place.
pub fn reset(conn: &Connection) -> Result<()> {
    conn.execute_batch(DROP_TABLES)?;
    conn.execute_batch(CREATE_TABLES)?;
    info!("Schema dropped and recreated");
    Ok(())
}

/// The closed set of tables. Query text is chosen from this enum, never
/// built from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Account,
    Blog,
    Comment,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Account => "account",
            Table::Blog => "blog",
            Table::Comment => "comment",
        }
    }

    fn exists_sql(self) -> &'static str {
        match self {
            Table::Account => "SELECT 1 FROM account WHERE id = ?1",
            Table::Blog => "SELECT 1 FROM blog WHERE id = ?1",
            Table::Comment => "SELECT 1 FROM comment WHERE id = ?1",
        }
    }

    pub(crate) fn contains(self, conn: &Connection, id: i64) -> Result<bool> {
        let found = conn
            .query_row(self.exists_sql(), [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
