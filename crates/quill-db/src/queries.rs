use quill_types::models::{Account, AuthoredBlog, AuthoredComment, Blog, Comment};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use crate::password::{self, Credential};
use crate::{Database, Result, StoreError, Table, current_time};

const BLOG_COLUMNS: &str = "b.id, b.title, b.content, b.author_id, b.time";
const COMMENT_COLUMNS: &str = "c.id, c.blog_id, c.author_id, c.content, c.time";

impl Database {
    // -- Accounts --

    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, username FROM account ORDER BY id")?;
            let rows = stmt
                .query_map([], account_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_account(&self, account_id: i64) -> Result<Option<Account>> {
        self.with_conn(|conn| query_account(conn, account_id))
    }

    pub fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, username FROM account WHERE username = ?1",
                    [username],
                    account_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Stored credentials for `username`, for the caller to verify a password
    /// against.
    pub fn credentials_for(&self, username: &str) -> Result<Option<Credential>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, username, password FROM account WHERE username = ?1",
                    [username],
                    |row| Ok((account_from_row(row)?, row.get::<_, String>(2)?)),
                )
                .optional()?;
            Ok(row.map(|(account, hash)| Credential::new(account, hash)))
        })
    }

    pub fn create_account(&self, username: &str, password: &str) -> Result<Account> {
        // Hash before taking the connection lock; Argon2 is deliberately slow.
        let password_hash = password::hash(password)?;

        self.with_tx(|tx| {
            tx.execute(
                "INSERT INTO account (username, password) VALUES (?1, ?2)",
                (username, &password_hash),
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateUsername(username.to_string())
                } else {
                    e.into()
                }
            })?;

            Ok(Account {
                id: tx.last_insert_rowid(),
                username: username.to_string(),
            })
        })
    }

    pub fn update_password(&self, account_id: i64, new_password: &str) -> Result<Account> {
        let password_hash = password::hash(new_password)?;

        self.with_tx(|tx| {
            let changed = tx.execute(
                "UPDATE account SET password = ?1 WHERE id = ?2",
                params![password_hash, account_id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound { table: Table::Account, id: account_id });
            }

            query_account(tx, account_id)?
                .ok_or(StoreError::NotFound { table: Table::Account, id: account_id })
        })
    }

    /// Delete an account with everything it owns: comments on its blogs, its
    /// own comments anywhere, its blogs, then the account row. Missing ids are
    /// a no-op.
    pub fn delete_account(&self, account_id: i64) -> Result<()> {
        self.with_tx(|tx| {
            let on_blogs = tx.execute(
                "DELETE FROM comment WHERE blog_id IN (SELECT id FROM blog WHERE author_id = ?1)",
                [account_id],
            )?;
            let authored = tx.execute("DELETE FROM comment WHERE author_id = ?1", [account_id])?;
            let blogs = tx.execute("DELETE FROM blog WHERE author_id = ?1", [account_id])?;
            tx.execute("DELETE FROM account WHERE id = ?1", [account_id])?;

            debug!(
                account_id,
                blogs,
                comments = on_blogs + authored,
                "account deleted"
            );
            Ok(())
        })
    }

    // -- Blogs --

    pub fn create_blog(&self, title: &str, content: &str, author_id: i64) -> Result<Blog> {
        self.with_tx(|tx| {
            if !Table::Account.contains(tx, author_id)? {
                return Err(StoreError::AuthorNotFound(author_id));
            }

            let time = current_time();
            tx.execute(
                "INSERT INTO blog (title, content, author_id, time) VALUES (?1, ?2, ?3, ?4)",
                params![title, content, author_id, time],
            )?;

            Ok(Blog {
                id: tx.last_insert_rowid(),
                title: title.to_string(),
                content: content.to_string(),
                author_id,
                time,
            })
        })
    }

    /// Replace whichever of title/content is given. The timestamp is refreshed
    /// even when both are `None`.
    pub fn update_blog(
        &self,
        blog_id: i64,
        new_title: Option<&str>,
        new_content: Option<&str>,
    ) -> Result<Blog> {
        self.with_tx(|tx| {
            let changed = tx.execute(
                "UPDATE blog
                 SET title = COALESCE(?1, title), content = COALESCE(?2, content), time = ?3
                 WHERE id = ?4",
                params![new_title, new_content, current_time(), blog_id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound { table: Table::Blog, id: blog_id });
            }

            query_blog(tx, blog_id)?.ok_or(StoreError::NotFound { table: Table::Blog, id: blog_id })
        })
    }

    /// Delete a blog and its comments. Missing ids are a no-op.
    pub fn delete_blog(&self, blog_id: i64) -> Result<()> {
        self.with_tx(|tx| {
            let comments = tx.execute("DELETE FROM comment WHERE blog_id = ?1", [blog_id])?;
            tx.execute("DELETE FROM blog WHERE id = ?1", [blog_id])?;
            debug!(blog_id, comments, "blog deleted");
            Ok(())
        })
    }

    pub fn get_blog(&self, blog_id: i64) -> Result<Option<AuthoredBlog>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {BLOG_COLUMNS}, a.username
                 FROM blog b JOIN account a ON a.id = b.author_id
                 WHERE b.id = ?1"
            );
            let row = conn.query_row(&sql, [blog_id], authored_blog_from_row).optional()?;
            Ok(row)
        })
    }

    pub fn list_blogs_by_author(&self, author_id: i64) -> Result<Vec<Blog>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {BLOG_COLUMNS} FROM blog b WHERE b.author_id = ?1 ORDER BY b.id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([author_id], blog_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_all_blogs(&self) -> Result<Vec<AuthoredBlog>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {BLOG_COLUMNS}, a.username
                 FROM blog b JOIN account a ON a.id = b.author_id
                 ORDER BY b.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], authored_blog_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Comments --

    /// The author is checked before the blog, so a comment with two bad
    /// references reports `AuthorNotFound`.
    pub fn create_comment(&self, blog_id: i64, author_id: i64, content: &str) -> Result<Comment> {
        self.with_tx(|tx| {
            if !Table::Account.contains(tx, author_id)? {
                return Err(StoreError::AuthorNotFound(author_id));
            }
            if !Table::Blog.contains(tx, blog_id)? {
                return Err(StoreError::BlogNotFound(blog_id));
            }

            let time = current_time();
            tx.execute(
                "INSERT INTO comment (blog_id, author_id, content, time) VALUES (?1, ?2, ?3, ?4)",
                params![blog_id, author_id, content, time],
            )?;

            Ok(Comment {
                id: tx.last_insert_rowid(),
                blog_id,
                author_id,
                content: content.to_string(),
                time,
            })
        })
    }

    pub fn update_comment(&self, comment_id: i64, new_content: Option<&str>) -> Result<Comment> {
        self.with_tx(|tx| {
            let changed = tx.execute(
                "UPDATE comment SET content = COALESCE(?1, content), time = ?2 WHERE id = ?3",
                params![new_content, current_time(), comment_id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound { table: Table::Comment, id: comment_id });
            }

            query_comment(tx, comment_id)?
                .ok_or(StoreError::NotFound { table: Table::Comment, id: comment_id })
        })
    }

    pub fn delete_comment(&self, comment_id: i64) -> Result<()> {
        self.with_tx(|tx| {
            tx.execute("DELETE FROM comment WHERE id = ?1", [comment_id])?;
            Ok(())
        })
    }

    pub fn get_comment(&self, comment_id: i64) -> Result<Option<AuthoredComment>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {COMMENT_COLUMNS}, a.username
                 FROM comment c JOIN account a ON a.id = c.author_id
                 WHERE c.id = ?1"
            );
            let row = conn.query_row(&sql, [comment_id], authored_comment_from_row).optional()?;
            Ok(row)
        })
    }

    pub fn list_all_comments(&self) -> Result<Vec<AuthoredComment>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {COMMENT_COLUMNS}, a.username
                 FROM comment c JOIN account a ON a.id = c.author_id
                 ORDER BY c.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], authored_comment_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_comments_for_blog(&self, blog_id: i64) -> Result<Vec<AuthoredComment>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {COMMENT_COLUMNS}, a.username
                 FROM comment c JOIN account a ON a.id = c.author_id
                 WHERE c.blog_id = ?1
                 ORDER BY c.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([blog_id], authored_comment_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_account(conn: &Connection, account_id: i64) -> Result<Option<Account>> {
    let row = conn
        .query_row(
            "SELECT id, username FROM account WHERE id = ?1",
            [account_id],
            account_from_row,
        )
        .optional()?;
    Ok(row)
}

fn query_blog(conn: &Connection, blog_id: i64) -> Result<Option<Blog>> {
    let sql = format!("SELECT {BLOG_COLUMNS} FROM blog b WHERE b.id = ?1");
    let row = conn.query_row(&sql, [blog_id], blog_from_row).optional()?;
    Ok(row)
}

fn query_comment(conn: &Connection, comment_id: i64) -> Result<Option<Comment>> {
    let sql = format!("SELECT {COMMENT_COLUMNS} FROM comment c WHERE c.id = ?1");
    let row = conn.query_row(&sql, [comment_id], comment_from_row).optional()?;
    Ok(row)
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        username: row.get(1)?,
    })
}

fn blog_from_row(row: &Row<'_>) -> rusqlite::Result<Blog> {
    Ok(Blog {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author_id: row.get(3)?,
        time: row.get(4)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        blog_id: row.get(1)?,
        author_id: row.get(2)?,
        content: row.get(3)?,
        time: row.get(4)?,
    })
}

fn authored_blog_from_row(row: &Row<'_>) -> rusqlite::Result<AuthoredBlog> {
    Ok(AuthoredBlog {
        blog: blog_from_row(row)?,
        username: row.get(5)?,
    })
}

fn authored_comment_from_row(row: &Row<'_>) -> rusqlite::Result<AuthoredComment> {
    Ok(AuthoredComment {
        comment: comment_from_row(row)?,
        username: row.get(5)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
