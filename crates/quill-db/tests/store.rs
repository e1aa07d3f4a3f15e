use std::thread::sleep;
use std::time::Duration;

use quill_db::{Database, StoreError, Table};

fn db() -> Database {
    Database::open_in_memory().expect("in-memory database")
}

#[test]
fn empty_database_has_no_rows() {
    let db = db();
    assert!(db.list_accounts().unwrap().is_empty());
    assert!(db.list_all_blogs().unwrap().is_empty());
    assert!(db.list_all_comments().unwrap().is_empty());
}

#[test]
fn blog_and_comment_scenario() {
    let db = db();

    let account = db.create_account("htran20", "haha1232").unwrap();
    assert_eq!(account.id, 1);
    assert_eq!(account.username, "htran20");

    let blog = db
        .create_blog("Hello World", "What do you want to say?", 1)
        .unwrap();
    assert_eq!(blog.id, 1);
    assert_eq!(blog.title, "Hello World");
    assert_eq!(blog.content, "What do you want to say?");
    assert_eq!(blog.author_id, 1);
    assert!(!blog.time.is_empty());

    let comment = db.create_comment(1, 1, "LOL").unwrap();
    assert_eq!(comment.id, 1);
    assert_eq!(comment.blog_id, 1);
    assert_eq!(comment.author_id, 1);
    assert_eq!(comment.content, "LOL");
    assert!(!comment.time.is_empty());

    db.delete_blog(1).unwrap();
    assert!(db.get_comment(1).unwrap().is_none());
    assert!(db.get_blog(1).unwrap().is_none());
}

#[test]
fn get_blog_joins_author_username() {
    let db = db();
    let author = db.create_account("htran20", "haha1232").unwrap();
    let created = db.create_blog("Avenger 4", "Iron man still alive", author.id).unwrap();

    let fetched = db.get_blog(created.id).unwrap().expect("blog exists");
    assert_eq!(fetched.blog, created);
    assert_eq!(fetched.username, "htran20");
}

#[test]
fn create_blog_rejects_unknown_author() {
    let db = db();
    let err = db.create_blog("t", "c", 42).unwrap_err();
    assert!(matches!(err, StoreError::AuthorNotFound(42)));
    assert!(db.list_all_blogs().unwrap().is_empty());
}

#[test]
fn create_comment_checks_author_before_blog() {
    let db = db();

    let err = db.create_comment(7, 9, "hi").unwrap_err();
    assert!(matches!(err, StoreError::AuthorNotFound(9)));

    let author = db.create_account("tdinh20", "pw").unwrap();
    let err = db.create_comment(7, author.id, "hi").unwrap_err();
    assert!(matches!(err, StoreError::BlogNotFound(7)));
}

#[test]
fn update_blog_with_only_content_keeps_title() {
    let db = db();
    let author = db.create_account("htran20", "haha1232").unwrap();
    let blog = db.create_blog("Avenger: Infinity war", "Thanos", author.id).unwrap();

    let updated = db.update_blog(blog.id, None, Some("x")).unwrap();
    assert_eq!(updated.title, "Avenger: Infinity war");
    assert_eq!(updated.content, "x");
    assert_eq!(updated.author_id, author.id);
    assert!(!updated.time.is_empty());
}

#[test]
fn update_blog_with_both_fields() {
    let db = db();
    let author = db.create_account("htran20", "haha1232").unwrap();
    let blog = db.create_blog("old", "old", author.id).unwrap();

    let updated = db.update_blog(blog.id, Some("Avenger 4"), Some("Iron man still alive")).unwrap();
    assert_eq!(updated.title, "Avenger 4");
    assert_eq!(updated.content, "Iron man still alive");
}

#[test]
fn updates_refresh_the_timestamp() {
    let db = db();
    let author = db.create_account("htran20", "haha1232").unwrap();
    let blog = db.create_blog("Avenger 4", "Thanos", author.id).unwrap();
    let comment = db.create_comment(blog.id, author.id, "LOL").unwrap();

    // Stamps have one-second granularity.
    sleep(Duration::from_millis(1100));

    let updated = db.update_blog(blog.id, Some("Avenger 4"), None).unwrap();
    assert_ne!(updated.time, blog.time);

    let updated = db.update_comment(comment.id, None).unwrap();
    assert_ne!(updated.time, comment.time);
    assert_eq!(updated.content, "LOL");
}

#[test]
fn update_missing_rows_report_not_found() {
    let db = db();

    let err = db.update_blog(5, Some("t"), None).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { table: Table::Blog, id: 5 }));

    let err = db.update_comment(6, Some("c")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { table: Table::Comment, id: 6 }));

    let err = db.update_password(7, "pw").unwrap_err();
    assert!(matches!(err, StoreError::NotFound { table: Table::Account, id: 7 }));
}

#[test]
fn update_comment_without_content_only_touches_time() {
    let db = db();
    let author = db.create_account("htran20", "haha1232").unwrap();
    let blog = db.create_blog("t", "c", author.id).unwrap();
    let comment = db.create_comment(blog.id, author.id, "This blog is nice").unwrap();

    let unchanged = db.update_comment(comment.id, None).unwrap();
    assert_eq!(unchanged.content, "This blog is nice");

    let changed = db.update_comment(comment.id, Some("Iron man still alive")).unwrap();
    assert_eq!(changed.content, "Iron man still alive");
    assert_eq!(changed.blog_id, blog.id);
}

#[test]
fn delete_blog_twice_is_not_an_error() {
    let db = db();
    let author = db.create_account("htran20", "haha1232").unwrap();
    let blog = db.create_blog("t", "c", author.id).unwrap();

    db.delete_blog(blog.id).unwrap();
    assert!(db.get_blog(blog.id).unwrap().is_none());
    db.delete_blog(blog.id).unwrap();
    assert!(db.get_blog(blog.id).unwrap().is_none());
}

#[test]
fn delete_comment_is_idempotent_and_leaves_blog() {
    let db = db();
    let author = db.create_account("htran20", "haha1232").unwrap();
    let blog = db.create_blog("t", "c", author.id).unwrap();
    let comment = db.create_comment(blog.id, author.id, "LOL").unwrap();

    db.delete_comment(comment.id).unwrap();
    db.delete_comment(comment.id).unwrap();
    assert!(db.get_comment(comment.id).unwrap().is_none());
    assert!(db.get_blog(blog.id).unwrap().is_some());
}

#[test]
fn delete_account_cascades_and_spares_others() {
    let db = db();
    let a = db.create_account("htran20", "haha1232").unwrap();
    let other = db.create_account("tdinh20", "pw").unwrap();

    let b = db.create_blog("mine", "content", a.id).unwrap();
    let other_blog = db.create_blog("theirs", "content", other.id).unwrap();

    let c = db.create_comment(b.id, a.id, "self comment").unwrap();
    let d = db.create_comment(other_blog.id, a.id, "comment elsewhere").unwrap();
    let e = db.create_comment(b.id, other.id, "visitor comment").unwrap();
    let f = db.create_comment(other_blog.id, other.id, "their own").unwrap();

    db.delete_account(a.id).unwrap();

    assert!(db.get_account(a.id).unwrap().is_none());
    assert!(db.get_blog(b.id).unwrap().is_none());
    assert!(db.get_comment(c.id).unwrap().is_none());
    assert!(db.get_comment(d.id).unwrap().is_none());
    // Comments on a deleted blog go too, whoever wrote them.
    assert!(db.get_comment(e.id).unwrap().is_none());

    assert_eq!(db.get_account(other.id).unwrap(), Some(other.clone()));
    assert!(db.get_blog(other_blog.id).unwrap().is_some());
    assert!(db.get_comment(f.id).unwrap().is_some());
}

#[test]
fn failed_account_delete_rolls_back_the_cascade() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blog.sqlite");
    let db = Database::open(&path).unwrap();

    let account = db.create_account("htran20", "haha1232").unwrap();
    let blog = db.create_blog("t", "c", account.id).unwrap();
    let comment = db.create_comment(blog.id, account.id, "LOL").unwrap();

    // Make the last step of the cascade fail.
    let side = rusqlite::Connection::open(&path).unwrap();
    side.execute_batch(
        "CREATE TRIGGER keep_accounts BEFORE DELETE ON account
         BEGIN SELECT RAISE(ABORT, 'accounts are permanent'); END;",
    )
    .unwrap();
    drop(side);

    assert!(db.delete_account(account.id).is_err());

    assert!(db.get_account(account.id).unwrap().is_some());
    assert!(db.get_blog(blog.id).unwrap().is_some());
    assert!(db.get_comment(comment.id).unwrap().is_some());
    assert_eq!(db.list_comments_for_blog(blog.id).unwrap().len(), 1);
}

#[test]
fn delete_missing_account_is_a_noop() {
    let db = db();
    let kept = db.create_account("htran20", "haha1232").unwrap();
    db.delete_account(99).unwrap();
    assert_eq!(db.list_accounts().unwrap(), vec![kept]);
}

#[test]
fn duplicate_username_is_rejected() {
    let db = db();
    let first = db.create_account("htran20", "haha1232").unwrap();

    let err = db.create_account("htran20", "other").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateUsername(ref name) if name == "htran20"));

    assert_eq!(db.list_accounts().unwrap(), vec![first.clone()]);
    let cred = db.credentials_for("htran20").unwrap().unwrap();
    assert!(cred.verify("haha1232"));
}

#[test]
fn update_password_rehashes() {
    let db = db();
    let account = db.create_account("htran20", "haha1232").unwrap();

    let updated = db.update_password(account.id, "123hai").unwrap();
    assert_eq!(updated, account);

    let cred = db.credentials_for("htran20").unwrap().unwrap();
    assert!(cred.verify("123hai"));
    assert!(!cred.verify("haha1232"));
    assert!(!cred.needs_upgrade());
}

#[test]
fn credentials_for_unknown_username_is_none() {
    let db = db();
    assert!(db.credentials_for("nobody").unwrap().is_none());
}

#[test]
fn list_blogs_by_author_filters() {
    let db = db();
    let a = db.create_account("a", "pw").unwrap();
    let b = db.create_account("b", "pw").unwrap();
    db.create_blog("a1", "c", a.id).unwrap();
    db.create_blog("b1", "c", b.id).unwrap();
    db.create_blog("a2", "c", a.id).unwrap();

    let titles: Vec<_> = db
        .list_blogs_by_author(a.id)
        .unwrap()
        .into_iter()
        .map(|blog| blog.title)
        .collect();
    assert_eq!(titles, vec!["a1", "a2"]);

    let all = db.list_all_blogs().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[1].username, "b");
}

#[test]
fn list_comments_for_blog_joins_usernames() {
    let db = db();
    let a = db.create_account("a", "pw").unwrap();
    let b = db.create_account("b", "pw").unwrap();
    let blog = db.create_blog("t", "c", a.id).unwrap();
    let other = db.create_blog("t2", "c", a.id).unwrap();
    db.create_comment(blog.id, b.id, "first").unwrap();
    db.create_comment(other.id, a.id, "elsewhere").unwrap();
    db.create_comment(blog.id, a.id, "second").unwrap();

    let comments = db.list_comments_for_blog(blog.id).unwrap();
    let seen: Vec<_> = comments
        .iter()
        .map(|c| (c.comment.content.as_str(), c.username.as_str()))
        .collect();
    assert_eq!(seen, vec![("first", "b"), ("second", "a")]);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let db = db();
    let first = db.create_account("a", "pw").unwrap();
    db.delete_account(first.id).unwrap();
    let second = db.create_account("b", "pw").unwrap();
    assert!(second.id > first.id);
}

#[test]
fn init_db_wipes_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blog.sqlite");

    {
        let db = Database::open(&path).unwrap();
        let account = db.create_account("htran20", "haha1232").unwrap();
        db.create_blog("t", "c", account.id).unwrap();
    }

    let db = Database::open(&path).unwrap();
    assert_eq!(db.list_accounts().unwrap().len(), 1, "reopening keeps data");

    db.init_db().unwrap();
    assert!(db.list_accounts().unwrap().is_empty());
    assert!(db.list_all_blogs().unwrap().is_empty());

    let fresh = db.create_account("htran20", "haha1232").unwrap();
    assert_eq!(fresh.id, 1);
}

#[test]
fn failed_init_db_leaves_database_usable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blog.sqlite");
    let db = Database::open(&path).unwrap();
    let account = db.create_account("htran20", "haha1232").unwrap();

    // A view named like a table makes `DROP TABLE blog` fail halfway through.
    let side = rusqlite::Connection::open(&path).unwrap();
    side.execute_batch(
        "DROP TABLE comment;
         DROP TABLE blog;
         CREATE VIEW blog AS SELECT 1 AS id;",
    )
    .unwrap();
    drop(side);

    assert!(db.init_db().is_err());

    // No transaction is left open and nothing was dropped.
    assert_eq!(db.list_accounts().unwrap(), vec![account.clone()]);
    db.update_password(account.id, "123hai").unwrap();
    db.create_account("tdinh20", "secret").unwrap();
}
