//! Server-rendered pages. Every piece of user text goes through [`escape`].

use quill_types::models::{Account, AuthoredBlog, AuthoredComment, Blog};

use crate::session::SessionUser;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, user: Option<&SessionUser>, body: &str) -> String {
    let nav = match user {
        Some(user) => format!(
            r#"<nav><a href="/">Home</a> | <a href="/authors/{id}">{name}</a> | <a href="/logout">Log out</a></nav>"#,
            id = user.id,
            name = escape(&user.username),
        ),
        None => r#"<nav><a href="/login">Log in</a> | <a href="/signup">Sign up</a></nav>"#.to_string(),
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{nav}\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn notice(message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<p class="notice">{}</p>"#, escape(m)))
        .unwrap_or_default()
}

pub fn login_page(message: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
{notice}
<form method="post" action="/login">
  <label>Username <input name="username"></label>
  <label>Password <input name="password" type="password"></label>
  <button type="submit">Log in</button>
</form>"#,
        notice = notice(message),
    );
    layout("Log in", None, &body)
}

pub fn signup_page(message: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Sign up</h1>
{notice}
<form method="post" action="/signup">
  <label>Username <input name="username"></label>
  <label>Password <input name="password" type="password"></label>
  <button type="submit">Create account</button>
</form>"#,
        notice = notice(message),
    );
    layout("Sign up", None, &body)
}

pub fn logout_page() -> String {
    layout("Logged out", None, "<h1>You have been logged out.</h1>")
}

fn blog_summary(blog: &Blog, username: &str) -> String {
    format!(
        r#"<article>
  <h2><a href="/blogs/{id}">{title}</a></h2>
  <p class="meta">by <a href="/authors/{author_id}">{username}</a> at {time}</p>
  <p>{content}</p>
</article>"#,
        id = blog.id,
        author_id = blog.author_id,
        title = escape(&blog.title),
        username = escape(username),
        time = escape(&blog.time),
        content = escape(&blog.content),
    )
}

/// Home page: every blog, newest first, with a form for a new post.
pub fn home_page(user: &SessionUser, blogs: &[AuthoredBlog]) -> String {
    let posts: String = blogs
        .iter()
        .map(|b| blog_summary(&b.blog, &b.username))
        .collect();

    let body = format!(
        r#"<h1>Blogs</h1>
<form method="post" action="/">
  <input name="title" placeholder="Title">
  <textarea name="content" placeholder="What do you want to say?"></textarea>
  <button type="submit">Post</button>
</form>
{posts}"#
    );
    layout("Blogs", Some(user), &body)
}

pub fn blog_page(user: &SessionUser, blog: &AuthoredBlog, comments: &[AuthoredComment]) -> String {
    let comments: String = comments
        .iter()
        .map(|c| {
            format!(
                r#"<li><strong>{username}</strong> ({time}): {content}</li>"#,
                username = escape(&c.username),
                time = escape(&c.comment.time),
                content = escape(&c.comment.content),
            )
        })
        .collect();

    let body = format!(
        r#"{summary}
<h3>Comments</h3>
<ul>{comments}</ul>
<form method="post" action="/blogs/{id}">
  <textarea name="content"></textarea>
  <button type="submit">Comment</button>
</form>"#,
        summary = blog_summary(&blog.blog, &blog.username),
        id = blog.blog.id,
    );
    layout(&blog.blog.title, Some(user), &body)
}

/// One author's blogs, newest first, plus links to every author.
pub fn author_page(
    user: &SessionUser,
    author: &Account,
    blogs: &[Blog],
    authors: &[Account],
) -> String {
    let posts: String = blogs
        .iter()
        .map(|b| blog_summary(b, &author.username))
        .collect();
    let links: String = authors
        .iter()
        .map(|a| format!(r#"<li><a href="/authors/{}">{}</a></li>"#, a.id, escape(&a.username)))
        .collect();

    let body = format!(
        r#"<h1>{name}</h1>
{posts}
<h3>Authors</h3>
<ul>{links}</ul>"#,
        name = escape(&author.username),
    );
    layout(&author.username, Some(user), &body)
}
