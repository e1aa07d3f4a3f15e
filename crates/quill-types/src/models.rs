use serde::{Deserialize, Serialize};

/// Public view of an account. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub blog_id: i64,
    pub author_id: i64,
    pub content: String,
    pub time: String,
}

/// A blog joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredBlog {
    #[serde(flatten)]
    pub blog: Blog,
    pub username: String,
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authored_blog_serializes_flat() {
        let blog = AuthoredBlog {
            blog: Blog {
                id: 1,
                title: "Hello World".into(),
                content: "What do you want to say?".into(),
                author_id: 1,
                time: "Mon Apr 30 00:21:19 2018".into(),
            },
            username: "htran20".into(),
        };

        let json = serde_json::to_value(&blog).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Hello World");
        assert_eq!(json["username"], "htran20");
        assert!(json.get("blog").is_none());
    }

    #[test]
    fn account_has_no_password_field() {
        let json = serde_json::to_value(Account { id: 3, username: "tdinh20".into() }).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["id".to_string(), "username".to_string()]);
    }
}
