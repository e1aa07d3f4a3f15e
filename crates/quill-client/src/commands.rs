pub const USAGE: &str = "Commands:
    B: post a blog
    C <id>: post a comment on the blog with given ID
    Q: quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PostBlog,
    PostComment { blog_id: i64 },
    Quit,
}

/// Parse one line typed at the prompt. `None` means the line is not a
/// command and the caller should show [`USAGE`].
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    let mut parts = line.split_whitespace();

    let command = match parts.next()? {
        "B" => Command::PostBlog,
        "Q" => Command::Quit,
        "C" => {
            let blog_id = parts.next()?.parse().ok()?;
            Command::PostComment { blog_id }
        }
        _ => return None,
    };

    if parts.next().is_some() {
        return None;
    }
    Some(command)
}
