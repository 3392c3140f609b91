//! SQL text helpers.

/// Quote `value` as a standard SQL string literal.
pub fn sql_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

/// Collapse `value` to a single line so it can sit inside a `--` comment.
pub fn comment_text(value: &str) -> String {
    value
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comment out every line of `statement`, each prefixed with `indent`.
///
/// Multi-line literals stay fully inside the comment. Carriage returns are
/// treated as line breaks, as PostgreSQL ends a `--` comment on either.
pub fn comment_out(statement: &str, indent: &str) -> String {
    let normalized = statement.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::new();
    for line in normalized.split('\n') {
        out.push_str(indent);
        out.push_str("-- ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Pick a dollar-quote delimiter that does not occur in `body`.
///
/// Plain `$$` is used whenever possible.
pub fn dollar_quote_tag(body: &str) -> String {
    if !body.contains("$$") {
        return "$$".to_string();
    }
    let mut index = 1usize;
    loop {
        let tag = format!("$r{index}$");
        if !body.contains(&tag) {
            return tag;
        }
        index += 1;
    }
}
