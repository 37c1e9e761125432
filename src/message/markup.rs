use crate::config::ParseMode;

const MARKDOWN_SPECIAL: &[char] = &['_', '*', '[', '`'];

const MARKDOWN_V2_SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escape the characters Telegram reserves in `mode`. Without a mode the
/// text is returned unchanged.
pub fn escape_markup(text: &str, mode: Option<ParseMode>) -> String {
    match mode {
        Some(ParseMode::Markdown) => backslash_escape(text, MARKDOWN_SPECIAL),
        Some(ParseMode::MarkdownV2) => backslash_escape(text, MARKDOWN_V2_SPECIAL),
        Some(ParseMode::Html) => escape_stray_lt(text),
        None => text.to_string(),
    }
}

fn backslash_escape(text: &str, special: &[char]) -> String {
    let mut result = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if special.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

/// Only a `<` that cannot open a tag is touched: one followed by anything
/// but a lowercase ASCII letter or `/`. The following character is consumed
/// with it, so in `<<a` only the first `<` is rewritten.
fn escape_stray_lt(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '<' {
            result.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some(next) if !(next.is_ascii_lowercase() || next == '/') => {
                result.push_str("&lt;");
                result.push(next);
                chars.next();
            }
            _ => result.push(ch),
        }
    }
    result
}
