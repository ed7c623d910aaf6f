use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").unwrap();
    static ref ACTIVE_MARKUP: Regex =
        Regex::new(r"(?is)<\s*/?\s*(script|style|iframe|object|embed)[^>]*>").unwrap();
}

/// Strip terminal escape sequences, active markup and stray control
/// characters from a reply, then trim. Running it twice yields the same
/// string.
pub fn normalize_reply(reply: &str) -> String {
    let stripped = ANSI_ESCAPE.replace_all(reply, "");
    let stripped = ACTIVE_MARKUP.replace_all(&stripped, "");

    stripped
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect::<String>()
        .trim()
        .to_string()
}
