//! Telegram HTML Sanitizer
//!
//! Turns model-authored pseudo-HTML into markup Telegram accepts with
//! `parse_mode: HTML`:
//!
//! 1. Tags outside [`ALLOWED_TAGS`] are removed, their inner text kept.
//! 2. The remaining tags are balanced with an explicit stack. Closing an
//!    outer tag force-closes everything opened inside it, orphan closing
//!    tags are dropped and unclosed tags are closed at the end.
//!
//! Text is escaped for `&`, `<` and `>`, leaving existing character
//! references (`&amp;`, `&lt;`, `&#39;`, ...) alone so the transform is
//! idempotent.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::constants::telegram::ALLOWED_TAGS;

/// Opening or closing tag; group 1 is the name, group 2 the attributes
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?([a-zA-Z][a-zA-Z0-9-]*)((?:\s+[^>]*)?)\s*>").expect("tag pattern is valid")
});

/// Character references Telegram understands: numeric ones and the four named ones
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|amp|lt|gt|quot);").expect("entity pattern is valid")
});

fn is_allowed(name: &str) -> bool {
    ALLOWED_TAGS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(name))
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Open { name: String, raw: &'a str },
    Close { name: String },
    Text(&'a str),
}

/// Sanitize model output for Telegram's HTML parse mode.
pub fn sanitize_telegram_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let allowed_only = TAG.replace_all(html, |caps: &Captures<'_>| {
        if is_allowed(&caps[1]) {
            caps[0].to_string()
        } else {
            String::new()
        }
    });

    let mut stack: Vec<String> = Vec::new();
    let mut output = String::with_capacity(allowed_only.len());

    for token in tokenize(&allowed_only) {
        match token {
            Token::Open { name, raw } => {
                if is_allowed(&name) {
                    output.push_str(raw);
                    stack.push(name);
                }
            }
            Token::Close { name } => {
                let Some(depth) = stack.iter().rposition(|open| *open == name) else {
                    continue;
                };
                for inner in stack.drain(depth..).rev() {
                    push_close(&mut output, &inner);
                }
            }
            Token::Text(text) => output.push_str(&escape_text(text)),
        }
    }

    for open in stack.into_iter().rev() {
        push_close(&mut output, &open);
    }

    output
}

fn push_close(output: &mut String, name: &str) {
    output.push_str("</");
    output.push_str(name);
    output.push('>');
}

fn tokenize<'a>(input: &'a str) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in TAG.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            tokens.push(Token::Text(&input[last..whole.start()]));
        }
        last = whole.end();

        let raw = whole.as_str();
        let name = caps[1].to_ascii_lowercase();
        let attrs = caps.get(2).map_or("", |m| m.as_str());

        if raw.starts_with("</") {
            // `</b foo>` is not a closing tag
            if attrs.trim().is_empty() {
                tokens.push(Token::Close { name });
            } else {
                tokens.push(Token::Text(raw));
            }
        } else {
            tokens.push(Token::Open { name, raw });
        }
    }

    if last < input.len() {
        tokens.push(Token::Text(&input[last..]));
    }
    tokens
}

/// Escape `&`, `<` and `>` in text, keeping existing character references.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut last = 0;

    for found in ENTITY.find_iter(text) {
        escape_into(&mut escaped, &text[last..found.start()]);
        escaped.push_str(found.as_str());
        last = found.end();
    }
    escape_into(&mut escaped, &text[last..]);
    escaped
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_disallowed_tags_keeps_text() {
        assert_eq!(
            sanitize_telegram_html("<table><tr><td>cell</td></tr></table>"),
            "cell"
        );
        assert_eq!(
            sanitize_telegram_html("<div>Hello <b>world</b></div><script>x</script>"),
            "Hello <b>world</b>x"
        );
    }

    #[test]
    fn test_repairs_misnesting() {
        assert_eq!(
            sanitize_telegram_html("<b>bold<code>mixed</b>rest</code>"),
            "<b>bold<code>mixed</code></b>rest"
        );
    }

    #[test]
    fn test_escapes_comparison_text() {
        assert_eq!(
            sanitize_telegram_html("x < 5 and y > 0"),
            "x &lt; 5 and y &gt; 0"
        );
    }

    #[test]
    fn test_closes_unclosed_tags_lifo() {
        assert_eq!(sanitize_telegram_html("<b>text"), "<b>text</b>");
        assert_eq!(
            sanitize_telegram_html("<b><i>deep"),
            "<b><i>deep</i></b>"
        );
    }

    #[test]
    fn test_drops_orphan_close() {
        assert_eq!(sanitize_telegram_html("text</b>"), "text");
        assert_eq!(sanitize_telegram_html("a</i><b>b</b>"), "a<b>b</b>");
    }

    #[test]
    fn test_balanced_input_unchanged() {
        let input = r#"<b>Title</b>
<i>italic</i> <a href="https://example.com/?a=1&amp;b=2">link</a>
<blockquote>quote <tg-spoiler>hidden</tg-spoiler></blockquote>
<pre><code>let x = 1;</code></pre>"#;
        assert_eq!(sanitize_telegram_html(input), input);
    }

    #[test]
    fn test_no_double_escape() {
        assert_eq!(escape_text("Tom &amp; Jerry"), "Tom &amp; Jerry");
        assert_eq!(escape_text("a & b"), "a &amp; b");
        assert_eq!(escape_text("&#39; &#x27; &quot;"), "&#39; &#x27; &quot;");
        assert_eq!(escape_text("&nbsp;"), "&amp;nbsp;");
    }

    #[test]
    fn test_tag_names_case_insensitive() {
        assert_eq!(sanitize_telegram_html("<B>x</B>"), "<B>x</b>");
        assert_eq!(sanitize_telegram_html("<DIV>x</DIV>"), "x");
    }

    #[test]
    fn test_close_with_attributes_is_text() {
        assert_eq!(
            sanitize_telegram_html("<b>x</b foo>"),
            "<b>x&lt;/b foo&gt;</b>"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize_telegram_html(""), "");
    }

    fn fragment() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("<b>".to_string()),
            Just("</b>".to_string()),
            Just("<i>".to_string()),
            Just("</i>".to_string()),
            Just("<code>".to_string()),
            Just("</code>".to_string()),
            Just("<a href=\"https://x.io\">".to_string()),
            Just("</a>".to_string()),
            Just("<div>".to_string()),
            Just("</div>".to_string()),
            Just("<script>".to_string()),
            Just("&amp;".to_string()),
            Just("&".to_string()),
            Just("<".to_string()),
            Just(">".to_string()),
            "[a-z ]{0,6}",
        ]
    }

    fn markup() -> impl Strategy<Value = String> {
        prop::collection::vec(fragment(), 0..24).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn prop_idempotent(input in markup()) {
            let once = sanitize_telegram_html(&input);
            prop_assert_eq!(sanitize_telegram_html(&once), once);
        }

        #[test]
        fn prop_only_allowed_and_balanced(input in markup()) {
            let output = sanitize_telegram_html(&input);
            let mut stack: Vec<String> = Vec::new();

            for caps in TAG.captures_iter(&output) {
                let name = caps[1].to_ascii_lowercase();
                prop_assert!(is_allowed(&name), "disallowed tag in {}", output);
                if caps[0].starts_with("</") {
                    prop_assert_eq!(stack.pop(), Some(name));
                } else {
                    stack.push(name);
                }
            }
            prop_assert!(stack.is_empty());
        }
    }
}
