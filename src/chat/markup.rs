//! Transcript markup.
//!
//! Message content is stored the way it would be written into a rich text
//! view: line breaks as `<br>` and the characters `<`, `>` and `&` as
//! entities. Decoding is exact, so `decode(&escape(s)) == s` for every `s`.

pub const LINE_BREAK: &str = "<br>";

/// Markup for a single character
pub fn escape_char(ch: char, out: &mut String) {
    match ch {
        '\n' => out.push_str(LINE_BREAK),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '&' => out.push_str("&amp;"),
        other => out.push(other),
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        escape_char(ch, &mut out);
    }
    out
}

/// Plain text of a markup string
pub fn decode(markup: &str) -> String {
    const TOKENS: [(&str, char); 4] = [(LINE_BREAK, '\n'), ("&lt;", '<'), ("&gt;", '>'), ("&amp;", '&')];

    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    'outer: while let Some(ch) = rest.chars().next() {
        if ch == '<' || ch == '&' {
            for (token, replacement) in TOKENS {
                if let Some(tail) = rest.strip_prefix(token) {
                    out.push(replacement);
                    rest = tail;
                    continue 'outer;
                }
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_table() {
        assert_eq!(escape("a\nb"), "a<br>b");
        assert_eq!(escape("<b>"), "&lt;b&gt;");
        assert_eq!(escape("fish & chips"), "fish &amp; chips");
        assert_eq!(escape("\"quoted\" 'single'"), "\"quoted\" 'single'");
    }

    #[test]
    fn test_decode_inverts_escape() {
        let samples = [
            "",
            "plain",
            "line one\nline two\n",
            "<script>alert('x')</script>",
            "&lt; is already an entity",
            "<br> literally",
            "émojis 🚀 and 中文",
        ];
        for sample in samples {
            assert_eq!(decode(&escape(sample)), sample, "sample: {:?}", sample);
        }
    }

    #[test]
    fn test_decode_leaves_unknown_sequences() {
        assert_eq!(decode("a &nbsp; b <i>"), "a &nbsp; b <i>");
    }
}
