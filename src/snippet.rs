use std::fmt;

/// Length of the excerpt returned when the query does not occur in the body.
pub const SNIPPET_MAX_CHARS: usize = 300;

/// Characters kept on each side of the first match.
pub const SNIPPET_CONTEXT_CHARS: usize = 150;

/// A run of excerpt text, either plain or matching the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

/// A bounded excerpt of a document, split into plain and highlighted runs.
///
/// Highlights are kept as structure instead of markup so a rendering surface
/// decides how emphasis looks and never has to trust document text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snippet {
    segments: Vec<Segment>,
}

impl Snippet {
    pub fn plain(text: String) -> Snippet {
        let mut snippet = Snippet::default();
        snippet.push(text, false);
        snippet
    }

    fn push(&mut self, text: String, highlighted: bool) {
        if text.is_empty() {
            return;
        }
        self.segments.push(Segment { text, highlighted });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The excerpt without any highlight information.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn char_len(&self) -> usize {
        self.segments.iter().map(|s| s.text.chars().count()).sum()
    }

    pub fn highlights(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter(|s| s.highlighted)
            .map(|s| s.text.as_str())
    }

    pub fn highlight_count(&self) -> usize {
        self.highlights().count()
    }

    /// Wraps every highlighted run in `open`/`close`, for terminals and other
    /// plain-text surfaces. Control characters in the document text are
    /// escaped first, so only the markers can carry escape sequences.
    pub fn render_with(&self, open: &str, close: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if segment.highlighted {
                out.push_str(open);
                escape_controls_into(&segment.text, &mut out);
                out.push_str(close);
            } else {
                escape_controls_into(&segment.text, &mut out);
            }
        }
        out
    }

    /// HTML rendering with all document text escaped and matches in `<mark>`.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if segment.highlighted {
                out.push_str("<mark>");
                escape_html_into(&segment.text, &mut out);
                out.push_str("</mark>");
            } else {
                escape_html_into(&segment.text, &mut out);
            }
        }
        out
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

fn escape_html_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

/// `text` with every control character except newline and tab spelled out
/// (`\u{1b}`), safe to write to a terminal.
pub fn escape_controls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_controls_into(text, &mut out);
    out
}

fn escape_controls_into(text: &str, out: &mut String) {
    for c in text.chars() {
        if c.is_control() && c != '\n' && c != '\t' {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
}

/// Whether `query` occurs in `content` under the same literal,
/// case-insensitive matching [`extract`] highlights with.
pub fn contains(content: &str, query: &str) -> bool {
    match_window(content, query).is_some()
}

/// Case folding that never changes the number of chars, so offsets in the
/// folded text are offsets in the original.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find_folded(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| &haystack[i..i + needle.len()] == needle)
}

/// Char range `[start, end)` of the excerpt centred on the first
/// case-insensitive occurrence of `query`, or `None` when it does not occur.
/// An empty query never occurs.
pub fn match_window(content: &str, query: &str) -> Option<(usize, usize)> {
    let folded: Vec<char> = content.chars().map(fold).collect();
    let needle: Vec<char> = query.chars().map(fold).collect();
    window(&folded, &needle)
}

fn window(folded: &[char], needle: &[char]) -> Option<(usize, usize)> {
    let idx = find_folded(folded, needle, 0)?;
    let start = idx.saturating_sub(SNIPPET_CONTEXT_CHARS);
    let end = (idx + needle.len() + SNIPPET_CONTEXT_CHARS).min(folded.len());
    Some((start, end))
}

/// Builds the excerpt shown for `content` when searching for `query`.
///
/// The query is matched literally and case-insensitively. If it occurs, the
/// excerpt is the window around its first occurrence with every occurrence
/// inside the window highlighted in its original casing. Otherwise the
/// excerpt is the first [`SNIPPET_MAX_CHARS`] characters, unhighlighted.
pub fn extract(content: &str, query: &str) -> Snippet {
    let chars: Vec<char> = content.chars().collect();
    let folded: Vec<char> = chars.iter().copied().map(fold).collect();
    let needle: Vec<char> = query.chars().map(fold).collect();

    match window(&folded, &needle) {
        Some((start, end)) => highlight(&chars[start..end], &folded[start..end], &needle),
        None => Snippet::plain(chars.iter().take(SNIPPET_MAX_CHARS).collect()),
    }
}

fn highlight(chars: &[char], folded: &[char], needle: &[char]) -> Snippet {
    let mut snippet = Snippet::default();
    let mut cursor = 0usize;
    while let Some(pos) = find_folded(folded, needle, cursor) {
        let end = pos + needle.len();
        snippet.push(chars[cursor..pos].iter().collect(), false);
        snippet.push(chars[pos..end].iter().collect(), true);
        cursor = end;
    }
    snippet.push(chars[cursor..].iter().collect(), false);
    snippet
}

#[test]
fn test_find_folded() {
    let hay: Vec<char> = "abcabc".chars().collect();
    let needle: Vec<char> = "bc".chars().collect();
    assert_eq!(find_folded(&hay, &needle, 0), Some(1));
    assert_eq!(find_folded(&hay, &needle, 2), Some(4));
    assert_eq!(find_folded(&hay, &needle, 5), None);
    assert_eq!(find_folded(&hay, &[], 0), None);

    let long: Vec<char> = "abcabcabc".chars().collect();
    assert_eq!(find_folded(&hay, &long, 0), None);
}

#[test]
fn test_fold_keeps_char_count() {
    // 'İ' lowercases to two chars; folding must still be one-to-one.
    let content = "İstanbul";
    let folded: Vec<char> = content.chars().map(fold).collect();
    assert_eq!(folded.len(), content.chars().count());
    assert_eq!(folded[0], 'i');
}

#[test]
fn test_highlight_adjacent_matches_stay_separate() {
    let snippet = extract("aaaa", "aa");
    assert_eq!(snippet.highlight_count(), 2);
    assert_eq!(snippet.segments().len(), 2);
    assert_eq!(snippet.text(), "aaaa");
}

#[test]
fn test_to_html_escapes_document_text() {
    let snippet = extract("<script>alert('x')</script> Rust & more", "rust");
    assert_eq!(
        snippet.to_html(),
        "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; <mark>Rust</mark> &amp; more"
    );
}

#[test]
fn test_render_with_escapes_control_characters() {
    let snippet = extract("\x1b[2Jwiped \x1b[31mred\x07", "red");
    let rendered = snippet.render_with("<", ">");
    assert!(!rendered.contains('\x1b'));
    assert!(!rendered.contains('\x07'));
    assert_eq!(rendered, "\\u{1b}[2Jwiped \\u{1b}[31m<red>\\u{7}");
    assert_eq!(escape_controls("line\nnext\tcol\r"), "line\nnext\tcol\\r");
}

#[test]
fn test_contains_agrees_with_extract() {
    for (content, query) in [
        ("İstanbul guide", "istanbul"),
        ("during exam week", "  exam "),
        ("during exam week", " exam "),
        ("a.c", "a.c"),
        ("abc", "a.c"),
        ("anything", ""),
    ] {
        assert_eq!(
            contains(content, query),
            extract(content, query).highlight_count() > 0,
            "{content:?} / {query:?}"
        );
    }
}
