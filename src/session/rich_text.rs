//! Rich-text body binding and its HTML serialization.
//!
//! Bodies travel as paragraph HTML: one `<p>…</p>` per line, `<p><br></p>`
//! for a blank line, text escaped.

/// Read/clear access to the editor that holds a form's body.
///
/// `html` returns `None` when the editor is not available.
pub trait RichTextBinding {
    fn html(&self) -> Option<String>;
    fn clear(&mut self);
}

/// A body held as plain lines, with no widget behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainText {
    lines: Vec<String>,
}

impl PlainText {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_html(html: &str) -> Self {
        Self {
            lines: html_to_lines(html),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl RichTextBinding for PlainText {
    fn html(&self) -> Option<String> {
        Some(lines_to_html(&self.lines))
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Serializes editor lines. Returns `""` when every line is blank.
pub fn lines_to_html<S: AsRef<str>>(lines: &[S]) -> String {
    if lines.iter().all(|l| l.as_ref().trim().is_empty()) {
        return String::new();
    }
    lines
        .iter()
        .map(|line| match line.as_ref() {
            "" => "<p><br></p>".to_string(),
            text => format!("<p>{}</p>", escape(text)),
        })
        .collect()
}

/// Loads stored HTML back into editor lines.
///
/// Block ends and `<br>` end a line; every other tag is dropped.
pub fn html_to_lines(html: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    // Set when `<br>` just ended a line, so the closing `</p>` adds nothing.
    let mut broke = false;
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        let text = &rest[..start];
        if !text.is_empty() {
            current.push_str(text);
            broke = false;
        }
        let Some(len) = rest[start..].find('>') else {
            current.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let tag = rest[start + 1..start + len].to_ascii_lowercase();
        let name = tag
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_string();
        rest = &rest[start + len + 1..];

        match name.as_str() {
            "p" | "div" | "h1" | "h2" | "h3" | "li" => {
                if current.trim().is_empty() {
                    current.clear();
                }
            }
            "br" => {
                lines.push(unescape(&current));
                current.clear();
                broke = true;
            }
            "/p" | "/div" | "/h1" | "/h2" | "/h3" | "/li" => {
                if !(broke && current.is_empty()) {
                    lines.push(unescape(&current));
                }
                current.clear();
                broke = false;
            }
            _ => {}
        }
    }
    current.push_str(rest);
    if !current.trim().is_empty() {
        lines.push(unescape(&current));
    }
    lines
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
