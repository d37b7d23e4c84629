//! Restricted authoring preview.
//!
//! The supported syntax is the closed set below, applied in order as plain
//! substitutions. Nested constructs (bold inside a list item, links inside
//! headings) are out of contract: whatever the substitutions produce is the
//! answer. HTML metacharacters are escaped before any pattern runs, so the
//! markdown source can never inject markup of its own.

use once_cell::sync::Lazy;
use regex::Regex;

static H3: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.*)$").expect("static pattern"));
static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.*)$").expect("static pattern"));
static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.*)$").expect("static pattern"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("static pattern"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("static pattern"));
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("static pattern"));
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("static pattern"));
static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(.*?)```").expect("static pattern"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("static pattern"));
static BLOCKQUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^&gt; (.*)$").expect("static pattern"));
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^- (.*)$").expect("static pattern"));

/// Render the editor preview for the given markdown source.
pub fn render_preview(markdown: &str) -> String {
    let mut html = markdown
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");

    html = H3.replace_all(&html, "<h3>${1}</h3>").into_owned();
    html = H2.replace_all(&html, "<h2>${1}</h2>").into_owned();
    html = H1.replace_all(&html, "<h1>${1}</h1>").into_owned();
    html = BOLD
        .replace_all(&html, "<strong>${1}</strong>")
        .into_owned();
    html = ITALIC.replace_all(&html, "<em>${1}</em>").into_owned();
    html = IMAGE
        .replace_all(&html, "<img src=\"${2}\" alt=\"${1}\" />")
        .into_owned();
    html = LINK
        .replace_all(&html, "<a href=\"${2}\">${1}</a>")
        .into_owned();
    html = CODE_BLOCK
        .replace_all(&html, "<pre><code>${1}</code></pre>")
        .into_owned();
    html = INLINE_CODE
        .replace_all(&html, "<code>${1}</code>")
        .into_owned();
    html = BLOCKQUOTE
        .replace_all(&html, "<blockquote>${1}</blockquote>")
        .into_owned();
    html = LIST_ITEM.replace_all(&html, "<li>${1}</li>").into_owned();

    html = html.replace("\n\n", "</p><p>").replace('\n', "<br />");

    let mut html = format!("<p>{html}</p>");
    html = html.replace("<p></p>", "").replace("<p><br /></p>", "");

    html
}
