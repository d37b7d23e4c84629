//! Publication rendering for the public read surface.
//!
//! Full markdown with the table extension, rendered through Comrak and
//! sanitized with Ammonia before it is served. One presentation rule is
//! applied on the AST: every image becomes a figure captioned by its alt
//! text, and when the image is a paragraph's only child the figure replaces
//! the paragraph instead of being wrapped by it.

use std::collections::HashSet;
use std::string::FromUtf8Error;

use ammonia::Builder as AmmoniaBuilder;
use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use comrak::options::Options;
use comrak::{Arena, format_html, parse_document};
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize rendered markdown")]
    Serialize(#[from] std::io::Error),
    #[error("rendered markdown is not valid UTF-8")]
    Encoding(#[from] FromUtf8Error),
}

struct PublishRenderer {
    options: Options<'static>,
    sanitizer: AmmoniaBuilder<'static>,
}

static RENDERER: Lazy<PublishRenderer> = Lazy::new(|| PublishRenderer {
    options: publish_options(),
    sanitizer: build_sanitizer(),
});

/// Render stored markdown to sanitized HTML for the public site.
pub fn render_published(markdown: &str) -> Result<String, RenderError> {
    let renderer = &*RENDERER;

    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &renderer.options);
    rewrite_images(root);

    let mut buffer = Vec::new();
    format_html(root, &renderer.options, &mut buffer)?;
    let html = String::from_utf8(buffer)?;

    Ok(renderer.sanitizer.clean(&html).to_string())
}

fn publish_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    // Raw output is required for the figure blocks injected below; the
    // sanitizer owns the final say on what survives.
    options.render.r#unsafe = true;
    options
}

/// Every image becomes a figure whose caption is its alt text. When the
/// image is a paragraph's only child, the figure replaces the paragraph
/// outright instead of being wrapped by it.
fn rewrite_images<'a>(root: &'a AstNode<'a>) {
    let images: Vec<&AstNode<'a>> = root
        .descendants()
        .filter(|node| matches!(node.data.borrow().value, NodeValue::Image(_)))
        .collect();

    for image in images {
        let url = match &image.data.borrow().value {
            NodeValue::Image(link) => link.url.clone(),
            _ => continue,
        };
        let alt = collect_text(image);
        let figure = figure_html(&url, &alt);

        let sole_paragraph = image.parent().filter(|parent| {
            matches!(parent.data.borrow().value, NodeValue::Paragraph)
                && image.previous_sibling().is_none()
                && image.next_sibling().is_none()
        });

        match sole_paragraph {
            Some(paragraph) => {
                image.detach();
                paragraph.data.borrow_mut().value = NodeValue::HtmlBlock(NodeHtmlBlock {
                    block_type: 0,
                    literal: figure,
                });
            }
            None => {
                let children: Vec<&AstNode<'a>> = image.children().collect();
                for child in children {
                    child.detach();
                }
                image.data.borrow_mut().value = NodeValue::HtmlInline(figure);
            }
        }
    }
}

fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for descendant in node.descendants() {
        if let NodeValue::Text(value) = &descendant.data.borrow().value {
            text.push_str(value);
        }
    }
    text
}

fn figure_html(url: &str, alt: &str) -> String {
    let src = escape_attribute(url);
    if alt.trim().is_empty() {
        format!("<figure><img src=\"{src}\" alt=\"\" /></figure>\n")
    } else {
        format!(
            "<figure><img src=\"{src}\" alt=\"{}\" /><figcaption>{}</figcaption></figure>\n",
            escape_attribute(alt),
            escape_text(alt),
        )
    }
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn build_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "blockquote",
        "br",
        "code",
        "em",
        "figcaption",
        "figure",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "img",
        "li",
        "ol",
        "p",
        "pre",
        "strong",
        "table",
        "tbody",
        "td",
        "th",
        "thead",
        "tr",
        "ul",
    ]);
    builder.tags(tags);

    builder.add_tag_attributes("a", &["href", "title"]);
    builder.add_tag_attributes("img", &["src", "alt", "title"]);
    builder.add_tag_attributes("th", &["align"]);
    builder.add_tag_attributes("td", &["align"]);
    builder.add_url_schemes(["http", "https", "mailto"].iter().copied());

    builder
}
