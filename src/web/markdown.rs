//! Markdown rendering for plant profiles
//!
//! Profiles are shown as `**label**: value` paragraphs. Model output is
//! untrusted: raw HTML in it is rendered as text, and only http(s) links and
//! images survive. Any other link keeps its text without the link.

use pulldown_cmark::{html, Event, Parser, Tag, TagEnd};

use crate::store::PlantRecord;

/// One bold-labelled paragraph per cell; records separated by a rule.
pub fn records_to_markdown(records: &[PlantRecord]) -> String {
    records
        .iter()
        .map(|record| {
            record
                .cells()
                .map(|(label, value)| format!("**{}**: {}", label, value))
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

pub fn markdown_to_html(markdown: &str) -> String {
    // Links and images never nest, so one flag tracks the open one.
    let mut dropped_open = false;
    let parser = Parser::new(markdown).filter_map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::Start(Tag::Link { ref dest_url, .. } | Tag::Image { ref dest_url, .. })
            if !is_web_url(dest_url) =>
        {
            dropped_open = true;
            None
        }
        Event::End(TagEnd::Link | TagEnd::Image) if dropped_open => {
            dropped_open = false;
            None
        }
        other => Some(other),
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn is_web_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    url.starts_with("https://") || url.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_to_markdown() {
        let mut rose = PlantRecord::new("rose");
        rose.set("Family", "Rosaceae");
        let lily = PlantRecord::new("lily");

        let markdown = records_to_markdown(&[rose, lily]);
        assert_eq!(
            markdown,
            "**Flower Name**: rose\n\n**Family**: Rosaceae\n\n---\n\n**Flower Name**: lily"
        );
    }

    #[test]
    fn test_markdown_to_html_bolds_labels() {
        let html = markdown_to_html("**Family**: Rosaceae");
        assert!(html.contains("<strong>Family</strong>: Rosaceae"));
    }

    #[test]
    fn test_markdown_to_html_neutralizes_raw_html() {
        let html = markdown_to_html("**Toxicity**: <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_markdown_to_html_drops_script_links() {
        let html = markdown_to_html("**Care**: see [guide](javascript:alert(1)) and ![leaf](data:image/png;base64,AAAA)");
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("<a "));
        assert!(!html.contains("<img"));
        assert!(html.contains("guide"));
        assert!(html.contains("leaf"));
    }

    #[test]
    fn test_markdown_to_html_keeps_web_links() {
        let html = markdown_to_html("[RHS](https://www.rhs.org.uk/plants)");
        assert!(html.contains("<a href=\"https://www.rhs.org.uk/plants\">RHS</a>"));
    }
}
