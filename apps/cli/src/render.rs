//! Terminal rendering of the in-memory page.

use std::fmt::Write as _;

use client_core::{
    markup::ActivityListing,
    view::{DocumentState, StatusRegion},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
}

pub fn render_document(state: &DocumentState, format: OutputFormat) -> String {
    match (format, &state.listing) {
        (OutputFormat::Html, _) => render_html(state),
        (OutputFormat::Text, Some(listing)) => render_text(listing),
        // Nothing rendered from data: show the list area's static message.
        (OutputFormat::Text, None) => strip_paragraph(&state.list_html),
    }
}

fn render_html(state: &DocumentState) -> String {
    format!(
        "<div id=\"activities-list\">{}</div>\n<select id=\"activity\">{}</select>\n",
        terminal_safe(&state.list_html),
        terminal_safe(&state.options_html)
    )
}

/// Server text must not drive the terminal: control characters (escape
/// sequences, carriage returns, newlines) become U+FFFD.
fn terminal_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect()
}

pub fn render_text(listing: &ActivityListing) -> String {
    if listing.cards.is_empty() {
        return "No activities.\n".to_string();
    }
    let mut out = String::new();
    for card in &listing.cards {
        let _ = writeln!(out, "{}", terminal_safe(&card.name));
        let _ = writeln!(out, "  {}", terminal_safe(&card.description));
        let _ = writeln!(out, "  Schedule: {}", terminal_safe(&card.schedule));
        let _ = writeln!(out, "  Availability: {}", card.availability_label());
        if card.participants.is_empty() {
            let _ = writeln!(out, "  No participants yet");
        } else {
            let _ = writeln!(out, "  Participants:");
            for row in &card.participants {
                let _ = writeln!(out, "    - {}", terminal_safe(&row.email));
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_status(status: &StatusRegion) -> Option<String> {
    status
        .visible_message()
        .map(|(text, kind)| format!("[{}] {}", kind.class_name(), terminal_safe(text)))
}

fn strip_paragraph(html: &str) -> String {
    let text = html
        .trim()
        .trim_start_matches("<p>")
        .trim_end_matches("</p>");
    format!("{text}\n")
}

#[cfg(test)]
mod tests {
    use client_core::{markup::build_listing, DocumentView, StatusKind, View};
    use shared::domain::{Activity, ActivityCollection, ActivityRecord};

    use super::*;

    fn chess_listing() -> ActivityListing {
        let collection: ActivityCollection = [Activity::from_record(
            "Chess Club",
            ActivityRecord {
                description: "Learn strategies".into(),
                schedule: "Fridays".into(),
                max_participants: 10,
                participants: vec!["a@x.com".into()],
            },
        )]
        .into_iter()
        .collect();
        build_listing(collection)
    }

    #[test]
    fn text_lists_cards_and_participants() {
        let text = render_text(&chess_listing());
        assert!(text.starts_with("Chess Club\n"));
        assert!(text.contains("  Availability: 9 spots left\n"));
        assert!(text.contains("    - a@x.com\n"));
    }

    #[test]
    fn text_neutralizes_control_characters() {
        let mut listing = chess_listing();
        listing.cards[0].name = "\x1b[31mChess\x1b[0m".into();
        listing.cards[0].description = "line\rover".into();
        listing.cards[0].participants[0].email = "a@x.com\x07".into();

        let text = render_text(&listing);
        assert!(!text.contains('\x1b'));
        assert!(!text.contains('\r'));
        assert!(!text.contains('\x07'));
        assert!(text.starts_with("\u{FFFD}[31mChess\u{FFFD}[0m\n"));
        assert!(text.contains("  line\u{FFFD}over\n"));
        assert!(text.contains("    - a@x.com\u{FFFD}\n"));
    }

    #[tokio::test]
    async fn status_and_html_neutralize_control_characters() {
        let view = DocumentView::new();
        let mut listing = chess_listing();
        listing.cards[0].name = "Chess\x1b]0;pwned\x07".into();
        view.render(listing).await;
        view.show_status("Signed up\x1b[2J", StatusKind::Success).await;

        let html = render_document(&view.snapshot().await, OutputFormat::Html);
        assert!(!html.contains('\x1b'));
        assert!(!html.contains('\x07'));
        assert_eq!(
            render_status(&view.status().await).as_deref(),
            Some("[success] Signed up\u{FFFD}[2J")
        );
    }

    #[tokio::test]
    async fn load_failure_renders_static_message() {
        let view = DocumentView::new();
        view.show_load_failure().await;
        let state = view.snapshot().await;
        assert_eq!(
            render_document(&state, OutputFormat::Text),
            "Failed to load activities. Please try again later.\n"
        );
    }

    #[tokio::test]
    async fn html_includes_list_and_select() {
        let view = DocumentView::new();
        view.render(chess_listing()).await;
        let html = render_document(&view.snapshot().await, OutputFormat::Html);
        assert!(html.contains("<h4>Chess Club</h4>"));
        assert!(html.contains("<option value=\"Chess Club\">Chess Club</option>"));
    }

    #[tokio::test]
    async fn status_line_only_when_visible() {
        let view = DocumentView::new();
        assert_eq!(render_status(&view.status().await), None);
        view.show_status("Signed up", StatusKind::Success).await;
        assert_eq!(
            render_status(&view.status().await).as_deref(),
            Some("[success] Signed up")
        );
    }
}
