//! Pure projection of an activity collection into cards, options and markup.

use std::fmt;

use askama::Template;
use shared::domain::{Activity, ActivityCollection};

pub const LOADING_HTML: &str = "<p>Loading activities...</p>";
pub const LOAD_FAILURE_HTML: &str = "<p>Failed to load activities. Please try again later.</p>";

/// Escapes every character that could open a tag, close an attribute or start
/// an entity when interpolated into markup.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            '"' => escaped.push_str("&quot;"),
            '`' => escaped.push_str("&#96;"),
            '=' => escaped.push_str("&#61;"),
            '/' => escaped.push_str("&#47;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Template escaper backed by [`escape_html`]; registered in `askama.toml`.
pub struct MarkupEscaper;

impl askama_escape::Escaper for MarkupEscaper {
    fn write_escaped<W: fmt::Write>(&self, mut fmt: W, string: &str) -> fmt::Result {
        fmt.write_str(&escape_html(string))
    }
}

#[derive(Template)]
#[template(path = "activity_card.html", escape = "markup")]
struct CardTemplate<'a> {
    card: &'a ActivityCard,
}

#[derive(Template)]
#[template(path = "select_option.html", escape = "markup")]
struct OptionTemplate<'a> {
    option: &'a SelectOption,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub activity: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: Vec<ParticipantRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityListing {
    pub cards: Vec<ActivityCard>,
    pub options: Vec<SelectOption>,
}

pub fn build_listing(collection: ActivityCollection) -> ActivityListing {
    let mut listing = ActivityListing::default();
    for activity in collection {
        listing.options.push(SelectOption {
            value: activity.name.clone(),
            label: activity.name.clone(),
        });
        listing.cards.push(ActivityCard::from(activity));
    }
    listing
}

impl From<Activity> for ActivityCard {
    fn from(activity: Activity) -> Self {
        let spots_left = activity.spots_left();
        let participants = activity
            .participants
            .into_iter()
            .map(|email| ParticipantRow {
                activity: activity.name.clone(),
                email,
            })
            .collect();
        Self {
            name: activity.name,
            description: activity.description,
            schedule: activity.schedule,
            spots_left,
            participants,
        }
    }
}

impl ActivityCard {
    pub fn availability_label(&self) -> String {
        format!("{} spots left", self.spots_left)
    }

    pub fn to_html(&self) -> askama::Result<String> {
        CardTemplate { card: self }.render()
    }
}

impl SelectOption {
    pub fn to_html(&self) -> askama::Result<String> {
        OptionTemplate { option: self }.render()
    }
}

impl ActivityListing {
    pub fn card(&self, name: &str) -> Option<&ActivityCard> {
        self.cards.iter().find(|card| card.name == name)
    }

    pub fn to_html(&self) -> askama::Result<String> {
        self.cards.iter().map(ActivityCard::to_html).collect()
    }

    pub fn options_html(&self) -> askama::Result<String> {
        self.options.iter().map(SelectOption::to_html).collect()
    }
}

#[cfg(test)]
#[path = "tests/markup_tests.rs"]
mod tests;
