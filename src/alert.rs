//! Alert messages shown to the user, e.g. when an htmx request fails.

use axum::response::Html;
use maud::{Markup, html};

/// A dismissable message with a headline and some details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Something went wrong.
    Error { message: String, details: String },
}

impl Alert {
    /// Render the alert as markup.
    pub fn into_markup(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Error { message, details } => (
                "text-red-800 border-red-300 bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                message,
                details,
            ),
        };

        html! {
            div
                id="alert"
                role="alert"
                class={ "flex items-start p-4 mb-4 border rounded-lg " (container_style) }
            {
                div class="flex-1 text-sm"
                {
                    p class="font-semibold" { (message) }

                    @if !details.is_empty()
                    {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    class="ms-3 -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex
                        items-center justify-center h-8 w-8 hover:opacity-75"
                    onclick="this.closest('#alert').remove()"
                {
                    "✕"
                }
            }
        }
    }

    /// Render the alert as an HTML fragment for htmx to swap in.
    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let alert = Alert::Error {
            message: "Invalid email".to_owned(),
            details: "Try again".to_owned(),
        };

        let document = Html::parse_fragment(&alert.into_html().0);

        let selector = Selector::parse("#alert p").unwrap();
        let text: Vec<String> = document
            .select(&selector)
            .map(|p| p.text().collect())
            .collect();
        assert_eq!(text, ["Invalid email", "Try again"]);
    }

    #[test]
    fn empty_details_are_omitted() {
        let alert = Alert::Error {
            message: "Something went wrong".to_owned(),
            details: String::new(),
        };

        let document = Html::parse_fragment(&alert.into_html().0);

        let selector = Selector::parse("#alert p").unwrap();
        assert_eq!(document.select(&selector).count(), 1);
    }
}
