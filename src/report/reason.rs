//! Human readable labels for failure reason codes.

use crate::payment::FailureReason;

/// The label shown for a transaction without a failure reason.
pub const MISSING_REASON_LABEL: &str = "N/A";

/// Turn a failure reason code into a label, e.g. "NETWORK_ERROR" into "Network Error".
///
/// Underscores become spaces and each word is title cased. Unknown codes get
/// the same treatment, and a missing or empty code is shown as [MISSING_REASON_LABEL].
pub fn format_reason(reason: Option<&FailureReason>) -> String {
    match reason.map(FailureReason::as_code) {
        None | Some("") => MISSING_REASON_LABEL.to_owned(),
        // Every underscore is a word break, not only the first.
        Some(code) => title_case(&code.replace('_', " ").to_lowercase()),
    }
}

/// Upper case the first ASCII word character of every word.
fn title_case(text: &str) -> String {
    let is_word_char = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let mut previous_is_word_char = false;

    text.chars()
        .map(|c| {
            let starts_word = is_word_char(c) && !previous_is_word_char;
            previous_is_word_char = is_word_char(c);

            if starts_word { c.to_ascii_uppercase() } else { c }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::payment::FailureReason;

    use super::format_reason;

    #[test]
    fn formats_known_reasons() {
        assert_eq!(
            format_reason(Some(&FailureReason::NetworkError)),
            "Network Error"
        );
        assert_eq!(
            format_reason(Some(&FailureReason::InvalidCard)),
            "Invalid Card"
        );
        assert_eq!(format_reason(Some(&FailureReason::Timeout)), "Timeout");
    }

    #[test]
    fn missing_reason_is_not_applicable() {
        assert_eq!(format_reason(None), "N/A");
        assert_eq!(
            format_reason(Some(&FailureReason::Other(String::new()))),
            "N/A"
        );
    }

    #[test]
    fn unknown_reasons_are_formatted_generically() {
        let reason = FailureReason::Other("CARD_DECLINED_BY_BANK".to_owned());

        assert_eq!(format_reason(Some(&reason)), "Card Declined By Bank");
    }

    #[test]
    fn words_split_on_punctuation_are_capitalised() {
        let reason = FailureReason::Other("3ds-challenge failed".to_owned());

        assert_eq!(format_reason(Some(&reason)), "3ds-Challenge Failed");
    }
}
