//! Speech markup for reply fragments.
//!
//! Fragments are wrapped in an SSML `<prosody>` element so the speech
//! synthesizer renders them at a controlled rate. Fragments that are
//! already enclosed in a `<prosody>` or `<speak>` element are left alone,
//! which makes wrapping idempotent.

use std::sync::OnceLock;

use regex::Regex;

/// Matches `<prosody ...>`, `</prosody>`, `<speak ...>`, `</speak>` and
/// their self-closing forms.
fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<(/?)(prosody|speak)\b[^>]*?(/?)>").expect("tag pattern is valid")
    })
}

fn any_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"</?[A-Za-z][^<>]*>").expect("markup pattern is valid"))
}

/// Prosody wrapper applied to each text fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechMarkup {
    rate: Option<String>,
}

impl SpeechMarkup {
    /// Markup that leaves text untouched.
    pub fn none() -> Self {
        Self { rate: None }
    }

    /// Wrap fragments at `rate`; a blank rate disables wrapping.
    pub fn with_rate(rate: impl Into<String>) -> Self {
        let rate = rate.into();
        let rate = rate.trim();
        Self {
            rate: (!rate.is_empty()).then(|| rate.to_string()),
        }
    }

    pub fn rate(&self) -> Option<&str> {
        self.rate.as_deref()
    }

    /// Wrap `text` in the prosody element unless it is already wrapped,
    /// either by an earlier call or by a balanced wrapper of its own.
    pub fn wrap(&self, text: &str) -> String {
        let Some(rate) = &self.rate else {
            return text.to_string();
        };
        let opener = format!("<prosody rate='{rate}'>");
        if is_own_wrapper(text, &opener) || is_wrapped(text) {
            return text.to_string();
        }
        format!("{opener}{text}</prosody>")
    }
}

/// Output of `wrap` is recognised by its exact envelope, so unbalanced
/// tags inside the fragment cannot trigger a second wrap.
fn is_own_wrapper(text: &str, opener: &str) -> bool {
    let trimmed = text.trim();
    trimmed.len() >= opener.len() + "</prosody>".len()
        && trimmed.starts_with(opener)
        && trimmed.ends_with("</prosody>")
}

/// Whether `text` is entirely enclosed by one `<prosody>` or `<speak>`
/// element, i.e. the opening tag at the start is closed by the tag at
/// the end and not earlier.
pub fn is_wrapped(text: &str) -> bool {
    let trimmed = text.trim();
    let mut tags = tag_pattern().captures_iter(trimmed);

    let Some(open) = tags.next() else {
        return false;
    };
    let open_match = open.get(0).map(|m| m.start());
    let is_opening = open[1].is_empty() && open[3].is_empty();
    if open_match != Some(0) || !is_opening {
        return false;
    }
    let name = open[2].to_string();

    let mut depth = 1usize;
    for tag in tags {
        if tag[2] != name || !tag[3].is_empty() {
            continue;
        }
        if tag[1].is_empty() {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return tag.get(0).map(|m| m.end()) == Some(trimmed.len());
            }
        }
    }
    false
}

/// Remove every markup tag, for outputs that cannot render SSML. A `<`
/// not followed by a tag name is plain text and stays.
pub fn strip_markup(text: &str) -> String {
    let stripped = any_tag_pattern().replace_all(text, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
