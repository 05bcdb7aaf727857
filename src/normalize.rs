//! Comment normalization and tokenization.
//!
//! Every comment passes through [`normalize`] before it is used for training
//! or classification. The normalized form holds only lowercase word
//! characters separated by single spaces, with URLs replaced by [`LINK_TOKEN`].

use std::sync::LazyLock;

use regex::Regex;

/// Placeholder token substituted for every HTTP/HTTPS URL.
pub const LINK_TOKEN: &str = "link";

// ── Regex patterns ──────────────────────────────────────────────────────

// Schemes are case-insensitive; matching `HTTPS` here keeps normalization
// idempotent once the text has been lowercased.
static RE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)https?\S+").unwrap());

static RE_NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// ── Options ─────────────────────────────────────────────────────────────

/// Knobs for [`normalize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Replace URLs with [`LINK_TOKEN`] before stripping punctuation.
    pub substitute_urls: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            substitute_urls: true,
        }
    }
}

// ── Normalization ───────────────────────────────────────────────────────

/// Normalize a raw comment with URL substitution enabled.
///
/// Steps, in order: URLs → `link`, non-word characters → space, whitespace
/// runs → single space, lowercase, trim.
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, NormalizeOptions::default())
}

/// Normalize a raw comment with explicit options.
pub fn normalize_with(raw: &str, options: NormalizeOptions) -> String {
    let text = if options.substitute_urls {
        RE_URL.replace_all(raw, LINK_TOKEN)
    } else {
        raw.into()
    };
    let text = RE_NON_WORD.replace_all(&text, " ");
    let text = RE_WHITESPACE.replace_all(&text, " ");
    text.to_lowercase().trim().to_string()
}

/// Split a normalized comment into tokens on single spaces.
///
/// Empty pieces are dropped, so an all-punctuation comment (normalized to
/// `""`) yields no tokens rather than one empty token.
pub fn tokens(comment: &str) -> impl Iterator<Item = &str> {
    comment.split(' ').filter(|t| !t.is_empty())
}

/// Number of tokens in a normalized comment.
pub fn token_count(comment: &str) -> usize {
    tokens(comment).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Some letters (U+03D2..U+03D4) have no lowercase mapping, so "lowercase"
    // here means unchanged by `to_lowercase`, not free of uppercase letters.
    fn is_normal_form(s: &str) -> bool {
        !s.starts_with(' ')
            && !s.ends_with(' ')
            && !s.contains("  ")
            && s.to_lowercase() == s
            && tokens(s).all(|t| !RE_NON_WORD.is_match(t))
    }

    #[test]
    fn replaces_urls_with_link_token() {
        assert_eq!(
            normalize("Check https://youtu.be/abc?x=1 now"),
            "check link now"
        );
        assert_eq!(normalize("see http://example.com/path"), "see link");
    }

    #[test]
    fn url_scheme_match_is_case_insensitive() {
        assert_eq!(normalize("HTTPS://EXAMPLE.COM"), "link");
    }

    #[test]
    fn strips_punctuation_and_collapses_whitespace() {
        assert_eq!(
            normalize("  Great   video!!! Thanks,\tman\n"),
            "great video thanks man"
        );
    }

    #[test]
    fn keeps_digits_and_underscores() {
        assert_eq!(normalize("Top_10 songs 2015"), "top_10 songs 2015");
    }

    #[test]
    fn all_punctuation_normalizes_to_empty() {
        assert_eq!(normalize("?!... ;;"), "");
        assert_eq!(tokens("").count(), 0);
    }

    #[test]
    fn without_url_substitution_urls_are_split() {
        let opts = NormalizeOptions {
            substitute_urls: false,
        };
        assert_eq!(
            normalize_with("visit https://spam.io", opts),
            "visit https spam io"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "Check out my channel: https://youtube.com/c/xyz!!",
            "HTTPS  upper and http trailing",
            "ÜBER cool ☺ video\u{feff}",
            "   ",
            "snake_case_words and CamelCase",
            "\u{feff}Subscribe!!! <br /> http://bit.ly/1x",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn output_is_in_normal_form() {
        let samples = [
            "Hello,   WORLD!",
            "\t\tleading and trailing\n\n",
            "mixed: 123 _ abc http://x.y",
            "ÇOK güzel, DANKE",
        ];
        for s in samples {
            let n = normalize(s);
            assert!(is_normal_form(&n), "bad normal form {n:?} for {s:?}");
        }
    }

    #[test]
    fn letters_without_lowercase_mapping_are_normal() {
        let n = normalize("\u{3d2} \u{3d3}\u{3d4} Word");
        assert_eq!(n, "\u{3d2} \u{3d3}\u{3d4} word");
        assert!(is_normal_form(&n));
        assert_eq!(normalize(&n), n);
    }

    #[test]
    fn tokens_split_on_spaces() {
        let toks: Vec<&str> = tokens("check out my channel").collect();
        assert_eq!(toks, vec!["check", "out", "my", "channel"]);
        assert_eq!(token_count("check out my channel"), 4);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Comment-shaped text: words, URLs, punctuation and odd whitespace.
        fn comment() -> impl Strategy<Value = String> {
            prop::collection::vec(
                prop_oneof![
                    "[A-Za-z0-9_]{1,8}",
                    "[hH][tT][tT][pP][sS]?://[a-z0-9./?=&-]{0,16}",
                    "[ \t\n!?.,:;<>/()\u{feff}]{1,3}",
                    any::<char>().prop_map(String::from),
                ],
                0..16,
            )
            .prop_map(|parts| parts.concat())
        }

        proptest! {
            /// Normalizing twice gives the same result as normalizing once.
            #[test]
            fn prop_normalize_idempotent(s in any::<String>()) {
                let once = normalize(&s);
                prop_assert_eq!(normalize(&once), once);
            }

            #[test]
            fn prop_normalize_idempotent_on_comments(s in comment()) {
                let once = normalize(&s);
                prop_assert_eq!(normalize(&once), once);
            }

            /// Output is always lowercase word characters joined by single spaces.
            #[test]
            fn prop_output_in_normal_form(s in any::<String>()) {
                let n = normalize(&s);
                prop_assert!(is_normal_form(&n), "bad normal form {:?} for {:?}", n, s);
            }

            #[test]
            fn prop_comment_output_in_normal_form(s in comment()) {
                let n = normalize(&s);
                prop_assert!(is_normal_form(&n), "bad normal form {:?} for {:?}", n, s);
                prop_assert!(tokens(&n).all(|t| !t.is_empty()));
            }
        }
    }
}
