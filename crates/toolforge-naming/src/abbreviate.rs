//! Bounded display names.
//!
//! Names are lowercase `[a-z0-9_]`, at most [`MAX_NAME_LEN`] characters.
//! Text is split into words, generic words are dropped, common long words
//! are shortened, and anything still too long is cut and suffixed with a
//! short hash of the original text so that different inputs sharing a
//! prefix stay distinct.

use sha2::{Digest, Sha256};

use crate::dictionary::{abbreviation_for, is_noise, is_protected};
use crate::error::NamingError;

/// Upper bound on abbreviated names.
pub const MAX_NAME_LEN: usize = 64;

/// Inputs longer than this are always cut and hashed.
pub const MAX_INPUT_LEN: usize = 100;

/// Words longer than this lose their inner vowels.
pub const LONG_WORD_LEN: usize = 50;

/// Length of the hex hash suffix.
pub const HASH_LEN: usize = 4;

const SEPARATOR: char = '_';

/// How display names are derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingOptions {
    /// Only sanitize characters; skip word-level rewriting and the length bound.
    pub disable_abbreviation: bool,
    /// Prefix added (sanitized, never abbreviated) in front of every name.
    pub namespace: Option<String>,
}

impl NamingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_abbreviation_disabled(mut self, disabled: bool) -> Self {
        self.disable_abbreviation = disabled;
        self
    }
}

/// Derive a display name from `text`.
///
/// Only a truly empty string is an error; text without any alphanumeric
/// character yields an empty name.
pub fn abbreviate(
    text: &str,
    disable_abbreviation: bool,
    namespace: Option<&str>,
) -> Result<String, NamingError> {
    if text.is_empty() {
        return Err(NamingError::EmptyInput);
    }

    let namespace = namespace.map(sanitize).filter(|ns| !ns.is_empty());
    let name = match (namespace, disable_abbreviation) {
        (None, true) => sanitize(text),
        (None, false) => abbreviate_within(text, MAX_NAME_LEN),
        (Some(ns), true) => join_namespace(&ns, &sanitize(text)),
        (Some(ns), false) => abbreviate_namespaced(text, &ns),
    };
    Ok(name)
}

/// [`abbreviate`] driven by [`NamingOptions`].
pub fn abbreviate_with(text: &str, options: &NamingOptions) -> Result<String, NamingError> {
    abbreviate(
        text,
        options.disable_abbreviation,
        options.namespace.as_deref(),
    )
}

/// Four hex characters derived from `text`.
pub fn content_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hash = hex::encode(&digest[..HASH_LEN / 2]);
    hash.truncate(HASH_LEN);
    hash
}

/// Cut `name` so that it fits `budget` characters including a hash suffix.
fn fit_with_hash(name: &str, original: &str, budget: usize) -> String {
    let hash = content_hash(original);
    let keep = budget.saturating_sub(HASH_LEN + 1);
    let end = name
        .char_indices()
        .nth(keep)
        .map_or(name.len(), |(index, _)| index);
    let prefix = name[..end].trim_end_matches(SEPARATOR);
    if prefix.is_empty() {
        hash
    } else {
        format!("{prefix}{SEPARATOR}{hash}")
    }
}

fn abbreviate_namespaced(text: &str, namespace: &str) -> String {
    // Room for at least one character, a separator and the hash.
    const MIN_BODY: usize = HASH_LEN + 2;

    let budget = MAX_NAME_LEN.saturating_sub(namespace.len() + 1);
    if budget >= MIN_BODY {
        return join_namespace(namespace, &abbreviate_within(text, budget));
    }

    // The namespace alone nearly fills the bound: cut the combined name.
    let body = abbreviate_within(text, usize::MAX);
    let combined = join_namespace(namespace, &body);
    if combined.len() > MAX_NAME_LEN {
        fit_with_hash(&combined, text, MAX_NAME_LEN)
    } else {
        combined
    }
}

fn join_namespace(namespace: &str, body: &str) -> String {
    if body.is_empty() {
        namespace.to_string()
    } else {
        format!("{namespace}{SEPARATOR}{body}")
    }
}

/// The full word-level pipeline, bounded to `budget` characters.
fn abbreviate_within(text: &str, budget: usize) -> String {
    let words = split_words(text);
    if words.is_empty() {
        return String::new();
    }

    let joined = remove_noise(words)
        .into_iter()
        .map(|word| match abbreviation_for(&word) {
            Some(short) => short.to_string(),
            None => word,
        })
        .map(compress_long_word)
        .collect::<Vec<_>>()
        .join("_");
    let name = normalize(&joined);

    if name.len() > budget || text.chars().count() > MAX_INPUT_LEN {
        normalize(&fit_with_hash(&name, text, budget.min(MAX_NAME_LEN)))
    } else {
        name
    }
}

/// Split text into lowercase words on non-alphanumerics, camelCase humps
/// and letter/digit transitions.
pub fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for token in text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let chars: Vec<char> = token.chars().collect();
        let mut current = String::new();
        for (i, &ch) in chars.iter().enumerate() {
            if i > 0 && is_boundary(chars[i - 1], ch, chars.get(i + 1).copied()) {
                words.push(std::mem::take(&mut current));
            }
            current.push(ch.to_ascii_lowercase());
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words
}

fn is_boundary(prev: char, ch: char, next: Option<char>) -> bool {
    if prev.is_ascii_digit() != ch.is_ascii_digit() {
        return true;
    }
    if prev.is_ascii_lowercase() && ch.is_ascii_uppercase() {
        return true;
    }
    // End of an acronym: "HTTPServer" splits before the 'S'.
    prev.is_ascii_uppercase()
        && ch.is_ascii_uppercase()
        && next.is_some_and(|n| n.is_ascii_lowercase())
}

fn remove_noise(words: Vec<String>) -> Vec<String> {
    let kept: Vec<String> = words.iter().filter(|w| !is_noise(w)).cloned().collect();
    if kept.is_empty() {
        words
    } else {
        kept
    }
}

/// Drop inner vowels from very long words, keeping the first character.
fn compress_long_word(word: String) -> String {
    if word.len() <= LONG_WORD_LEN || is_protected(&word) {
        return word;
    }
    let mut chars = word.chars();
    let mut out = String::with_capacity(word.len());
    if let Some(first) = chars.next() {
        out.push(first);
    }
    out.extend(chars.filter(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')));
    out
}

/// Character sanitation: ASCII alphanumerics only, lowercased, separated by
/// single underscores.
pub fn sanitize(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                SEPARATOR
            }
        })
        .collect();
    normalize(&replaced)
}

/// Restrict to `[a-z0-9_]`, collapse separator runs, trim the edges.
fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() {
            c.to_ascii_lowercase()
        } else {
            SEPARATOR
        };
        if c == SEPARATOR && (out.is_empty() || out.ends_with(SEPARATOR)) {
            continue;
        }
        out.push(c);
    }
    while out.ends_with(SEPARATOR) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(text: &str) -> String {
        abbreviate(text, false, None).unwrap()
    }

    #[test]
    fn hash_cut_respects_char_boundaries() {
        let cut = fit_with_hash("ééééééé", "x", 10);
        assert_eq!(cut, format!("ééééé_{}", content_hash("x")));
    }

    #[test]
    fn non_ascii_input_never_panics() {
        assert_eq!(short(&"é".repeat(200)), "");
        let mixed = format!("{}Über{}", "naïve".repeat(30), "x".repeat(80));
        assert!(short(&mixed).len() <= MAX_NAME_LEN);
    }

    fn ends_with_hash(name: &str) -> bool {
        let Some((_, hash)) = name.rsplit_once('_') else {
            return false;
        };
        hash.len() == HASH_LEN && hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    }

    #[test]
    fn drops_noise_words() {
        assert_eq!(short("getUserServiceController"), "get_user");
    }

    #[test]
    fn keeps_words_when_all_are_noise() {
        assert_eq!(short("ServiceController"), "service_controller");
    }

    #[test]
    fn splits_camel_acronyms_and_digits() {
        assert_eq!(
            split_words("parseHTTPResponse2xx v2Api"),
            vec!["parse", "http", "response", "2", "xx", "v", "2", "api"]
        );
    }

    #[test]
    fn applies_dictionary() {
        assert_eq!(short("updateOrganizationConfiguration"), "update_org_config");
        assert_eq!(short("list-repository-permissions"), "list_repo_perms");
    }

    #[test]
    fn compresses_very_long_words() {
        let word = format!("x{}", "abcde".repeat(11)); // 56 chars
        let name = short(&word);
        assert!(!name[1..].contains(['a', 'e']));
        assert!(name.starts_with('x'));
    }

    #[test]
    fn long_input_is_cut_and_hashed() {
        let text = "Retrieve the complete paginated collection of archived customer invoices \
                    filtered by billing region and fiscal quarter for reconciliation";
        assert!(text.len() > 100);
        let name = short(text);
        assert!(name.len() <= MAX_NAME_LEN, "{name}");
        assert!(ends_with_hash(&name), "{name}");
    }

    #[test]
    fn input_of_150_chars() {
        let text = "a".repeat(150);
        let name = short(&text);
        assert!(name.len() <= MAX_NAME_LEN);
        assert!(ends_with_hash(&name), "{name}");
    }

    #[test]
    fn long_joined_name_is_cut_at_59() {
        let text = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        assert!(text.len() <= MAX_INPUT_LEN);
        let name = short(text);
        assert!(name.len() <= MAX_NAME_LEN);
        assert!(ends_with_hash(&name));
        assert!(name.starts_with("alpha_bravo_charlie"));
    }

    #[test]
    fn hash_distinguishes_shared_prefixes() {
        let base = "x".repeat(120);
        let a = short(&format!("{base} first"));
        let b = short(&format!("{base} second"));
        assert_ne!(a, b);
    }

    #[test]
    fn is_deterministic() {
        let text = "Create a new Deployment Environment for the Organization's Repository";
        for ns in [None, Some("github")] {
            for disabled in [false, true] {
                assert_eq!(
                    abbreviate(text, disabled, ns).unwrap(),
                    abbreviate(text, disabled, ns).unwrap()
                );
            }
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(abbreviate("", false, None), Err(NamingError::EmptyInput));
        assert_eq!(abbreviate("", true, Some("ns")), Err(NamingError::EmptyInput));
    }

    #[test]
    fn symbol_only_input_is_empty_name() {
        assert_eq!(short("  --- !!! "), "");
        assert_eq!(abbreviate("***", true, None).unwrap(), "");
    }

    #[test]
    fn disabled_only_sanitizes() {
        assert_eq!(
            abbreviate("getUserServiceController", true, None).unwrap(),
            "getuserservicecontroller"
        );
        let long = "word ".repeat(40);
        let name = abbreviate(&long, true, None).unwrap();
        assert!(name.len() > MAX_NAME_LEN);
        assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
    }

    #[test]
    fn namespace_is_sanitized_not_abbreviated() {
        assert_eq!(
            abbreviate("getUserServiceController", false, Some("My Service!")).unwrap(),
            "my_service_get_user"
        );
    }

    #[test]
    fn namespace_keeps_length_bound() {
        let text = "z".repeat(30) + " " + &"y".repeat(30) + " tail";
        let name = abbreviate(&text, false, Some("inventory_platform")).unwrap();
        assert!(name.len() <= MAX_NAME_LEN, "{name}");
        assert!(name.starts_with("inventory_platform_"));
        assert!(ends_with_hash(&name));
    }

    #[test]
    fn oversized_namespace_still_bounded() {
        let ns = "n".repeat(70);
        let name = abbreviate("listItems", false, Some(&ns)).unwrap();
        assert!(name.len() <= MAX_NAME_LEN);
        assert!(ends_with_hash(&name));
    }

    #[test]
    fn empty_namespace_is_ignored() {
        assert_eq!(abbreviate("listItems", false, Some("%%")).unwrap(), "list_items");
    }

    #[test]
    fn output_charset() {
        for text in ["Ünïcödé names — with dashes", "CamelCase_and-kebab.case", "123abc"] {
            let name = short(text);
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "{name}"
            );
        }
    }

    #[test]
    fn options_builder() {
        let options = NamingOptions::new().with_namespace("gh");
        assert_eq!(abbreviate_with("getRepository", &options).unwrap(), "gh_get_repo");
        let options = options.with_abbreviation_disabled(true);
        assert_eq!(abbreviate_with("getRepository", &options).unwrap(), "gh_getrepository");
    }

    #[test]
    fn content_hash_is_stable_hex() {
        assert_eq!(content_hash("abc"), "ba78");
        assert_eq!(content_hash("abc").len(), HASH_LEN);
    }
}
