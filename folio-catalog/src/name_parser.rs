//! Parser for the numbered filename conventions used in bulk media drops.
//!
//! Every convention leads with the record number, followed by an optional
//! slot letter and an optional title:
//! ```text
//! 078.jpg
//! 001a_alternate_view.jpg
//! 366 Since You Died, Life Goes On and On (4).jpg
//! 414King.jpg
//! 000001a.jpg
//! ```
//!
//! The rules are tried in a fixed order and the first match wins. Rules that
//! recover more structure come first so a looser rule never shadows them.
//! Rules 1-5 look at the file stem; rules 6 and 7 need the extension
//! boundary and look at the full name.

use serde::Serialize;

use crate::slot_name::{ID_WIDTH, split_extension};

/// The grammar rule that produced a match, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarRule {
    /// `12a Some Title`
    SuffixSpaceTitle,
    /// `12 Some Title`
    SpaceTitle,
    /// `12a_some_title`, `12a.some.title`
    SuffixSeparatorTitle,
    /// `12_some_title`, `12.some.title`
    SeparatorTitle,
    /// `12aTitle` (lowercase: slot letter) or `12Title` (uppercase: title)
    Attached,
    /// `12.jpg`
    BareNumber,
    /// `000012a.jpg`, the canonical stored form
    Canonical,
}

impl GrammarRule {
    /// 1-based position in the precedence list.
    pub fn number(&self) -> u8 {
        match self {
            GrammarRule::SuffixSpaceTitle => 1,
            GrammarRule::SpaceTitle => 2,
            GrammarRule::SuffixSeparatorTitle => 3,
            GrammarRule::SeparatorTitle => 4,
            GrammarRule::Attached => 5,
            GrammarRule::BareNumber => 6,
            GrammarRule::Canonical => 7,
        }
    }
}

/// Identity recovered from one dropped file name (or CSV id cell).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEntry {
    /// The name exactly as supplied.
    pub source_name: String,
    /// Record number, or `None` when no rule matched.
    pub record_id: Option<u32>,
    /// Requested slot letter. `None` requests the primary slot.
    pub slot_suffix: Option<char>,
    /// Free text recovered after the number, trimmed. May be empty.
    pub title_hint: String,
    /// Rule that matched, for diagnostics.
    pub rule: Option<GrammarRule>,
}

impl ParsedEntry {
    /// An entry no rule could interpret.
    pub fn unmatched(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            record_id: None,
            slot_suffix: None,
            title_hint: String::new(),
            rule: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.record_id.is_some()
    }

    /// True when this entry asks for the primary slot.
    pub fn is_primary(&self) -> bool {
        self.is_matched() && self.slot_suffix.is_none()
    }

    /// Extension of the source name including the dot, or "" if it has none.
    pub fn extension(&self) -> &str {
        split_extension(&self.source_name).1
    }
}

impl AsRef<ParsedEntry> for ParsedEntry {
    fn as_ref(&self) -> &ParsedEntry {
        self
    }
}

/// Parse a dropped filename into its record identity.
///
/// Never fails: names that match no rule come back with `record_id: None`
/// so callers can report them instead of dropping them.
///
/// # Examples
///
/// ```
/// use folio_catalog::name_parser::parse_filename;
///
/// let p = parse_filename("001a_alternate_view.jpg");
/// assert_eq!(p.record_id, Some(1));
/// assert_eq!(p.slot_suffix, Some('a'));
/// assert_eq!(p.title_hint, "alternate view");
///
/// let p = parse_filename("414King.jpg");
/// assert_eq!(p.record_id, Some(414));
/// assert_eq!(p.slot_suffix, None);
/// assert_eq!(p.title_hint, "King");
///
/// assert!(!parse_filename("cover.jpg").is_matched());
/// ```
pub fn parse_filename(name: &str) -> ParsedEntry {
    let (stem, _) = split_extension(name);

    let matched = match_stem(stem).or_else(|| match_full_name(name));

    match matched {
        Some(m) => ParsedEntry {
            source_name: name.to_string(),
            record_id: Some(m.record_id),
            slot_suffix: m.suffix,
            title_hint: m.title,
            rule: Some(m.rule),
        },
        None => ParsedEntry::unmatched(name),
    }
}

/// Resolve a record id from a free-form cell: a bare number, or anything
/// the filename grammar understands (e.g., "078.jpg", "12 Title").
///
/// Bare numbers follow the same 1..=6 digit limit as file names, so every
/// accepted id has a stored name that parses back to it.
pub fn parse_record_id(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return leading_digits(trimmed).map(|(id, _, _)| id);
    }
    parse_filename(trimmed).record_id
}

// ── Internal matching ───────────────────────────────────────────────────────

struct RuleMatch {
    record_id: u32,
    suffix: Option<char>,
    title: String,
    rule: GrammarRule,
}

impl RuleMatch {
    fn new(record_id: u32, suffix: Option<char>, title: String, rule: GrammarRule) -> Self {
        Self {
            record_id,
            suffix,
            title,
            rule,
        }
    }
}

/// Split off the leading run of ASCII digits.
///
/// Returns the record id, the run length, and the remainder. Runs longer
/// than [`ID_WIDTH`] match nothing: no rule can take a partial run because
/// the character after a shorter prefix would be another digit.
fn leading_digits(s: &str) -> Option<(u32, usize, &str)> {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 || len > ID_WIDTH {
        return None;
    }
    let id: u32 = s[..len].parse().ok()?;
    if id == 0 {
        return None;
    }
    Some((id, len, &s[len..]))
}

/// Rules 1-5, matched against the file stem.
fn match_stem(stem: &str) -> Option<RuleMatch> {
    let (id, _, rest) = leading_digits(stem)?;

    let mut chars = rest.chars();
    let first = chars.next()?;
    let after_first = chars.as_str();

    // Rule 1: digits, slot letter, whitespace, text
    if first.is_ascii_lowercase()
        && let Some(title) = whitespace_tail(after_first)
    {
        return Some(RuleMatch::new(
            id,
            Some(first),
            title,
            GrammarRule::SuffixSpaceTitle,
        ));
    }

    // Rule 2: digits, whitespace, text
    if let Some(title) = whitespace_tail(rest) {
        return Some(RuleMatch::new(id, None, title, GrammarRule::SpaceTitle));
    }

    // Rule 3: digits, slot letter, separator, text
    if first.is_ascii_lowercase()
        && let Some(text) = separator_tail(after_first)
    {
        return Some(RuleMatch::new(
            id,
            Some(first),
            separators_to_spaces(text),
            GrammarRule::SuffixSeparatorTitle,
        ));
    }

    // Rule 4: digits, separator, text
    if let Some(text) = separator_tail(rest) {
        return Some(RuleMatch::new(
            id,
            None,
            separators_to_spaces(text),
            GrammarRule::SeparatorTitle,
        ));
    }

    // Rule 5: digits directly followed by a letter and at least one more char.
    // A lowercase letter is the slot; an uppercase letter starts the title.
    if first.is_ascii_alphabetic() && !after_first.is_empty() {
        let m = if first.is_ascii_lowercase() {
            RuleMatch::new(
                id,
                Some(first),
                after_first.trim().to_string(),
                GrammarRule::Attached,
            )
        } else {
            RuleMatch::new(id, None, rest.trim().to_string(), GrammarRule::Attached)
        };
        return Some(m);
    }

    None
}

/// Rules 6-7, matched against the full name.
fn match_full_name(name: &str) -> Option<RuleMatch> {
    let (id, len, rest) = leading_digits(name)?;

    // Rule 6: digits then the extension boundary
    if rest.starts_with('.') {
        return Some(RuleMatch::new(id, None, String::new(), GrammarRule::BareNumber));
    }

    // Rule 7: canonical fixed-width id with a slot letter before the extension
    if len == ID_WIDTH {
        let mut chars = rest.chars();
        if let (Some(letter), Some('.')) = (chars.next(), chars.next())
            && letter.is_ascii_lowercase()
        {
            return Some(RuleMatch::new(
                id,
                Some(letter),
                String::new(),
                GrammarRule::Canonical,
            ));
        }
    }

    None
}

/// `\s+(.+)$`: leading whitespace followed by at least one more character.
fn whitespace_tail(s: &str) -> Option<String> {
    let mut chars = s.chars();
    let first = chars.next()?;
    if !first.is_whitespace() || chars.next().is_none() {
        return None;
    }
    Some(s.trim().to_string())
}

/// `[_.](.+)$`: a separator followed by at least one character.
fn separator_tail(s: &str) -> Option<&str> {
    let rest = s.strip_prefix(['_', '.'])?;
    if rest.is_empty() { None } else { Some(rest) }
}

fn separators_to_spaces(s: &str) -> String {
    s.replace(['_', '.'], " ").trim().to_string()
}
