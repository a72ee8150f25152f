//! Core data structures for the ideaforge application.
//!
//! This module contains the primary types used throughout the application:
//! the canonical [`Idea`] record, the [`Complexity`] enumeration, the
//! [`Favorite`] persistence envelope, and the stable identity function.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator used when joining title and description for the identity hash.
/// U+001F (unit separator) does not occur in normal text, so "ab" + "c" and
/// "a" + "bc" hash differently.
const ID_SEPARATOR: char = '\u{1f}';

/// Complexity rating of an idea. Closed set; anything the backend sends that
/// is not recognized collapses to [`Complexity::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Simple,
    Medium,
    Hard,
}

impl Complexity {
    /// Maps a raw backend value to a complexity rating.
    ///
    /// The backend is prompted to answer in Korean, so the accepted spellings
    /// are "간단"/"쉬움" for simple and "어려움"/"고급" for hard. Everything
    /// else, including "중간" and unrecognized or empty text, is Medium.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "간단" | "쉬움" => Complexity::Simple,
            "어려움" | "고급" => Complexity::Hard,
            _ => Complexity::Medium,
        }
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Complexity::Medium
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Complexity::Simple => "Simple",
            Complexity::Medium => "Medium",
            Complexity::Hard => "Hard",
        };
        write!(f, "{}", label)
    }
}

/// A single canonical idea record as produced by normalization.
///
/// Records are created once per generation response and are immutable
/// afterward; favoriting wraps them in a [`Favorite`] without touching the
/// record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    /// Stable identity derived from title and description
    pub id: String,
    /// Idea title
    pub title: String,
    /// Short description of the idea
    pub description: String,
    /// Complexity rating
    pub complexity: Complexity,
    /// Whether the idea is considered monetizable
    pub monetizable: bool,
    /// Free-text category ("Other" when the backend omits it)
    pub category: String,
    /// Optional tags; absent when the backend did not send an array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Idea {
    /// Creates a new idea, deriving its identity from title and description.
    /// Title and description are expected to be already trimmed and
    /// non-empty; normalization enforces that before calling here.
    pub fn new(
        title: String,
        description: String,
        complexity: Complexity,
        monetizable: bool,
        category: String,
        tags: Option<Vec<String>>,
    ) -> Self {
        let id = stable_id(&title, &description);

        Idea {
            id,
            title,
            description,
            complexity,
            monetizable,
            category,
            tags,
        }
    }
}

/// Persistence envelope for a favorited idea. The idea stays immutable; the
/// save timestamp lives here, not on the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    /// The favorited idea
    pub idea: Idea,
    /// When the idea was promoted into the favorites collection
    pub saved_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(idea: Idea) -> Self {
        Favorite {
            idea,
            saved_at: Utc::now(),
        }
    }
}

/// Computes the stable identity for a (title, description) pair.
///
/// Folds the UTF-8 bytes of `title`, a fixed separator, and `description`
/// into a 32-bit accumulator (`acc = acc * 31 + byte`, wrapping) and renders
/// it as lowercase hex with a fixed `id_` prefix. Deterministic and cheap,
/// but not collision-resistant: distinct pairs can collide with probability
/// consistent with a 32-bit hash.
pub fn stable_id(title: &str, description: &str) -> String {
    let key = format!("{}{}{}", title, ID_SEPARATOR, description);

    let mut acc: u32 = 0;
    for byte in key.as_bytes() {
        acc = acc.wrapping_mul(31).wrapping_add(u32::from(*byte));
    }

    format!("id_{:x}", acc)
}
