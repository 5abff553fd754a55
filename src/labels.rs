//! Closed label vocabularies produced by the perception pipeline.
//!
//! The perception collaborator classifies pixels; this core only ever sees
//! the two enumerations below. Anything the classifier emits that is not part
//! of the vocabulary folds into `Unknown` so downstream components never have
//! to handle an error case.

use core::fmt;

// ─── GestureLabel ───────────────────────────────────────────────────────────

/// Raw or stabilised hand gesture classification for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum GestureLabel {
    /// No hand in view.
    #[default]
    None,
    /// All five fingers extended. Reserved for the global control toggle.
    OpenPalm,
    /// All fingers curled.
    Fist,
    /// Index finger extended, the rest curled.
    Point,
    /// Thumb and index fingertips touching.
    Pinch,
    /// A hand is visible but matches no known pose.
    Unknown,
}

impl GestureLabel {
    /// Every label, in declaration order.
    pub const ALL: [GestureLabel; 6] = [
        GestureLabel::None,
        GestureLabel::OpenPalm,
        GestureLabel::Fist,
        GestureLabel::Point,
        GestureLabel::Pinch,
        GestureLabel::Unknown,
    ];

    /// Canonical upper-snake name, as emitted by the perception pipeline.
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::None => "NONE",
            GestureLabel::OpenPalm => "OPEN_PALM",
            GestureLabel::Fist => "FIST",
            GestureLabel::Point => "POINT",
            GestureLabel::Pinch => "PINCH",
            GestureLabel::Unknown => "UNKNOWN",
        }
    }

    /// Parse a perception label, case-insensitively.
    ///
    /// `NO_HAND` and the empty string mean no hand; unrecognised strings
    /// fold into [`GestureLabel::Unknown`].
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty()
            || raw.eq_ignore_ascii_case("NONE")
            || raw.eq_ignore_ascii_case("NO_HAND")
        {
            GestureLabel::None
        } else if raw.eq_ignore_ascii_case("OPEN_PALM") {
            GestureLabel::OpenPalm
        } else if raw.eq_ignore_ascii_case("FIST") {
            GestureLabel::Fist
        } else if raw.eq_ignore_ascii_case("POINT") {
            GestureLabel::Point
        } else if raw.eq_ignore_ascii_case("PINCH") {
            GestureLabel::Pinch
        } else {
            GestureLabel::Unknown
        }
    }

    /// `true` when a hand is in view, recognised or not.
    pub fn is_hand(&self) -> bool {
        !matches!(self, GestureLabel::None)
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ─── IdentityLabel ──────────────────────────────────────────────────────────

/// Face identity verdict for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum IdentityLabel {
    /// No face analysed.
    #[default]
    None,
    /// A face is visible but no reference identity has been enrolled.
    Unregistered,
    /// A face is visible and does not match the enrolled identity.
    Unknown,
    /// A face is visible and matches the enrolled identity.
    Authorized,
}

impl IdentityLabel {
    /// Canonical upper-snake name.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityLabel::None => "NONE",
            IdentityLabel::Unregistered => "UNREGISTERED",
            IdentityLabel::Unknown => "UNKNOWN",
            IdentityLabel::Authorized => "AUTHORIZED",
        }
    }

    /// Parse a perception label, case-insensitively. Empty means `None`;
    /// anything unrecognised is treated as an unknown face.
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("NONE") {
            IdentityLabel::None
        } else if raw.eq_ignore_ascii_case("UNREGISTERED") {
            IdentityLabel::Unregistered
        } else if raw.eq_ignore_ascii_case("AUTHORIZED") {
            IdentityLabel::Authorized
        } else {
            IdentityLabel::Unknown
        }
    }

    /// `true` for the one verdict that locks immediately.
    pub fn is_intruder(&self) -> bool {
        matches!(self, IdentityLabel::Unknown)
    }
}

impl fmt::Display for IdentityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
