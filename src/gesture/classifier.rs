//! Geometric hand-pose predicates.
//!
//! Image coordinates: y grows downward, so a smaller y means "raised".
//! Every predicate is total; an incomplete frame matches nothing.

use super::landmark::{planar_distance, HandLandmark, Landmark, LandmarkFrame};

/// Thumb-tip to index-tip distance, in normalized image units, below which
/// the two are considered touching.
pub const PINCH_DISTANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// (base, middle, tip) joints. For the thumb these are MCP, IP and tip.
    pub const fn joints(self) -> (HandLandmark, HandLandmark, HandLandmark) {
        match self {
            Finger::Thumb => (HandLandmark::ThumbMcp, HandLandmark::ThumbIp, HandLandmark::ThumbTip),
            Finger::Index => (HandLandmark::IndexMcp, HandLandmark::IndexPip, HandLandmark::IndexTip),
            Finger::Middle => (
                HandLandmark::MiddleMcp,
                HandLandmark::MiddlePip,
                HandLandmark::MiddleTip,
            ),
            Finger::Ring => (HandLandmark::RingMcp, HandLandmark::RingPip, HandLandmark::RingTip),
            Finger::Pinky => (HandLandmark::PinkyMcp, HandLandmark::PinkyPip, HandLandmark::PinkyTip),
        }
    }
}

pub fn is_finger_extended(tip: &Landmark, pip: &Landmark, mcp: &Landmark) -> bool {
    tip.y < pip.y && pip.y < mcp.y
}

pub fn is_finger_folded(tip: &Landmark, pip: &Landmark) -> bool {
    tip.y > pip.y
}

fn joints_of<'a>(
    frame: &'a LandmarkFrame,
    finger: Finger,
) -> Option<(&'a Landmark, &'a Landmark, &'a Landmark)> {
    let (mcp, pip, tip) = finger.joints();
    Some((frame.point(mcp)?, frame.point(pip)?, frame.point(tip)?))
}

pub fn finger_extended(frame: &LandmarkFrame, finger: Finger) -> bool {
    joints_of(frame, finger).is_some_and(|(mcp, pip, tip)| is_finger_extended(tip, pip, mcp))
}

pub fn finger_folded(frame: &LandmarkFrame, finger: Finger) -> bool {
    joints_of(frame, finger).is_some_and(|(_, pip, tip)| is_finger_folded(tip, pip))
}

fn two_fingers(frame: &LandmarkFrame) -> bool {
    finger_extended(frame, Finger::Index)
        && finger_extended(frame, Finger::Middle)
        && finger_folded(frame, Finger::Ring)
        && finger_folded(frame, Finger::Pinky)
}

fn open_palm(frame: &LandmarkFrame) -> bool {
    [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky]
        .into_iter()
        .all(|finger| finger_extended(frame, finger))
}

fn ok_sign(frame: &LandmarkFrame) -> bool {
    let pinched = match (
        frame.point(HandLandmark::ThumbTip),
        frame.point(HandLandmark::IndexTip),
    ) {
        (Some(thumb), Some(index)) => planar_distance(thumb, index) < PINCH_DISTANCE,
        _ => false,
    };

    pinched
        && finger_extended(frame, Finger::Middle)
        && finger_extended(frame, Finger::Ring)
        && finger_extended(frame, Finger::Pinky)
}

fn thumbs_up(frame: &LandmarkFrame) -> bool {
    finger_extended(frame, Finger::Thumb)
        && [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky]
            .into_iter()
            .all(|finger| finger_folded(frame, finger))
}

#[derive(Clone, Copy)]
pub struct GestureDefinition {
    pub name: &'static str,
    pub symbol: &'static str,
    predicate: fn(&LandmarkFrame) -> bool,
}

impl GestureDefinition {
    pub const fn new(
        name: &'static str,
        symbol: &'static str,
        predicate: fn(&LandmarkFrame) -> bool,
    ) -> Self {
        Self {
            name,
            symbol,
            predicate,
        }
    }

    pub fn matches(&self, frame: &LandmarkFrame) -> bool {
        frame.is_complete() && (self.predicate)(frame)
    }
}

impl std::fmt::Debug for GestureDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureDefinition")
            .field("name", &self.name)
            .field("symbol", &self.symbol)
            .finish()
    }
}

impl PartialEq for GestureDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

pub const OPEN_PALM: GestureDefinition = GestureDefinition::new("open_palm", "✋", open_palm);
pub const TWO_FINGERS: GestureDefinition = GestureDefinition::new("two_fingers", "✌️", two_fingers);
pub const OK_SIGN: GestureDefinition = GestureDefinition::new("ok_sign", "👌", ok_sign);
pub const THUMBS_UP: GestureDefinition = GestureDefinition::new("thumbs_up", "👍", thumbs_up);

pub static CATALOGUE: [GestureDefinition; 4] = [OPEN_PALM, TWO_FINGERS, OK_SIGN, THUMBS_UP];

// Emoji arrive with or without the U+FE0F presentation selector.
fn strip_variation(symbol: &str) -> String {
    symbol.chars().filter(|c| *c != '\u{FE0F}').collect()
}

/// Looks a gesture up by its name or its emoji symbol.
pub fn find_gesture(key: &str) -> Option<&'static GestureDefinition> {
    let key = key.trim();
    let bare = strip_variation(key);
    CATALOGUE
        .iter()
        .find(|g| g.name.eq_ignore_ascii_case(key) || strip_variation(g.symbol) == bare)
}

/// One boolean per catalogue entry, in catalogue order.
pub fn classify(frame: &LandmarkFrame) -> Vec<(&'static str, bool)> {
    CATALOGUE
        .iter()
        .map(|g| (g.name, g.matches(frame)))
        .collect()
}
