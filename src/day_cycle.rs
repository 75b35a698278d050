//! Surface colors over the course of a day.
//!
//! The day is split into an ordered, cyclic list of segments. Each segment
//! starts at an anchor turn and carries a base color; the color for any turn is
//! a linear blend from the current segment's color toward the next one's,
//! weighted by how far the turn is between the two anchors.

use std::cell::OnceCell;

use crate::color::ColorSample;
use crate::color_utils;
use crate::constants::{MAX_TURNS_PER_DAY, TURNS_PER_DAY};
use crate::error::DayCycleError;

/// The stock day: `(name, anchor turn, base RGB8, brightness relative to the default background)`.
///
/// Midnight is the segment whose range crosses turn 0.
pub const STANDARD_SEGMENTS: [(&str, u32, [u8; 3], f32); 10] = [
    ("dawn", 325, [16, 60, 57], 0.875),
    ("sunrise", 422, [63, 165, 187], 0.875),
    ("morning", 518, [121, 192, 206], 1.0),
    ("midday", 615, [121, 192, 206], 1.0),
    ("afternoon", 711, [121, 192, 206], 1.0),
    ("sunset", 808, [165, 74, 46], 0.875),
    ("twilight", 904, [57, 40, 79], 0.875),
    ("evening", 1000, [0, 44, 41], 0.75),
    ("midnight", 1175, [0, 44, 41], 0.75),
    ("late", 150, [0, 44, 41], 0.75),
];

/// One slice of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySegment {
    name: String,
    anchor: u32,
    color: ColorSample,
}

impl DaySegment {
    /// Create a segment with an already-resolved color.
    pub fn new(name: impl Into<String>, anchor: u32, color: ColorSample) -> Self {
        Self {
            name: name.into(),
            anchor,
            color,
        }
    }

    /// Create a segment whose brightness is `fraction` of `reference`'s brightness.
    ///
    /// Hue and saturation come from `base`.
    pub fn with_relative_brightness(
        name: impl Into<String>,
        anchor: u32,
        base: ColorSample,
        fraction: f32,
        reference: ColorSample,
    ) -> Self {
        let color = color_utils::override_brightness(base, fraction * reference.brightness());
        Self::new(name, anchor, color)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Turn at which this segment starts.
    pub fn anchor(&self) -> u32 {
        self.anchor
    }

    pub fn color(&self) -> ColorSample {
        self.color
    }
}

/// Cyclic lookup from turn number to surface color.
///
/// Colors are memoized per turn on first use. The memo only caches the pure
/// computation and never changes what a lookup returns.
#[derive(Debug, Clone)]
pub struct DaySegmentTable {
    turns_per_day: u32,
    segments: Vec<DaySegment>,
    memo: Vec<OnceCell<ColorSample>>,
}

impl DaySegmentTable {
    /// Build a table, checking that the segments cover every turn exactly once.
    ///
    /// Segments must be listed in cyclic order: anchors increase except for a
    /// single wrap back past turn 0, all anchors are distinct and lie inside the
    /// day.
    pub fn new(turns_per_day: u32, segments: Vec<DaySegment>) -> Result<Self, DayCycleError> {
        validate(turns_per_day, &segments)?;
        Ok(Self::from_validated(turns_per_day, segments))
    }

    /// The stock ten-segment day, normalized against `reference`.
    pub fn standard(reference: ColorSample) -> Self {
        let segments = STANDARD_SEGMENTS
            .iter()
            .map(|&(name, anchor, rgb, fraction)| {
                DaySegment::with_relative_brightness(
                    name,
                    anchor,
                    ColorSample::from_rgb8(rgb),
                    fraction,
                    reference,
                )
            })
            .collect();
        Self::from_validated(TURNS_PER_DAY, segments)
    }

    fn from_validated(turns_per_day: u32, segments: Vec<DaySegment>) -> Self {
        Self {
            turns_per_day,
            segments,
            memo: vec![OnceCell::new(); turns_per_day as usize],
        }
    }

    pub fn turns_per_day(&self) -> u32 {
        self.turns_per_day
    }

    pub fn segments(&self) -> &[DaySegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn check_turn(&self, turn: i32) -> Result<u32, DayCycleError> {
        match u32::try_from(turn) {
            Ok(t) if t < self.turns_per_day => Ok(t),
            _ => {
                log::error!(
                    "Turn {} outside [0, {}); world state and day table disagree",
                    turn,
                    self.turns_per_day
                );
                Err(DayCycleError::TurnOutOfRange {
                    turn,
                    turns_per_day: self.turns_per_day,
                })
            }
        }
    }

    fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.segments.len()
    }

    /// Index of the segment containing `turn`.
    pub fn segment_index_for(&self, turn: i32) -> Result<usize, DayCycleError> {
        let turn = self.check_turn(turn)?;
        self.index_for_checked(turn)
    }

    fn index_for_checked(&self, turn: u32) -> Result<usize, DayCycleError> {
        for (i, segment) in self.segments.iter().enumerate() {
            let lower = segment.anchor;
            let upper = self.segments[self.next_index(i)].anchor;
            let inside = if upper > lower {
                lower <= turn && turn < upper
            } else {
                // range crosses turn 0
                lower <= turn || turn < upper
            };
            if inside {
                return Ok(i);
            }
        }
        Err(DayCycleError::invalid_table(format!(
            "no segment contains turn {turn}"
        )))
    }

    /// How far `turn` is from its segment's anchor toward the next one, in `[0, 1)`.
    pub fn progress_within_segment(&self, turn: i32) -> Result<f32, DayCycleError> {
        let turn = self.check_turn(turn)?;
        let index = self.index_for_checked(turn)?;
        Ok(self.progress_checked(turn, index))
    }

    fn progress_checked(&self, turn: u32, index: usize) -> f32 {
        let day = u64::from(self.turns_per_day);
        let start = u64::from(self.segments[index].anchor);
        let mut end = u64::from(self.segments[self.next_index(index)].anchor);
        let mut turn = u64::from(turn);
        // unwrap the end (and the turn, inside the wrap segment) past the day boundary
        if end <= start {
            end += day;
        }
        if turn < start {
            turn += day;
        }
        (turn - start) as f32 / (end - start) as f32
    }

    /// Surface color for `turn`.
    pub fn color_for_turn(&self, turn: i32) -> Result<ColorSample, DayCycleError> {
        let checked = self.check_turn(turn)?;
        let cell = &self.memo[checked as usize];
        if let Some(color) = cell.get() {
            return Ok(*color);
        }
        let color = self.compute_color(checked)?;
        let _ = cell.set(color);
        Ok(color)
    }

    fn compute_color(&self, turn: u32) -> Result<ColorSample, DayCycleError> {
        let index = self.index_for_checked(turn)?;
        let from = self.segments[index].color;
        let to = self.segments[self.next_index(index)].color;
        Ok(from.lerp(to, self.progress_checked(turn, index)))
    }
}

fn validate(turns_per_day: u32, segments: &[DaySegment]) -> Result<(), DayCycleError> {
    if turns_per_day == 0 || turns_per_day > MAX_TURNS_PER_DAY {
        return Err(DayCycleError::InvalidDayLength { turns_per_day });
    }
    if segments.is_empty() {
        return Err(DayCycleError::invalid_table("no segments"));
    }

    for segment in segments {
        if segment.anchor >= turns_per_day {
            return Err(DayCycleError::invalid_table(format!(
                "segment '{}' anchored at turn {} outside a {}-turn day",
                segment.name, segment.anchor, turns_per_day
            )));
        }
    }

    if segments.len() == 1 {
        return Ok(());
    }

    // Distinct anchors in cyclic order wrap around exactly once, so the spans
    // add up to exactly one day.
    let mut total: u64 = 0;
    for (i, segment) in segments.iter().enumerate() {
        let next = &segments[(i + 1) % segments.len()];
        if next.anchor == segment.anchor {
            return Err(DayCycleError::invalid_table(format!(
                "segments '{}' and '{}' share anchor {}",
                segment.name, next.name, segment.anchor
            )));
        }
        let day = u64::from(turns_per_day);
        total += (u64::from(next.anchor) + day - u64::from(segment.anchor)) % day;
    }

    if total != u64::from(turns_per_day) {
        return Err(DayCycleError::invalid_table(format!(
            "segments are not in cyclic order (spans cover {total} turns of {turns_per_day})"
        )));
    }
    Ok(())
}
