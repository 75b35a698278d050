//! Destinations for committed and transitional colors.

use crate::color::ColorSample;

/// Receives every color the engine decides to show.
///
/// `is_final` is `true` for committed colors and `false` for intermediate
/// crossfade steps.
pub trait ColorSink {
    fn set(&mut self, color: ColorSample, is_final: bool);
}

/// A missing sink drops pushes silently.
impl<S: ColorSink> ColorSink for Option<S> {
    fn set(&mut self, color: ColorSample, is_final: bool) {
        if let Some(sink) = self {
            sink.set(color, is_final);
        }
    }
}

impl<S: ColorSink + ?Sized> ColorSink for &mut S {
    fn set(&mut self, color: ColorSample, is_final: bool) {
        (**self).set(color, is_final);
    }
}

impl<S: ColorSink + ?Sized> ColorSink for Box<S> {
    fn set(&mut self, color: ColorSample, is_final: bool) {
        (**self).set(color, is_final);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ColorSink for NullSink {
    fn set(&mut self, _color: ColorSample, _is_final: bool) {}
}

/// A single push received by a [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkPush {
    pub color: ColorSample,
    pub is_final: bool,
}

/// Keeps every push in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pushes: Vec<SinkPush>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushes(&self) -> &[SinkPush] {
        &self.pushes
    }

    /// Most recent push, final or not.
    pub fn last(&self) -> Option<SinkPush> {
        self.pushes.last().copied()
    }

    /// Most recent committed color.
    pub fn last_final(&self) -> Option<ColorSample> {
        self.pushes
            .iter()
            .rev()
            .find(|p| p.is_final)
            .map(|p| p.color)
    }

    /// All committed colors, oldest first.
    pub fn finals(&self) -> impl Iterator<Item = ColorSample> + '_ {
        self.pushes.iter().filter(|p| p.is_final).map(|p| p.color)
    }

    pub fn len(&self) -> usize {
        self.pushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pushes.is_empty()
    }

    pub fn clear(&mut self) {
        self.pushes.clear();
    }
}

impl ColorSink for RecordingSink {
    fn set(&mut self, color: ColorSample, is_final: bool) {
        self.pushes.push(SinkPush { color, is_final });
    }
}
