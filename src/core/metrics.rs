use serde::Serialize;

/// Colour attribute attached to one rendered block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ColorTag {
    #[default]
    Default,
    Gray,
    Red,
    RedBackground,
    Yellow,
    Green,
    /// Black text on a white background (notification blink)
    Inverted,
}

/// One metric's output for a single render pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricSample {
    pub text: String,
    pub color: ColorTag,
}

impl MetricSample {
    pub fn new<S: Into<String>>(text: S, color: ColorTag) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }

    pub fn plain<S: Into<String>>(text: S) -> Self {
        Self::new(text, ColorTag::Default)
    }

    pub fn gray<S: Into<String>>(text: S) -> Self {
        Self::new(text, ColorTag::Gray)
    }

    pub fn red<S: Into<String>>(text: S) -> Self {
        Self::new(text, ColorTag::Red)
    }
}
