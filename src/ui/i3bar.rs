//! i3bar/swaybar JSON protocol writer.

use std::io::Write;

use serde::Serialize;

use crate::core::metrics::{ColorTag, MetricSample};
use crate::error::{Result, StatusError};

const PROTOCOL_VERSION: u32 = 1;

const GRAY: &str = "#aaaaaa";
const RED: &str = "#ff9999";
const YELLOW: &str = "#ffff00";
const GREEN: &str = "#00ff00";
const BLACK: &str = "#000000";
const WHITE: &str = "#ffffff";

#[derive(Serialize)]
struct Header {
    version: u32,
}

#[derive(Serialize)]
struct Block<'a> {
    full_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<&'static str>,
}

impl<'a> From<&'a MetricSample> for Block<'a> {
    fn from(sample: &'a MetricSample) -> Self {
        let (color, background) = color_pair(sample.color);
        Block {
            full_text: &sample.text,
            color,
            background,
        }
    }
}

/// (text colour, background) for a tag
pub fn color_pair(tag: ColorTag) -> (Option<&'static str>, Option<&'static str>) {
    match tag {
        ColorTag::Default => (None, None),
        ColorTag::Gray => (Some(GRAY), None),
        ColorTag::Red => (Some(RED), None),
        ColorTag::RedBackground => (None, Some(RED)),
        ColorTag::Yellow => (Some(YELLOW), None),
        ColorTag::Green => (Some(GREEN), None),
        ColorTag::Inverted => (Some(BLACK), Some(WHITE)),
    }
}

/// Writes the preamble once, then one array of blocks per cycle
pub struct LineRenderer<W: Write> {
    out: W,
}

impl<W: Write> LineRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_preamble(&mut self) -> Result<()> {
        let header = serde_json::to_string(&Header {
            version: PROTOCOL_VERSION,
        })?;
        self.write_raw(&format!("{}\n[\n", header))
    }

    /// Emit one record and flush it
    pub fn write_line(&mut self, samples: &[MetricSample]) -> Result<()> {
        let blocks: Vec<Block<'_>> = samples.iter().map(Block::from).collect();
        let line = serde_json::to_string(&blocks)?;
        self.write_raw(&format!("{},\n", line))
    }

    fn write_raw(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(StatusError::from_write)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
