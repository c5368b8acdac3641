use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Size of the top-level frame that hosts imported elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl Default for FrameSize {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 1024,
        }
    }
}

#[derive(Debug, Error)]
pub enum FrameSizeParseError {
    #[error("Invalid frame size: expected WIDTHxHEIGHT (e.g., 1440x1024)")]
    InvalidFormat,
    #[error("Invalid width: {0}")]
    InvalidWidth(String),
    #[error("Invalid height: {0}")]
    InvalidHeight(String),
    #[error("Frame width must be positive")]
    ZeroWidth,
    #[error("Frame height must be positive")]
    ZeroHeight,
}

impl FromStr for FrameSize {
    type Err = FrameSizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or(FrameSizeParseError::InvalidFormat)?;
        if h.contains(['x', 'X']) {
            return Err(FrameSizeParseError::InvalidFormat);
        }

        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| FrameSizeParseError::InvalidWidth(w.to_string()))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| FrameSizeParseError::InvalidHeight(h.to_string()))?;

        if width == 0 {
            return Err(FrameSizeParseError::ZeroWidth);
        }
        if height == 0 {
            return Err(FrameSizeParseError::ZeroHeight);
        }

        Ok(FrameSize { width, height })
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// Config files and JSON output use the same "WIDTHxHEIGHT" string form as the CLI.
impl Serialize for FrameSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FrameSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
