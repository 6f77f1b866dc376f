//! Audio format selection.
//!
//! Maps the user's format choice to the codec handed to the acquisition engine
//! and the quality it should transcode at. Lossless formats carry no quality
//! parameter at all rather than a numeric default.

use std::{fmt, str::FromStr};

use crate::errors::{Error, Result};

/// Bitrate used for the lossy formats, in kbit/s.
pub const LOSSY_QUALITY: &str = "192";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Flac,
    M4a,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 4] = [
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::Flac,
        AudioFormat::M4a,
    ];

    /// Codec identifier understood by yt-dlp's `--audio-format`.
    pub fn codec(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
            AudioFormat::M4a => "m4a",
        }
    }

    /// Transcode quality, absent for lossless formats.
    pub fn quality(&self) -> Option<&'static str> {
        match self {
            AudioFormat::Mp3 | AudioFormat::M4a => Some(LOSSY_QUALITY),
            AudioFormat::Wav | AudioFormat::Flac => None,
        }
    }

    /// File extension of the transcoded output.
    pub fn extension(&self) -> &'static str {
        self.codec()
    }

    /// Number shown next to the format in the interactive prompt.
    pub fn choice(&self) -> u8 {
        match self {
            AudioFormat::Mp3 => 1,
            AudioFormat::Wav => 2,
            AudioFormat::Flac => 3,
            AudioFormat::M4a => 4,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.codec().to_uppercase())
    }
}

impl FromStr for AudioFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let choice = s.trim().to_lowercase();
        AudioFormat::ALL
            .into_iter()
            .find(|format| choice == format.choice().to_string() || choice == format.codec())
            .ok_or_else(|| Error::InvalidFormatChoice(s.to_string()))
    }
}

/// Validates a menu choice ("1" to "4") and returns the codec and quality pair.
pub fn validate(choice: &str) -> Result<(&'static str, Option<&'static str>)> {
    let format = AudioFormat::ALL
        .into_iter()
        .find(|format| choice.trim() == format.choice().to_string())
        .ok_or_else(|| Error::InvalidFormatChoice(choice.to_string()))?;

    Ok((format.codec(), format.quality()))
}

/// clap value parser accepting either the menu number or the codec name.
pub fn parse_format(s: &str) -> std::result::Result<AudioFormat, String> {
    s.parse::<AudioFormat>().map_err(|e| e.to_string())
}
