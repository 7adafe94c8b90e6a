use crate::foundation::error::{CutlineError, CutlineResult};
use crate::foundation::time::RationalTime;

/// Standard frame rates with their exact frame durations.
///
/// Fractional NTSC rates carry the exact 1001-based duration (23.98 fps is
/// 1001/24000 seconds per frame, not 1/23.98), so frame math never drifts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FrameRate {
    /// 23.976 fps (NTSC film).
    Fps23_98,
    /// 24 fps (film).
    Fps24,
    /// 25 fps (PAL).
    Fps25,
    /// 29.97 fps (NTSC).
    Fps29_97,
    /// 30 fps.
    Fps30,
    /// 50 fps (PAL double).
    Fps50,
    /// 59.94 fps (NTSC double).
    Fps59_94,
    /// 60 fps.
    Fps60,
}

impl FrameRate {
    /// Exact duration of one frame.
    pub fn frame_duration(self) -> RationalTime {
        let (value, timescale) = match self {
            Self::Fps23_98 => (1001, 24000),
            Self::Fps24 => (100, 2400),
            Self::Fps25 => (100, 2500),
            Self::Fps29_97 => (1001, 30000),
            Self::Fps30 => (100, 3000),
            Self::Fps50 => (100, 5000),
            Self::Fps59_94 => (1001, 60000),
            Self::Fps60 => (100, 6000),
        };
        RationalTime { value, timescale }
    }

    /// Human-readable label, e.g. `"23.98 fps"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fps23_98 => "23.98 fps",
            Self::Fps24 => "24 fps",
            Self::Fps25 => "25 fps",
            Self::Fps29_97 => "29.97 fps",
            Self::Fps30 => "30 fps",
            Self::Fps50 => "50 fps",
            Self::Fps59_94 => "59.94 fps",
            Self::Fps60 => "60 fps",
        }
    }

    /// Rate token used in canonical format names, e.g. `"2398"`.
    pub fn name_token(self) -> &'static str {
        match self {
            Self::Fps23_98 => "2398",
            Self::Fps24 => "24",
            Self::Fps25 => "25",
            Self::Fps29_97 => "2997",
            Self::Fps30 => "30",
            Self::Fps50 => "50",
            Self::Fps59_94 => "5994",
            Self::Fps60 => "60",
        }
    }

    /// Approximate frames per second, for display and estimation only.
    pub fn as_f64(self) -> f64 {
        let d = self.frame_duration();
        f64::from(d.timescale) / d.value as f64
    }
}

/// Color space identifiers with their interchange-format strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ColorSpace {
    /// Rec. 601 (NTSC).
    Rec601Ntsc,
    /// Rec. 601 (PAL).
    Rec601Pal,
    /// Rec. 709 (HD).
    Rec709,
    /// Rec. 2020 (UHD).
    Rec2020,
}

impl ColorSpace {
    /// The color-space string emitted in serialized format resources.
    pub fn interchange_name(self) -> &'static str {
        match self {
            Self::Rec601Ntsc => "5-1-6 (Rec. 601 (NTSC))",
            Self::Rec601Pal => "6-1-6 (Rec. 601 (PAL))",
            Self::Rec709 => "1-1-1 (Rec. 709)",
            Self::Rec2020 => "9-1-9 (Rec. 2020)",
        }
    }
}

/// An immutable video format: dimensions, rate, color space, scan mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct VideoFormat {
    /// Frame width in pixels. Must be > 0.
    pub width: u32,
    /// Frame height in pixels. Must be > 0.
    pub height: u32,
    /// Timeline frame rate.
    pub frame_rate: FrameRate,
    /// Color space of the output.
    pub color_space: ColorSpace,
    /// True for interlaced scan.
    pub interlaced: bool,
}

impl VideoFormat {
    /// Build a format, rejecting degenerate dimensions.
    pub fn new(
        width: u32,
        height: u32,
        frame_rate: FrameRate,
        color_space: ColorSpace,
        interlaced: bool,
    ) -> CutlineResult<Self> {
        if width == 0 || height == 0 {
            return Err(CutlineError::invalid_format(format!(
                "dimensions must be > 0, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            frame_rate,
            color_space,
            interlaced,
        })
    }

    /// The common 1920x1080 progressive Rec. 709 format at `rate`.
    pub fn hd_1080(rate: FrameRate) -> Self {
        Self {
            width: 1920,
            height: 1080,
            frame_rate: rate,
            color_space: ColorSpace::Rec709,
            interlaced: false,
        }
    }

    /// Width over height, for display and estimation only.
    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Exact duration of one frame at this format's rate.
    pub fn frame_duration(self) -> RationalTime {
        self.frame_rate.frame_duration()
    }

    /// Canonical format name, the serializer's de-duplication key.
    ///
    /// Standard HD/UHD frames use the short editor-recognized names
    /// (`FFVideoFormat1080p2398`); everything else spells out the
    /// dimensions (`FFVideoFormat1440x1080p25`).
    pub fn name(self) -> String {
        let scan = if self.interlaced { "i" } else { "p" };
        let token = self.frame_rate.name_token();
        match (self.width, self.height) {
            (1920, 1080) => format!("FFVideoFormat1080{scan}{token}"),
            (1280, 720) => format!("FFVideoFormat720{scan}{token}"),
            (3840, 2160) => format!("FFVideoFormat3840x2160{scan}{token}"),
            (w, h) => format!("FFVideoFormat{w}x{h}{scan}{token}"),
        }
    }
}

/// Audio channel layout emitted on serialized sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AudioLayout {
    /// Single channel.
    Mono,
    /// Two channels.
    Stereo,
    /// Multichannel surround.
    Surround,
}

impl AudioLayout {
    /// The attribute value emitted in serialized sequences.
    pub fn interchange_name(self) -> &'static str {
        match self {
            Self::Mono => "mono",
            Self::Stereo => "stereo",
            Self::Surround => "surround",
        }
    }
}

/// Audio sample rate emitted on serialized sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AudioRate {
    /// 44100 Hz.
    Hz44_1k,
    /// 48000 Hz.
    Hz48k,
}

impl AudioRate {
    /// The attribute value emitted in serialized sequences.
    pub fn interchange_name(self) -> &'static str {
        match self {
            Self::Hz44_1k => "44.1k",
            Self::Hz48k => "48k",
        }
    }

    /// Samples per second.
    pub fn sample_rate(self) -> u32 {
        match self {
            Self::Hz44_1k => 44_100,
            Self::Hz48k => 48_000,
        }
    }
}
