//! Typed media metadata built from ffprobe's JSON output.
//!
//! Decoding happens in two phases. The text is first decoded into a generic
//! `serde_json::Value` and checked for the two sections every result needs: a
//! `format` object and a `streams` array. Each field is then projected into
//! the typed model on its own. A field with the wrong type is recorded as
//! absent, so one odd value does not throw away the rest of the result, while
//! a missing section fails the whole document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ProbeError, Result};

/// Kind of elementary stream.
///
/// `Attachment` covers fonts and cover art carried by Matroska files. Any
/// `codec_type` not listed here maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
    #[default]
    Unknown,
}

impl From<&str> for CodecType {
    fn from(s: &str) -> Self {
        match s {
            "video" => CodecType::Video,
            "audio" => CodecType::Audio,
            "subtitle" => CodecType::Subtitle,
            "data" => CodecType::Data,
            "attachment" => CodecType::Attachment,
            _ => CodecType::Unknown,
        }
    }
}

/// Container-level information.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormatInfo {
    /// Comma-separated demuxer names, e.g. `mov,mp4,m4a,3gp,3g2,mj2`
    pub format_name: Option<String>,
    pub format_long_name: Option<String>,
    /// Seconds, fractional
    pub duration: Option<f64>,
    pub start_time: Option<f64>,
    /// Bits per second
    pub bit_rate: Option<f64>,
    /// Bytes
    pub size: Option<u64>,
    /// Stream count as reported by the tool
    pub nb_streams: Option<u32>,
    pub probe_score: Option<u32>,
    pub tags: BTreeMap<String, String>,
}

impl FormatInfo {
    /// Individual names from `format_name`.
    pub fn format_names(&self) -> Vec<&str> {
        self.format_name
            .as_deref()
            .map(|names| {
                names
                    .split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One elementary stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamInfo {
    /// Absent when the tool's value was not an integer.
    pub index: Option<u32>,
    pub codec_type: CodecType,
    pub codec_name: Option<String>,
    pub codec_long_name: Option<String>,
    pub profile: Option<String>,

    // Video
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Frames per second, normalized from ratios such as `30000/1001`
    pub frame_rate: Option<f64>,
    pub pix_fmt: Option<String>,

    // Audio
    pub sample_rate: Option<u32>,
    pub channels: Option<u32>,
    pub channel_layout: Option<String>,

    pub duration: Option<f64>,
    pub bit_rate: Option<f64>,
    pub nb_frames: Option<u64>,
    pub tags: BTreeMap<String, String>,
}

impl StreamInfo {
    pub fn is_video(&self) -> bool {
        self.codec_type == CodecType::Video
    }

    pub fn is_audio(&self) -> bool {
        self.codec_type == CodecType::Audio
    }

    /// Language tag, when the container records one.
    pub fn language(&self) -> Option<&str> {
        self.tags.get("language").map(String::as_str)
    }
}

/// Metadata of one probed file. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaInfo {
    source_path: PathBuf,
    format: FormatInfo,
    streams: Vec<StreamInfo>,
}

impl MediaInfo {
    /// Builds the model from the JSON printed by
    /// `ffprobe -print_format json -show_format -show_streams`.
    ///
    /// `source_path` is the path the caller asked about; it is kept as-is
    /// rather than taken from the tool's own `filename` field.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mediaprobe_core::{CodecType, MediaInfo};
    ///
    /// let json = r#"{
    ///     "streams": [{ "index": 0, "codec_type": "audio", "codec_name": "opus",
    ///                   "sample_rate": "48000", "channels": 2 }],
    ///     "format": { "format_name": "ogg", "duration": "3.250000" }
    /// }"#;
    ///
    /// let info = MediaInfo::from_ffprobe_json("talk.ogg", json).unwrap();
    /// assert_eq!(info.duration(), Some(3.25));
    /// assert_eq!(info.streams()[0].codec_type, CodecType::Audio);
    /// assert_eq!(info.streams()[0].sample_rate, Some(48000));
    /// ```
    pub fn from_ffprobe_json(source_path: impl Into<PathBuf>, raw_output: &str) -> Result<Self> {
        let source_path = source_path.into();

        let document: Value = serde_json::from_str(raw_output).map_err(|e| {
            log::error!(
                "ffprobe output for {} is not valid JSON: {}",
                source_path.display(),
                e
            );
            ProbeError::MalformedProbeOutput(format!("invalid JSON: {e}"))
        })?;

        let root = document.as_object().ok_or_else(|| {
            ProbeError::MalformedProbeOutput("top-level value is not an object".to_string())
        })?;

        let format = match root.get("format") {
            Some(Value::Object(format)) => format,
            Some(_) => return Err(malformed("'format' is not an object")),
            None => return Err(malformed("missing 'format' section")),
        };
        let streams = match root.get("streams") {
            Some(Value::Array(streams)) => streams,
            Some(_) => return Err(malformed("'streams' is not an array")),
            None => return Err(malformed("missing 'streams' section")),
        };

        let format = parse_format(format);
        let streams = streams
            .iter()
            .enumerate()
            .map(|(position, entry)| match entry.as_object() {
                Some(stream) => parse_stream(stream, position),
                None => {
                    log::warn!("Stream entry #{} is not an object, keeping it empty", position);
                    StreamInfo::default()
                }
            })
            .collect();

        Ok(Self {
            source_path,
            format,
            streams,
        })
    }

    /// The path originally requested by the caller.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn format(&self) -> &FormatInfo {
        &self.format
    }

    /// All streams, in the order the tool listed them.
    pub fn streams(&self) -> &[StreamInfo] {
        &self.streams
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Container duration in seconds.
    pub fn duration(&self) -> Option<f64> {
        self.format.duration
    }

    /// File size in bytes as reported by the tool.
    pub fn file_size(&self) -> Option<u64> {
        self.format.size
    }

    pub fn format_name(&self) -> Option<&str> {
        self.format.format_name.as_deref()
    }

    pub fn streams_of(&self, codec_type: CodecType) -> impl Iterator<Item = &StreamInfo> {
        self.streams
            .iter()
            .filter(move |s| s.codec_type == codec_type)
    }

    pub fn video_streams(&self) -> Vec<&StreamInfo> {
        self.streams_of(CodecType::Video).collect()
    }

    pub fn audio_streams(&self) -> Vec<&StreamInfo> {
        self.streams_of(CodecType::Audio).collect()
    }

    pub fn subtitle_streams(&self) -> Vec<&StreamInfo> {
        self.streams_of(CodecType::Subtitle).collect()
    }

    /// First video stream.
    pub fn primary_video_stream(&self) -> Option<&StreamInfo> {
        self.streams_of(CodecType::Video).next()
    }

    /// Width and height of the primary video stream.
    pub fn video_dimensions(&self) -> Option<(u32, u32)> {
        let stream = self.primary_video_stream()?;
        Some((stream.width?, stream.height?))
    }
}

/// Parses `raw_output` into a [`MediaInfo`] for `source_path`.
pub fn materialize(source_path: impl Into<PathBuf>, raw_output: &str) -> Result<MediaInfo> {
    MediaInfo::from_ffprobe_json(source_path, raw_output)
}

/// Converts a frame rate such as `30000/1001`, `25/1` or `23.976` to frames
/// per second. Zero denominators and unparseable values give `None`.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let rate = rate.trim();
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.parse().ok()?,
    };
    (fps.is_finite() && fps > 0.0).then_some(fps)
}

fn malformed(reason: &str) -> ProbeError {
    log::error!("Malformed ffprobe output: {}", reason);
    ProbeError::MalformedProbeOutput(reason.to_string())
}

fn parse_format(format: &Map<String, Value>) -> FormatInfo {
    let ctx = "format";
    FormatInfo {
        format_name: field(format, "format_name", ctx, as_string),
        format_long_name: field(format, "format_long_name", ctx, as_string),
        duration: field(format, "duration", ctx, as_f64),
        start_time: field(format, "start_time", ctx, as_f64),
        bit_rate: field(format, "bit_rate", ctx, as_f64),
        size: field(format, "size", ctx, as_u64),
        nb_streams: field(format, "nb_streams", ctx, as_u32),
        probe_score: field(format, "probe_score", ctx, as_u32),
        tags: parse_tags(format.get("tags")),
    }
}

fn parse_stream(stream: &Map<String, Value>, position: usize) -> StreamInfo {
    let ctx = format!("stream #{position}");
    let ctx = ctx.as_str();

    let frame_rate = field(stream, "avg_frame_rate", ctx, as_frame_rate)
        .or_else(|| field(stream, "r_frame_rate", ctx, as_frame_rate));

    StreamInfo {
        index: field(stream, "index", ctx, as_u32),
        codec_type: stream
            .get("codec_type")
            .and_then(Value::as_str)
            .map(CodecType::from)
            .unwrap_or_default(),
        codec_name: field(stream, "codec_name", ctx, as_string),
        codec_long_name: field(stream, "codec_long_name", ctx, as_string),
        profile: field(stream, "profile", ctx, as_string),
        width: field(stream, "width", ctx, as_u32),
        height: field(stream, "height", ctx, as_u32),
        frame_rate,
        pix_fmt: field(stream, "pix_fmt", ctx, as_string),
        sample_rate: field(stream, "sample_rate", ctx, as_u32),
        channels: field(stream, "channels", ctx, as_u32),
        channel_layout: field(stream, "channel_layout", ctx, as_string),
        duration: field(stream, "duration", ctx, as_f64),
        bit_rate: field(stream, "bit_rate", ctx, as_f64),
        nb_frames: field(stream, "nb_frames", ctx, as_u64),
        tags: parse_tags(stream.get("tags")),
    }
}

/// Reads one field, treating a value of the wrong type as absent.
fn field<T>(
    object: &Map<String, Value>,
    key: &str,
    context: &str,
    parse: fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = object.get(key)?;
    let parsed = parse(value);
    if parsed.is_none() {
        if is_placeholder(value) {
            log::trace!("{} field '{}' not set: {}", context, key, value);
        } else {
            log::warn!("Ignoring unparseable {} field '{}': {}", context, key, value);
        }
    }
    parsed
}

/// Values ffprobe prints for properties it does not know.
fn is_placeholder(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => matches!(s.trim(), "" | "N/A" | "0/0"),
        _ => false,
    }
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    as_u64(value).and_then(|v| u32::try_from(v).ok())
}

fn as_frame_rate(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => parse_frame_rate(s),
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite() && *v > 0.0),
        _ => None,
    }
}

fn parse_tags(value: Option<&Value>) -> BTreeMap<String, String> {
    let Some(Value::Object(tags)) = value else {
        return BTreeMap::new();
    };
    tags.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}
