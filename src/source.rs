//! Video probing and frame decoding.
//!
//! [`VideoFile`] opens a media file with FFmpeg, extracts and caches
//! [`VideoMetadata`] once, and decodes single frames at requested timestamps
//! as [`image::RgbImage`] values. Each decode creates a fresh decoder, seeks
//! to the nearest keyframe before the target, and decodes forward; the
//! decoder is dropped when the call returns.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::error::SheetError;

/// Facts about the best audio stream, used for the header's audio line.
#[derive(Debug, Clone)]
pub struct AudioInfo {
    /// Codec name (e.g. `"aac"`, `"mp3"`).
    pub codec: String,
    /// Sample rate in hertz.
    pub sample_rate: u32,
    /// Number of audio channels.
    pub channels: u16,
}

/// Probed metadata for one video file.
///
/// Extracted once when the file is opened and immutable afterwards.
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    /// Path of the probed file.
    pub path: PathBuf,
    /// Total duration in seconds.
    pub duration_seconds: f64,
    /// Stored frame width in pixels (before rotation correction).
    pub width: u32,
    /// Stored frame height in pixels (before rotation correction).
    pub height: u32,
    /// Display rotation in degrees, normalized to 0, 90, 180 or 270.
    pub rotation_degrees: u32,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub container_format: String,
    /// Video codec name (e.g. `"h264"`).
    pub codec: String,
    /// Overall bit rate in kilobits per second, zero when unknown.
    pub bit_rate_kbps: u64,
    /// Frames per second, zero when unknown.
    pub frame_rate: f64,
    /// File size in bytes.
    pub file_size_bytes: u64,
    /// Best audio stream facts, if the file has audio.
    pub audio: Option<AudioInfo>,
}

impl VideoMetadata {
    /// Dimensions after applying the display rotation.
    pub fn corrected_dimensions(&self) -> (u32, u32) {
        match self.rotation_degrees {
            90 | 270 => (self.height, self.width),
            _ => (self.width, self.height),
        }
    }

    /// Rotation-corrected width/height ratio.
    pub fn corrected_aspect(&self) -> f64 {
        let (width, height) = self.corrected_dimensions();
        f64::from(width) / f64::from(height)
    }
}

/// An opened video file: cached metadata plus frame decoding.
pub struct VideoFile {
    input: Input,
    metadata: VideoMetadata,
    stream_index: usize,
}

impl VideoFile {
    /// Open a video file and probe its metadata.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches duration, dimensions, rotation, codec and
    /// rate facts.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Probe`] if the file cannot be opened or read,
    /// and [`SheetError::NoVideoStream`] if it holds no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SheetError> {
        let path = path.as_ref().to_path_buf();

        log::debug!("Probing media file: {}", path.display());

        ffmpeg_next::init().map_err(|error| SheetError::Probe {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input = ffmpeg_next::format::input(&path).map_err(|error| SheetError::Probe {
            path: path.clone(),
            reason: error.to_string(),
        })?;

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or_else(|| SheetError::NoVideoStream { path: path.clone() })?;
        let stream_index = stream.index();

        let rotation_degrees = stream
            .metadata()
            .get("rotate")
            .and_then(|value| value.parse::<i32>().ok())
            .map(normalize_rotation)
            .unwrap_or(0);

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                SheetError::Probe {
                    path: path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| SheetError::Probe {
                path: path.clone(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err(SheetError::Probe {
                path,
                reason: format!("video stream reports degenerate dimensions {width}x{height}"),
            });
        }

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        // Prefer the stream's average frame rate; fall back to the nominal rate.
        let frame_rate = {
            let average = stream.avg_frame_rate();
            if average.denominator() != 0 && average.numerator() != 0 {
                f64::from(average.numerator()) / f64::from(average.denominator())
            } else {
                let nominal = stream.rate();
                if nominal.denominator() != 0 {
                    f64::from(nominal.numerator()) / f64::from(nominal.denominator())
                } else {
                    0.0
                }
            }
        };

        let duration_microseconds = input.duration();
        let duration_seconds = if duration_microseconds > 0 {
            duration_microseconds as f64 / 1_000_000.0
        } else {
            0.0
        };

        let bit_rate_kbps = {
            let bits_per_second = input.bit_rate();
            if bits_per_second > 0 {
                ((bits_per_second as f64) / 1000.0).round() as u64
            } else {
                0
            }
        };

        let container_format = input.format().name().to_string();

        let file_size_bytes = fs::metadata(&path)
            .map_err(|error| SheetError::Probe {
                path: path.clone(),
                reason: format!("Failed to read file size: {error}"),
            })?
            .len();

        let audio = probe_audio(&input);

        let metadata = VideoMetadata {
            path: path.clone(),
            duration_seconds,
            width,
            height,
            rotation_degrees,
            container_format,
            codec,
            bit_rate_kbps,
            frame_rate,
            file_size_bytes,
            audio,
        };

        log::debug!(
            "Probed {}: {}x{} rot={} {:.2}s {:.2}fps codec={} container={}",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.rotation_degrees,
            metadata.duration_seconds,
            metadata.frame_rate,
            metadata.codec,
            metadata.container_format,
        );

        Ok(Self {
            input,
            metadata,
            stream_index,
        })
    }

    /// The metadata probed at open time.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Decode the frame displayed at `timestamp` seconds.
    ///
    /// Seeks to the nearest keyframe before the target and decodes forward
    /// until the target instant is reached, then converts the frame to an
    /// RGB8 image at the stream's stored dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Decode`] when seeking or decoding fails, or the
    /// stream ends before the target instant.
    pub fn frame_at(&mut self, timestamp: f64) -> Result<RgbImage, SheetError> {
        let decode_error = |reason: String| SheetError::Decode { timestamp, reason };

        let (time_base, mut decoder) = {
            let stream = self
                .input
                .stream(self.stream_index)
                .ok_or_else(|| decode_error("video stream disappeared".to_string()))?;
            let time_base = stream.time_base();
            let decoder = CodecContext::from_parameters(stream.parameters())
                .map_err(|error| decode_error(error.to_string()))?
                .decoder()
                .video()
                .map_err(|error| decode_error(error.to_string()))?;
            (time_base, decoder)
        };

        let mut scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| decode_error(error.to_string()))?;

        // Accept the first frame within half a frame interval of the target
        // so rounding in the container's time base cannot skip past it.
        let tolerance = if self.metadata.frame_rate > 0.0 {
            0.5 / self.metadata.frame_rate
        } else {
            0.0
        };
        let target_seconds = timestamp - tolerance;

        let target_ts = seconds_to_stream_timestamp(timestamp, time_base);
        self.input
            .seek(target_ts, ..target_ts)
            .map_err(|error| decode_error(format!("seek failed: {error}")))?;

        let width = self.metadata.width;
        let height = self.metadata.height;
        let mut decoded = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();

        for (stream, packet) in self.input.packets() {
            if stream.index() != self.stream_index {
                continue;
            }

            decoder
                .send_packet(&packet)
                .map_err(|error| decode_error(error.to_string()))?;

            while decoder.receive_frame(&mut decoded).is_ok() {
                let seconds = pts_to_seconds(decoded.pts().unwrap_or(0), time_base);
                if seconds >= target_seconds {
                    scaler
                        .run(&decoded, &mut rgb_frame)
                        .map_err(|error| decode_error(error.to_string()))?;
                    return rgb_frame_to_image(&rgb_frame, width, height)
                        .ok_or_else(|| decode_error("decoded frame has no pixel data".into()));
                }
            }
        }

        // Flush the decoder for trailing frames.
        decoder
            .send_eof()
            .map_err(|error| decode_error(error.to_string()))?;
        while decoder.receive_frame(&mut decoded).is_ok() {
            let seconds = pts_to_seconds(decoded.pts().unwrap_or(0), time_base);
            if seconds >= target_seconds {
                scaler
                    .run(&decoded, &mut rgb_frame)
                    .map_err(|error| decode_error(error.to_string()))?;
                return rgb_frame_to_image(&rgb_frame, width, height)
                    .ok_or_else(|| decode_error("decoded frame has no pixel data".into()));
            }
        }

        Err(decode_error(
            "stream ended before the requested instant".to_string(),
        ))
    }
}

fn probe_audio(input: &Input) -> Option<AudioInfo> {
    let stream = input.streams().best(Type::Audio)?;
    let decoder = CodecContext::from_parameters(stream.parameters())
        .ok()?
        .decoder()
        .audio()
        .ok()?;

    let codec = decoder
        .codec()
        .map(|codec| codec.name().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    Some(AudioInfo {
        codec,
        sample_rate: decoder.rate(),
        channels: decoder.channels(),
    })
}

fn normalize_rotation(degrees: i32) -> u32 {
    match degrees.rem_euclid(360) {
        90 => 90,
        180 => 180,
        270 => 270,
        _ => 0,
    }
}

/// Convert seconds to a timestamp in the stream's time base.
fn seconds_to_stream_timestamp(seconds: f64, time_base: Rational) -> i64 {
    let numerator = f64::from(time_base.numerator());
    let denominator = f64::from(time_base.denominator());
    (seconds * denominator / numerator) as i64
}

/// Rescale a PTS value from the stream time base to seconds.
fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    pts as f64 * f64::from(time_base.numerator()) / f64::from(time_base.denominator())
}

/// Convert a scaled RGB24 frame into a tightly-packed [`RgbImage`].
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3);
/// the padding is stripped row by row when present.
fn rgb_frame_to_image(rgb_frame: &VideoFrame, width: u32, height: u32) -> Option<RgbImage> {
    let stride = rgb_frame.stride(0);
    let row_bytes = (width as usize) * 3;
    let data = rgb_frame.data(0);

    let buffer = if stride == row_bytes {
        data[..row_bytes * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * (height as usize));
        for row in 0..(height as usize) {
            let start = row * stride;
            buffer.extend_from_slice(&data[start..start + row_bytes]);
        }
        buffer
    };

    RgbImage::from_raw(width, height, buffer)
}
