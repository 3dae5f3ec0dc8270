use mediaprobe_core::{CodecType, MediaInfo, StreamInfo};
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Print a heading with colored styling and clear separation
pub fn print_heading(text: &str) {
    let line = "=".repeat(50);

    println!("{}", line.if_supports_color(Stream::Stdout, |t| t.bright_blue()));
    println!(
        "{}",
        format!(" {text} ").if_supports_color(Stream::Stdout, |t| t.bold())
    );
    println!("{}", line.if_supports_color(Stream::Stdout, |t| t.bright_blue()));
}

/// Print a section heading (smaller than main heading) with colored styling
pub fn print_section(text: &str) {
    let line = "-".repeat(40);

    println!("\n{}", line.if_supports_color(Stream::Stdout, |t| t.blue()));
    println!(
        "{}",
        format!(" {text} ").if_supports_color(Stream::Stdout, |t| t.bold())
    );
    println!("{}", line.if_supports_color(Stream::Stdout, |t| t.blue()));
}

/// Print an info line with label and value, with the label colored
pub fn print_info<T: Display>(label: &str, value: T) {
    println!(
        "{}: {}",
        label.if_supports_color(Stream::Stdout, |t| t.bright_cyan()),
        value
    );
}

/// Human-readable summary of a probe result.
pub fn print_media_info(info: &MediaInfo) {
    let format = info.format();

    print_heading(&info.source_path().display().to_string());

    match (&format.format_name, &format.format_long_name) {
        (Some(name), Some(long)) => print_info("Format", format!("{name} ({long})")),
        (Some(name), None) => print_info("Format", name),
        _ => print_info("Format", "unknown"),
    }
    print_info("Duration", format.duration.map_or_else(unknown, format_duration));
    print_info("Size", format.size.map_or_else(unknown, format_bytes));
    print_info("Bit rate", format.bit_rate.map_or_else(unknown, format_bitrate));
    print_info("Streams", info.stream_count());

    if !format.tags.is_empty() {
        print_section("Tags");
        for (key, value) in &format.tags {
            print_info(key, value);
        }
    }

    print_section("Streams");
    if info.streams().is_empty() {
        println!("(no streams)");
    }
    for stream in info.streams() {
        println!("{}", describe_stream(stream));
    }
}

/// One-line description of a stream, e.g.
/// `#0 video h264, 1920x1080, 23.976 fps, yuv420p [eng]`.
pub fn describe_stream(stream: &StreamInfo) -> String {
    let index = stream
        .index
        .map_or_else(|| "#?".to_string(), |i| format!("#{i}"));
    let kind = match stream.codec_type {
        CodecType::Video => "video",
        CodecType::Audio => "audio",
        CodecType::Subtitle => "subtitle",
        CodecType::Data => "data",
        CodecType::Attachment => "attachment",
        CodecType::Unknown => "unknown",
    };

    let mut details = vec![stream.codec_name.clone().unwrap_or_else(|| "-".to_string())];
    if let (Some(w), Some(h)) = (stream.width, stream.height) {
        details.push(format!("{w}x{h}"));
    }
    if let Some(fps) = stream.frame_rate {
        details.push(format!("{} fps", trim_float(fps, 3)));
    }
    if let Some(pix_fmt) = &stream.pix_fmt {
        details.push(pix_fmt.clone());
    }
    if let Some(rate) = stream.sample_rate {
        details.push(format!("{rate} Hz"));
    }
    match (&stream.channel_layout, stream.channels) {
        (Some(layout), _) => details.push(layout.clone()),
        (None, Some(ch)) => details.push(format!("{ch} ch")),
        _ => {}
    }
    if let Some(bit_rate) = stream.bit_rate {
        details.push(format_bitrate(bit_rate));
    }

    let mut line = format!("{index} {kind} {}", details.join(", "));
    if let Some(language) = stream.language() {
        line.push_str(&format!(" [{language}]"));
    }
    line
}

fn unknown() -> String {
    "unknown".to_string()
}

/// Formats seconds as `HH:MM:SS.mmm`.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_millis = (seconds * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Formats bits per second as kb/s.
pub fn format_bitrate(bits_per_second: f64) -> String {
    format!("{} kb/s", (bits_per_second / 1000.0).round() as u64)
}

fn trim_float(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
