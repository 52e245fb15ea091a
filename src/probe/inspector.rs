//! Stream table rendering for `inspect`

use crate::domain::model::{ProbeResult, Stream};

const HEADERS: [&str; 9] = [
    "#", "Type", "Codec", "Language", "Channels", "Layout", "Width", "Height", "Title",
];

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn row(stream: &Stream) -> [String; 9] {
    [
        stream.index.to_string(),
        stream.codec_type.to_string(),
        stream.codec_name.clone(),
        opt(stream.language.as_deref()),
        opt(stream.channels),
        opt(stream.layout_name.as_deref()),
        opt(stream.width),
        opt(stream.height),
        opt(stream.title.as_deref()),
    ]
}

/// Render the probe's streams as a plain text table titled with its name
pub fn render_stream_table(probe: &ProbeResult) -> String {
    let rows: Vec<[String; 9]> = probe.streams.iter().map(row).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = vec![probe.name.clone(), format_line(&header[..]), format_line(&rule[..])];
    lines.extend(rows.iter().map(|r| format_line(&r[..])));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CodecType;

    #[test]
    fn table_lists_every_stream() {
        let probe = ProbeResult {
            name: "Movie".to_string(),
            streams: vec![
                Stream::new(0, CodecType::Video, "h264").with_dimensions(1920, 1080),
                Stream::new(1, CodecType::Audio, "aac")
                    .with_language("eng")
                    .with_channels(2)
                    .with_title("Stereo"),
            ],
            ..ProbeResult::default()
        };

        let table = render_stream_table(&probe);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Movie");
        assert!(lines[1].starts_with("# | Type"));
        assert!(lines[1].ends_with("Title"));
        assert!(lines[3].contains("h264"));
        assert!(lines[3].contains("1920"));
        assert!(lines[4].contains("eng"));
        assert!(lines[4].ends_with("Stereo"));
        assert_eq!(lines.len(), 5);
    }
}
