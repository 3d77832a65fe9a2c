use colored::Colorize;

/// Style hint attached to every emitted line, mirroring the tags the map
/// check report distinguishes. Rendering decides what (if anything) to do
/// with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    MapTitle,
    Basemap,
    Group,
    Layer,
    VectorTile,
    Url,
    Success,
    Error,
    Warning,
    Separator,
    Plain,
}

/// Append-only ordered line sink. The walker and the map orchestration only
/// ever call `emit`; consoles, buffers and files stay behind this trait.
/// `Send` so the walker's boxed recursion stays spawnable.
pub trait ReportSink: Send {
    fn emit(&mut self, line: &str, tag: LineTag);
}

/// Renders lines to stdout with per-tag colors.
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn emit(&mut self, line: &str, tag: LineTag) {
        match tag {
            LineTag::MapTitle => println!("{}", line.bright_white().bold()),
            LineTag::Basemap => println!("{}", line.bright_blue().bold()),
            LineTag::Group => println!("{}", line.blue()),
            LineTag::Layer | LineTag::VectorTile => println!("{}", line.cyan()),
            LineTag::Url => println!("{}", line.bright_black()),
            LineTag::Success => println!("{}", line.green()),
            LineTag::Error => println!("{}", line.red().bold()),
            LineTag::Warning => println!("{}", line.yellow()),
            LineTag::Separator => println!("{}", line.bright_blue()),
            LineTag::Plain => println!("{}", line),
        }
    }
}

/// Captures lines in order; used by tests and the JSON output path, where
/// progress lines must not hit stdout.
#[derive(Debug, Default)]
pub struct BufferSink {
    pub lines: Vec<(String, LineTag)>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|(line, _)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ReportSink for BufferSink {
    fn emit(&mut self, line: &str, tag: LineTag) {
        self.lines.push((line.to_string(), tag));
    }
}
