//! Console sink implementation

use crate::core::{Destination, Result, RoutingDecision, Severity, Sink};
use colored::Colorize;
use std::io::Write;

/// Output channel a console line goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Writes host lines (colored) and stream lines (per-severity channel)
pub struct ConsoleSink {
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Line and channel for a decision, or `None` if nothing is shown
    pub fn format_line(&self, decision: &RoutingDecision) -> Option<(ConsoleStream, String)> {
        let text = &decision.rendered_text;
        match decision.destination {
            Destination::Host => {
                let line = match decision.color {
                    Some(color) if self.use_colors => text.color(color.color_code()).to_string(),
                    _ => text.clone(),
                };
                Some((ConsoleStream::Stdout, line))
            }
            Destination::Streams => match decision.stream_kind {
                Severity::Off => None,
                Severity::Error => Some((ConsoleStream::Stderr, text.clone())),
                Severity::Warning => Some((ConsoleStream::Stderr, format!("WARNING: {}", text))),
                Severity::Information => Some((ConsoleStream::Stdout, text.clone())),
                Severity::Debug => Some((ConsoleStream::Stdout, format!("DEBUG: {}", text))),
                Severity::Verbose => Some((ConsoleStream::Stdout, format!("VERBOSE: {}", text))),
            },
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, decision: &RoutingDecision) -> Result<()> {
        match self.format_line(decision) {
            Some((ConsoleStream::Stdout, line)) => writeln!(std::io::stdout().lock(), "{}", line)?,
            Some((ConsoleStream::Stderr, line)) => writeln!(std::io::stderr().lock(), "{}", line)?,
            None => {}
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;

    fn decision(destination: Destination, severity: Severity, color: Option<Color>) -> RoutingDecision {
        RoutingDecision {
            rendered_text: "hello".to_string(),
            destination,
            color,
            stream_kind: severity,
            file: None,
        }
    }

    #[test]
    fn test_host_lines_without_colors() {
        let sink = ConsoleSink::with_colors(false);
        let line = sink.format_line(&decision(Destination::Host, Severity::Error, Some(Color::Red)));
        assert_eq!(line, Some((ConsoleStream::Stdout, "hello".to_string())));
    }

    #[test]
    fn test_host_lines_with_colors_keep_text() {
        let sink = ConsoleSink::new();
        let (stream, line) = sink
            .format_line(&decision(Destination::Host, Severity::Information, Some(Color::Green)))
            .unwrap();
        assert_eq!(stream, ConsoleStream::Stdout);
        assert!(line.contains("hello"));
    }

    #[test]
    fn test_stream_channels() {
        let sink = ConsoleSink::new();
        assert_eq!(
            sink.format_line(&decision(Destination::Streams, Severity::Error, None)),
            Some((ConsoleStream::Stderr, "hello".to_string()))
        );
        assert_eq!(
            sink.format_line(&decision(Destination::Streams, Severity::Warning, None)),
            Some((ConsoleStream::Stderr, "WARNING: hello".to_string()))
        );
        assert_eq!(
            sink.format_line(&decision(Destination::Streams, Severity::Verbose, None)),
            Some((ConsoleStream::Stdout, "VERBOSE: hello".to_string()))
        );
    }
}
