//! Compact single-line log format: `[LEVEL] [MM-DD|hh:mm:ss.mmm] message key=value`.

use std::{fmt, io};

use nu_ansi_term::Color;
use tracing::{Event, Level, Subscriber, field, span};
use tracing_subscriber::field::{RecordFields, VisitFmt, VisitOutput};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

pub struct LakeshoreFormat {
    time_format: Option<time::format_description::OwnedFormatItem>,
}

impl Default for LakeshoreFormat {
    fn default() -> Self {
        let time_format = time::format_description::parse_owned::<2>(
            r#"\[[month]-[day]|[hour]:[minute]:[second].[subsecond digits:3]\]"#,
        )
        .ok();

        Self { time_format }
    }
}

impl LakeshoreFormat {
    fn write_time(&self, writer: &mut Writer<'_>) -> fmt::Result {
        let Some(time_format) = &self.time_format else {
            return Err(fmt::Error);
        };

        let now = time::OffsetDateTime::from(std::time::SystemTime::now());
        let mut adaptor = WriteAdaptor { inner: writer };
        now.format_into(&mut adaptor, time_format)
            .map_err(|_| fmt::Error)?;
        Ok(())
    }
}

impl<S, N> FormatEvent<S, N> for LakeshoreFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = *event.metadata().level();
        write!(writer, "{} ", LevelLabel::new(level, writer.has_ansi_escapes()))?;

        if self.write_time(&mut writer).is_err() {
            write!(writer, "[<unknown-timestamp>]")?;
        }
        writer.write_char(' ')?;

        ctx.format_fields(writer.by_ref(), event)?;

        // Span fields (bucket, key, ...) follow the event's own fields.
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, " {}", fields)?;
                    }
                }
            }
        }

        writeln!(writer)
    }
}

impl<'w> FormatFields<'w> for LakeshoreFormat {
    fn format_fields<R: RecordFields>(&self, writer: Writer<'w>, fields: R) -> fmt::Result {
        let mut visitor = FieldVisitor::new(writer, true);
        fields.record(&mut visitor);
        visitor.finish()
    }

    fn add_fields(
        &self,
        current: &'w mut FormattedFields<Self>,
        fields: &span::Record<'_>,
    ) -> fmt::Result {
        let is_empty = current.is_empty();
        let mut visitor = FieldVisitor::new(current.as_writer(), is_empty);
        fields.record(&mut visitor);
        visitor.finish()
    }
}

struct FieldVisitor<'a> {
    writer: Writer<'a>,
    is_empty: bool,
    result: fmt::Result,
}

impl<'a> FieldVisitor<'a> {
    fn new(writer: Writer<'a>, is_empty: bool) -> Self {
        Self {
            writer,
            is_empty,
            result: Ok(()),
        }
    }

    fn separator(&mut self) -> &'static str {
        if self.is_empty {
            self.is_empty = false;
            ""
        } else {
            " "
        }
    }
}

impl field::Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &field::Field, value: &str) {
        if field.name() == "message" {
            self.record_debug(field, &format_args!("{value}"))
        } else {
            self.record_debug(field, &value)
        }
    }

    fn record_debug(&mut self, field: &field::Field, value: &dyn fmt::Debug) {
        if self.result.is_err() {
            return;
        }

        let sep = self.separator();
        let name = field.name();
        let value = format!("{value:?}");
        self.result = if name == "message" {
            write!(self.writer, "{sep}{value:<40}")
        } else if self.writer.has_ansi_escapes() {
            let color = if name == "error" {
                Color::Red
            } else {
                Color::Blue
            };
            write!(self.writer, "{sep}{name}={}", color.paint(value))
        } else {
            write!(self.writer, "{sep}{name}={value}")
        };
    }
}

impl VisitOutput<fmt::Result> for FieldVisitor<'_> {
    fn finish(self) -> fmt::Result {
        self.result
    }
}

impl VisitFmt for FieldVisitor<'_> {
    fn writer(&mut self) -> &mut dyn fmt::Write {
        &mut self.writer
    }
}

struct LevelLabel {
    level: Level,
    ansi: bool,
}

impl LevelLabel {
    fn new(level: Level, ansi: bool) -> Self {
        Self { level, ansi }
    }
}

impl fmt::Display for LevelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, color) = match self.level {
            Level::TRACE => ("TRACE", Color::Purple),
            Level::DEBUG => ("DEBUG", Color::Blue),
            Level::INFO => ("INFO", Color::Green),
            Level::WARN => ("WARN", Color::Yellow),
            Level::ERROR => ("ERROR", Color::Red),
        };

        if self.ansi {
            write!(f, "[{}]", color.paint(label))
        } else {
            write!(f, "[{label}]")
        }
    }
}

struct WriteAdaptor<'a, 'w> {
    inner: &'a mut Writer<'w>,
}

impl io::Write for WriteAdaptor<'_, '_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.inner.write_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
