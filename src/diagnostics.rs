//! Step-by-step tracing for read and write calls.
//!
//! Every [`ImageIo`](crate::ImageIo) carries a [`DiagnosticSink`]. Each step of
//! a read or write (path checked, file opened, decode started, ...) is
//! reported as a [`Trace`] the moment it happens. Nothing is buffered.
//!
//! | Sink | Behavior |
//! |---|---|
//! | [`Discard`] | Default. Drops every trace. |
//! | [`WriterSink`] | Writes one line per trace to any `io::Write`. |
//! | `mpsc::Sender<Trace>` | Forwards traces to a receiver, e.g. a printer thread. |
//! | `Arc<S>` | Shares any sink, so the caller can keep a handle to it. |
//!
//! Sinks never report failures back to the caller: a closed channel or a
//! broken writer is silently ignored.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::sync::mpsc::Sender;

/// One step of a read or write call.
///
/// `Display` renders the trace line, without a trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trace {
    /// Cleaned source path of a read.
    SourcePath(PathBuf),
    CheckingType,
    Opening,
    Decoding,
    /// Cleaned target path of a write.
    TargetPath(PathBuf),
    DetectingEncoding,
    Creating,
    /// Encoding started, with the target file type token.
    Encoding(String),
    Closing,
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trace::SourcePath(path) => write!(f, "provided file path: {}", path.display()),
            Trace::CheckingType => f.write_str("checking if file type is supported"),
            Trace::Opening => f.write_str("opening file"),
            Trace::Decoding => f.write_str("decoding file"),
            Trace::TargetPath(path) => {
                write!(f, "provided target file path: {}", path.display())
            }
            Trace::DetectingEncoding => f.write_str("detecting desired target encoding"),
            Trace::Creating => f.write_str("creating file"),
            Trace::Encoding(token) => write!(f, "encoding file as {token}"),
            Trace::Closing => f.write_str("closing file"),
        }
    }
}

/// Destination for [`Trace`]s.
///
/// Implementations must be shareable across threads, since one
/// [`ImageIo`](crate::ImageIo) may serve concurrent calls.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, trace: &Trace);
}

/// Sink that drops every trace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl DiagnosticSink for Discard {
    fn record(&self, _trace: &Trace) {}
}

/// Writes each trace as a line to the wrapped writer, flushing after every line.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Unwrap the writer, e.g. to inspect a `Vec<u8>` in tests.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> DiagnosticSink for WriterSink<W> {
    fn record(&self, trace: &Trace) {
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(writer, "{trace}");
        let _ = writer.flush();
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn record(&self, trace: &Trace) {
        (**self).record(trace);
    }
}

impl DiagnosticSink for Sender<Trace> {
    fn record(&self, trace: &Trace) {
        let _ = self.send(trace.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn trace_lines_render() {
        assert_eq!(
            Trace::SourcePath(PathBuf::from("a/b.png")).to_string(),
            "provided file path: a/b.png"
        );
        assert_eq!(
            Trace::TargetPath(PathBuf::from("out.gif")).to_string(),
            "provided target file path: out.gif"
        );
        assert_eq!(Trace::Encoding("jpg".into()).to_string(), "encoding file as jpg");
        assert_eq!(Trace::Closing.to_string(), "closing file");
    }

    #[test]
    fn writer_sink_writes_one_line_per_trace() {
        let sink = WriterSink::new(Vec::new());
        sink.record(&Trace::Opening);
        sink.record(&Trace::Decoding);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "opening file\ndecoding file\n");
    }

    #[test]
    fn sender_sink_forwards_traces() {
        let (tx, rx) = mpsc::channel();
        tx.record(&Trace::Creating);
        drop(tx);
        assert_eq!(rx.iter().collect::<Vec<_>>(), vec![Trace::Creating]);
    }

    #[test]
    fn sender_sink_ignores_closed_channel() {
        let (tx, rx) = mpsc::channel::<Trace>();
        drop(rx);
        tx.record(&Trace::Opening);
    }

    #[test]
    fn broken_writer_is_ignored() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("broken"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Err(std::io::Error::other("broken"))
            }
        }
        WriterSink::new(Broken).record(&Trace::Closing);
    }
}
