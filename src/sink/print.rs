use std::io::{self, Stdout, Write};
use std::net::IpAddr;

use super::{Sink, SinkError};

/// Writes each address on its own line.
#[derive(Debug)]
pub struct PrintSink<W = Stdout> {
    out: W,
}

impl PrintSink<Stdout> {
    /// Creates a sink printing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> PrintSink<W> {
    /// Creates a sink printing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for PrintSink<W> {
    fn update(&mut self, address: IpAddr) -> Result<(), SinkError> {
        writeln!(self.out, "{address}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_canonical_text_one_per_line() {
        let mut sink = PrintSink::new(Vec::new());

        sink.update("192.168.1.5".parse().unwrap()).unwrap();
        sink.update("2001:db8:0:0:0:0:0:1".parse().unwrap()).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "192.168.1.5\n2001:db8::1\n");
    }

    #[test]
    fn write_failure_is_an_error() {
        let mut sink = PrintSink::new(Broken);
        let err = sink.update("192.0.2.1".parse().unwrap()).unwrap_err();

        assert!(matches!(err, SinkError::Write(_)));
    }

    #[test]
    fn nothing_is_ever_in_flight() {
        let mut sink = PrintSink::new(Vec::new());
        sink.update("192.0.2.1".parse().unwrap()).unwrap();

        assert_eq!(sink.in_flight(), 0);
    }
}
