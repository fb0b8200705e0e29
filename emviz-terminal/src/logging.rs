//! Log writer that holds output back while the live view owns the terminal.
//!
//! Anything written to stderr during the alternate screen lands on top of
//! the scene, so events are buffered from `hold` until `release`.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Default)]
struct GateState {
    held: bool,
    pending: Vec<u8>,
}

/// Shared switch between writing straight to stderr and buffering.
#[derive(Debug, Clone, Default)]
pub struct LogGate {
    state: Arc<Mutex<GateState>>,
}

impl LogGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start buffering.
    pub fn hold(&self) {
        self.lock().held = true;
    }

    pub fn is_held(&self) -> bool {
        self.lock().held
    }

    /// Stop buffering and write out whatever was held, to stderr.
    pub fn release(&self) -> io::Result<()> {
        self.release_into(&mut io::stderr().lock())
    }

    pub fn release_into<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let pending = {
            let mut state = self.lock();
            state.held = false;
            std::mem::take(&mut state.pending)
        };
        out.write_all(&pending)?;
        out.flush()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct GateWriter {
    state: Arc<Mutex<GateState>>,
}

impl Write for GateWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.held {
            state.pending.extend_from_slice(buf);
            Ok(buf.len())
        } else {
            io::stderr().write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for LogGate {
    type Writer = GateWriter;

    fn make_writer(&'a self) -> Self::Writer {
        GateWriter {
            state: Arc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_events_wait_for_release() {
        let gate = LogGate::new();
        gate.hold();

        let subscriber = tracing_subscriber::fmt()
            .with_writer(gate.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("remounted while drawing");
        });

        let mut out = Vec::new();
        gate.release_into(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("remounted while drawing"));
        assert!(!gate.is_held());
    }

    #[test]
    fn release_empties_the_buffer() {
        let gate = LogGate::new();
        gate.hold();
        gate.make_writer().write_all(b"once\n").unwrap();

        let mut first = Vec::new();
        gate.release_into(&mut first).unwrap();
        assert_eq!(first, b"once\n");

        gate.hold();
        let mut second = Vec::new();
        gate.release_into(&mut second).unwrap();
        assert!(second.is_empty());
    }
}
