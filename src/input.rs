//! Line input for the shell
//!
//! Every read yields one [`Input`] event: a decoded line, an interrupt, or
//! end of input. Undecodable bytes are replaced rather than failing the read.

use std::io::{self, BufRead};
use std::thread;

use crossbeam::channel::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// One line, trimmed
    Line(String),
    /// The user interrupted (Ctrl-C) while a prompt was waiting
    Interrupted,
    /// Input closed (Ctrl-D or end of a piped stream)
    Eof,
}

/// Source of prompt answers
pub trait LineSource {
    fn next_line(&mut self) -> Input;
}

/// Read raw bytes up to and including `\n`.
///
/// Unlike `BufRead::read_until` this does not retry on
/// `ErrorKind::Interrupted`; the error is returned and the partial line dropped.
fn read_raw_line<R: BufRead>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut line = Vec::new();
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(line);
        }
        match available.iter().position(|&byte| byte == b'\n') {
            Some(end) => {
                line.extend_from_slice(&available[..=end]);
                reader.consume(end + 1);
                return Ok(line);
            }
            None => {
                let taken = available.len();
                line.extend_from_slice(available);
                reader.consume(taken);
            }
        }
    }
}

fn read_input<R: BufRead>(reader: &mut R) -> Input {
    match read_raw_line(reader) {
        Ok(bytes) if bytes.is_empty() => Input::Eof,
        Ok(bytes) => Input::Line(String::from_utf8_lossy(&bytes).trim().to_string()),
        Err(err) if err.kind() == io::ErrorKind::Interrupted => Input::Interrupted,
        Err(err) => {
            tracing::warn!("failed to read input: {err}");
            Input::Eof
        }
    }
}

/// Reads lines directly from any buffered reader
pub struct ReaderInput<R> {
    reader: R,
}

impl<R: BufRead> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderInput<R> {
    fn next_line(&mut self) -> Input {
        read_input(&mut self.reader)
    }
}

/// Lines read on a background thread, merged with interrupts sent through
/// the returned [`Sender`] (typically from a Ctrl-C handler).
///
/// A signal handler cannot break a blocking terminal read, so the read runs
/// elsewhere and the shell waits on whichever event arrives first.
pub struct ChannelInput {
    events: Receiver<Input>,
    finished: bool,
}

impl ChannelInput {
    pub fn spawn<R: BufRead + Send + 'static>(mut reader: R) -> (Self, Sender<Input>) {
        let (tx, rx) = channel::unbounded();
        let lines = tx.clone();

        thread::spawn(move || {
            loop {
                let event = match read_input(&mut reader) {
                    Input::Interrupted => continue,
                    event => event,
                };
                let done = event == Input::Eof;
                if lines.send(event).is_err() || done {
                    break;
                }
            }
        });

        (
            Self {
                events: rx,
                finished: false,
            },
            tx,
        )
    }
}

impl LineSource for ChannelInput {
    fn next_line(&mut self) -> Input {
        // The interrupt sender stays alive, so a blocking recv after the
        // reader is done would never return.
        if self.finished {
            return self.events.try_recv().unwrap_or(Input::Eof);
        }
        match self.events.recv() {
            Ok(Input::Eof) | Err(_) => {
                self.finished = true;
                Input::Eof
            }
            Ok(event) => event,
        }
    }
}
