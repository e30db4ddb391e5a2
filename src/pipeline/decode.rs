//! Server-sent-event framing (Bytes -> SseFrame)
//!
//! Lines end in `\n`, `\r\n` or `\r`; a blank line dispatches the frame being built.
//! Bytes are buffered until a full line is available, so multi-byte UTF-8 sequences split
//! across network chunks decode correctly.

use crate::pipeline::Decoder;
use crate::BoxStream;
use bytes::Bytes;
use futures::{stream, StreamExt};
use std::collections::VecDeque;

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseFrame {
    /// `event:` field; `None` means the default "message" type.
    pub event: Option<String>,
    /// All `data:` lines joined with `\n`.
    pub data: String,
    pub id: Option<String>,
    /// `retry:` reconnection hint in milliseconds.
    pub retry: Option<u64>,
}

/// Incremental SSE line parser.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
    event: Option<String>,
    data: String,
    has_data: bool,
    id: Option<String>,
    retry: Option<u64>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns the frames it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buf.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(line) = self.next_line(false) {
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flushes at end of input: a trailing frame without its blank line is still dispatched.
    pub fn finish(&mut self) -> Option<SseFrame> {
        let mut last = None;
        while let Some(line) = self.next_line(true) {
            if let Some(frame) = self.process_line(&line) {
                last = Some(frame);
            }
        }
        if !self.buf.is_empty() {
            let rest = std::mem::take(&mut self.buf);
            if let Some(frame) = self.process_line(&String::from_utf8_lossy(&rest)) {
                last = Some(frame);
            }
        }
        self.dispatch().or(last)
    }

    fn next_line(&mut self, eof: bool) -> Option<String> {
        let pos = self.buf.iter().position(|b| *b == b'\n' || *b == b'\r')?;
        let consumed = if self.buf[pos] == b'\r' {
            match self.buf.get(pos + 1) {
                Some(b'\n') => pos + 2,
                Some(_) => pos + 1,
                // A lone trailing `\r` may be the first half of `\r\n`.
                None if eof => pos + 1,
                None => return None,
            }
        } else {
            pos + 1
        };
        let line = String::from_utf8_lossy(&self.buf[..pos]).into_owned();
        self.buf.drain(..consumed);
        Some(line)
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            "id" => {
                if !value.contains('\0') {
                    self.id = Some(value.to_string());
                }
            }
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(ms);
                }
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        let retry = self.retry.take();
        if !self.has_data {
            self.data.clear();
            return None;
        }
        self.has_data = false;
        Some(SseFrame {
            event: event.filter(|e| !e.is_empty()),
            data: std::mem::take(&mut self.data),
            id: self.id.clone(),
            retry,
        })
    }
}

/// Server-sent-event decoder over a byte stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct SseDecoder;

impl Decoder for SseDecoder {
    fn decode_stream(&self, input: BoxStream<'static, Bytes>) -> BoxStream<'static, SseFrame> {
        let state = (input, FrameDecoder::new(), VecDeque::new(), false);
        let stream = stream::unfold(state, |(mut input, mut decoder, mut pending, mut done)| async move {
            loop {
                if let Some(frame) = pending.pop_front() {
                    return Some((Ok(frame), (input, decoder, pending, done)));
                }
                if done {
                    return None;
                }

                // Need more data.
                match input.next().await {
                    Some(Ok(bytes)) => {
                        pending.extend(decoder.push(&bytes));
                    }
                    Some(Err(e)) => {
                        // Errors are terminal: report once, then end.
                        return Some((Err(e), (input, decoder, VecDeque::new(), true)));
                    }
                    None => {
                        done = true;
                        pending.extend(decoder.finish());
                    }
                }
            }
        });

        Box::pin(stream)
    }
}
