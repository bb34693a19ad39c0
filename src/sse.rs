//! Incremental decoder for `text/event-stream` bodies.
//!
//! Chunks may split lines (or even multi-byte characters) anywhere, so the
//! parser keeps the unterminated tail between calls to [`EventParser::feed`].

use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SseEvent {
  pub(crate) data: String,
  pub(crate) event: String,
}

#[derive(Debug, Default)]
pub(crate) struct EventParser {
  data: String,
  event: String,
  line: Vec<u8>,
  pending_cr: bool,
}

impl EventParser {
  const MAX_LINE_LENGTH: usize = 64 * 1024;

  fn dispatch(&mut self) -> Option<SseEvent> {
    let event = std::mem::take(&mut self.event);

    if self.data.is_empty() {
      return None;
    }

    let mut data = std::mem::take(&mut self.data);

    if data.ends_with('\n') {
      data.pop();
    }

    Some(SseEvent {
      data,
      event: if event.is_empty() {
        "message".into()
      } else {
        event
      },
    })
  }

  /// Fails once a single line outgrows [`Self::MAX_LINE_LENGTH`].
  pub(crate) fn feed(
    &mut self,
    chunk: &[u8],
  ) -> Result<Vec<SseEvent>, Error> {
    let mut events = Vec::new();

    for &byte in chunk {
      if self.pending_cr {
        self.pending_cr = false;

        if byte == b'\n' {
          continue;
        }
      }

      match byte {
        b'\r' | b'\n' => {
          self.pending_cr = byte == b'\r';

          let line = std::mem::take(&mut self.line);

          if let Some(event) =
            self.process_line(&String::from_utf8_lossy(&line))
          {
            events.push(event);
          }
        }
        _ => {
          if self.line.len() >= Self::MAX_LINE_LENGTH {
            self.line.clear();

            return Err(Error::Decode {
              reason: format!(
                "event line longer than {} bytes",
                Self::MAX_LINE_LENGTH
              ),
            });
          }

          self.line.push(byte);
        }
      }
    }

    Ok(events)
  }

  fn process_line(&mut self, line: &str) -> Option<SseEvent> {
    if line.is_empty() {
      return self.dispatch();
    }

    if line.starts_with(':') {
      return None;
    }

    let (field, value) = match line.split_once(':') {
      Some((field, value)) => {
        (field, value.strip_prefix(' ').unwrap_or(value))
      }
      None => (line, ""),
    };

    match field {
      "data" => {
        self.data.push_str(value);
        self.data.push('\n');
      }
      "event" => value.clone_into(&mut self.event),
      _ => {}
    }

    None
  }
}
