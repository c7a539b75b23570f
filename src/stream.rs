//! Streaming call facade.
//!
//! Exposes the same call shapes as the buffered facade but returns a lazy,
//! single-consumer sequence of token chunks. The connection is opened on
//! first poll, never at construction; dropping the stream drops the
//! connection and stops delivery.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::BytesMut;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt, TryStreamExt};

use crate::api::{ChunkPayload, CompletionRequest, TokenChunk};
use crate::client::Client;
use crate::error::Error;
use crate::http::{HttpTransport, RequestDescriptor};
use crate::model::Model;

impl Client {
    /// Stream a completion for `prompt` with the client's default model.
    pub fn stream(&self, prompt: &str) -> CompletionStream {
        self.stream_with(prompt, &Model::Default)
    }

    /// Stream a completion with an explicit model selector.
    pub fn stream_with(&self, prompt: &str, model: &Model) -> CompletionStream {
        self.send_stream(self.request(prompt, model))
    }

    /// Stream a fully custom request body. No model substitution happens.
    pub fn send_stream(&self, request: CompletionRequest) -> CompletionStream {
        let desc = self.describe(&request.into_streaming());
        CompletionStream::open(self.transport.clone(), desc)
    }
}

/// An ordered, finite sequence of [`TokenChunk`]s.
///
/// Chunks surface in upstream order. A mid-stream failure is delivered as a
/// terminal `Err` item after the chunks that preceded it; the sequence then
/// ends. Not restartable: request a new stream per logical call.
pub struct CompletionStream {
    inner: BoxStream<'static, Result<TokenChunk, Error>>,
}

impl CompletionStream {
    pub(crate) fn open(
        transport: HttpTransport,
        desc: Result<RequestDescriptor, Error>,
    ) -> Self {
        // stream::once defers the connect future until first poll, which is
        // what keeps an unconsumed stream free of network I/O.
        let connect = async move {
            let desc = desc?;
            let response = transport.post_stream(&desc).await?;
            Ok::<_, Error>(token_stream(response))
        };
        Self {
            inner: futures::stream::once(connect).try_flatten().boxed(),
        }
    }
}

impl Stream for CompletionStream {
    type Item = Result<TokenChunk, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for CompletionStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompletionStream")
    }
}

/// Turn an open SSE response into a chunk stream.
fn token_stream(
    response: reqwest::Response,
) -> impl Stream<Item = Result<TokenChunk, Error>> + Send + 'static {
    let bytes = response.bytes_stream().fuse().boxed();
    let decoder = SseDecoder::new();

    futures::stream::try_unfold((bytes, decoder), |(mut bytes, mut decoder)| async move {
        loop {
            match decoder.next_event() {
                Some(SseEvent::Done) => return Ok(None),
                Some(SseEvent::Data(data)) => {
                    let chunk = decode_chunk(&data)?;
                    return Ok(Some((chunk, (bytes, decoder))));
                }
                None => {}
            }

            match bytes.next().await {
                Some(Ok(buf)) => decoder.push(&buf),
                Some(Err(err)) => return Err(Error::classify_send(err)),
                // Upstream closed. Flush a trailing unterminated line, then
                // treat the close as normal completion.
                None => match decoder.flush() {
                    Some(SseEvent::Data(data)) => {
                        let chunk = decode_chunk(&data)?;
                        return Ok(Some((chunk, (bytes, decoder))));
                    }
                    Some(SseEvent::Done) | None => return Ok(None),
                },
            }
        }
    })
}

fn decode_chunk(data: &str) -> Result<TokenChunk, Error> {
    let payload: ChunkPayload = serde_json::from_str(data).map_err(Error::classify_decode)?;
    payload.into_chunk()
}

#[derive(Debug, PartialEq, Eq)]
enum SseEvent {
    Data(String),
    Done,
}

/// Incremental scanner for `data:` lines in an SSE body.
///
/// Pure byte-in, event-out; chunk boundaries can fall anywhere, including
/// inside a line. Comment lines and non-data fields are skipped.
#[derive(Debug, Default)]
struct SseDecoder {
    buf: BytesMut,
}

impl SseDecoder {
    fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Next complete event, if a full line is buffered.
    fn next_event(&mut self) -> Option<SseEvent> {
        while let Some(line) = self.next_line() {
            if let Some(event) = parse_line(&line) {
                return Some(event);
            }
        }
        None
    }

    /// Interpret whatever is left in the buffer as a final line.
    fn flush(&mut self) -> Option<SseEvent> {
        if self.buf.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        parse_line(&line)
    }

    fn next_line(&mut self) -> Option<String> {
        let newline = self.buf.iter().position(|&b| b == b'\n')?;
        let line = self.buf.split_to(newline + 1);
        Some(String::from_utf8_lossy(&line[..newline]).into_owned())
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    let data = line.strip_prefix("data:")?.trim();
    if data.is_empty() {
        None
    } else if data == "[DONE]" {
        Some(SseEvent::Done)
    } else {
        Some(SseEvent::Data(data.to_string()))
    }
}
