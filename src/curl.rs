//! Diagnostic rendering of requests as runnable curl commands.
//!
//! Rendering consumes the same request descriptor the transport does, so the
//! output names the exact target, method, headers, and body a real send
//! would transmit. Nothing here touches the network.

use crate::api::CompletionRequest;
use crate::client::Client;
use crate::error::Error;
use crate::http::RequestDescriptor;

/// Formatting choices for [`Client::render_curl`].
#[derive(Debug, Clone, Default)]
pub struct CurlOptions {
    /// Break the command across lines and pretty-print the JSON body.
    pub pretty_command: bool,
    /// Pipe the response through `jq .` when the command is run.
    pub pretty_response: bool,
    /// Replace the bearer token with a placeholder. Off by default: the
    /// point of the rendered command is to be runnable as-is.
    pub redact_credential: bool,
}

impl Client {
    /// Render `request` as a curl command equivalent to what [`Client::send`]
    /// would transmit, without sending anything.
    pub fn render_curl(
        &self,
        request: &CompletionRequest,
        options: &CurlOptions,
    ) -> Result<String, Error> {
        let desc = self.describe(request)?;
        render(&desc, options)
    }
}

fn render(desc: &RequestDescriptor, options: &CurlOptions) -> Result<String, Error> {
    let body = if options.pretty_command {
        serde_json::to_string_pretty(&desc.body)
    } else {
        serde_json::to_string(&desc.body)
    }
    .map_err(Error::serialization)?;

    let mut parts = vec![
        format!("curl {}", shell_quote(&desc.url)),
        format!("-X {}", desc.method),
    ];
    for (name, value) in &desc.headers {
        let value = if options.redact_credential && name.eq_ignore_ascii_case("authorization") {
            "Bearer [REDACTED]"
        } else {
            value.as_str()
        };
        parts.push(format!("-H {}", shell_quote(&format!("{name}: {value}"))));
    }
    parts.push(format!("-d {}", shell_quote(&body)));

    let separator = if options.pretty_command { " \\\n  " } else { " " };
    let mut command = parts.join(separator);
    if options.pretty_response {
        command.push_str(" | jq .");
    }
    Ok(command)
}

/// Single-quote `s` for a POSIX shell.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
