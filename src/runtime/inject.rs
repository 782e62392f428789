// Code injection - renders final interpreter source from caller code,
// serialized input, and optional tool bindings.
//
// All generated text goes through one `render` helper over named
// placeholders so the injection contract can be unit-tested without
// running an interpreter.

use serde_json::{Map, Value};

/// Default bridge server base URL when none is configured
pub const DEFAULT_BRIDGE_URL: &str = "http://localhost:8080";

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_SECS: f64 = 0.5;

const PYTHON_PLAIN_TEMPLATE: &str = r#"import json
import sys

# Input data
_input = json.loads('{{input_json}}')

# User code
{{user_code}}
"#;

const PYTHON_BRIDGE_TEMPLATE: &str = r#"import json
import asyncio
import sys
import os

# ========== Bridge client (generated) ==========
try:
    import aiohttp
except ImportError:
    print("Error: aiohttp is required. Install it with: pip install aiohttp", file=sys.stderr)
    sys.exit(1)

class _ToolExecutionError(Exception):
    """The tool ran and reported failure."""
    pass

class _NetworkError(Exception):
    """The bridge server was unreachable or returned a server error."""
    pass

class _BridgeClient:
    def __init__(self, base_url, max_retries={{max_retries}}, retry_delay={{retry_delay}}):
        self.base_url = base_url
        self.max_retries = max_retries
        self.retry_delay = retry_delay
        self._session = None

    async def _get_session(self):
        if self._session is None or self._session.closed:
            self._session = aiohttp.ClientSession()
        return self._session

    async def call_tool(self, name, **kwargs):
        last_error = None
        for attempt in range(self.max_retries):
            try:
                session = await self._get_session()
                async with session.post(
                    f"{self.base_url}/tools/call",
                    json={"tool": name, "input": kwargs},
                    timeout=aiohttp.ClientTimeout(total=60),
                ) as resp:
                    if resp.status >= 500:
                        error_text = await resp.text()
                        last_error = _NetworkError(f"Server error (HTTP {resp.status}): {error_text}")
                        if attempt < self.max_retries - 1:
                            await asyncio.sleep(self.retry_delay * (2 ** attempt))
                            continue
                        raise last_error
                    if resp.status >= 400:
                        error_text = await resp.text()
                        raise _NetworkError(f"Client error (HTTP {resp.status}): {error_text}")
                    result = await resp.json()
                    if not result.get("success"):
                        error_msg = result.get("error", "Unknown error")
                        raise _ToolExecutionError(f"Tool {name} failed: {error_msg}")
                    return result.get("result")
            except aiohttp.ClientConnectorError as e:
                last_error = _NetworkError(f"Connection error: {str(e)}. Is the bridge server running?")
                if attempt < self.max_retries - 1:
                    await asyncio.sleep(self.retry_delay * (2 ** attempt))
                    continue
                raise last_error
            except aiohttp.ClientError as e:
                last_error = _NetworkError(f"Network error: {str(e)}")
                if attempt < self.max_retries - 1:
                    await asyncio.sleep(self.retry_delay * (2 ** attempt))
                    continue
                raise last_error
            except _ToolExecutionError:
                raise
            except asyncio.TimeoutError:
                last_error = _NetworkError(f"Tool {name} timed out after 60 seconds")
                if attempt < self.max_retries - 1:
                    await asyncio.sleep(self.retry_delay * (2 ** attempt))
                    continue
                raise last_error
        if last_error:
            raise last_error
        raise _NetworkError(f"Failed to call tool {name} after {self.max_retries} attempts")

    async def close(self):
        if self._session and not self._session.closed:
            await self._session.close()

_bridge = _BridgeClient("{{base_url}}")

def _make_tool_function(bridge, tool_name):
    async def tool_func(**kwargs):
        return await bridge.call_tool(tool_name, **kwargs)
    tool_func.__name__ = tool_name
    return tool_func

# Install one callable per bound tool into the global namespace
_available_tools = {{tools_json}}
for _tool_name in _available_tools:
    globals()[_tool_name] = _make_tool_function(_bridge, _tool_name)

# ========== User code ==========

# Input data
_input = json.loads('{{input_json}}')

async def _user_main():
{{user_code}}

if __name__ == "__main__":
    try:
        asyncio.run(_user_main())
    finally:
        asyncio.run(_bridge.close())
"#;

const NODE_TEMPLATE: &str = r#"// Input data
const _input = {{input_json}};

// User code
{{user_code}}
"#;

const BASH_TEMPLATE: &str = r#"#!/bin/bash
set -e

# Input as JSON (use jq to parse)
INPUT_JSON='{{input_json}}'

# User code
{{user_code}}
"#;

/// Substitute named placeholders into a template
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(key, value);
    }
    out
}

/// Escape text for embedding inside a Python single-quoted string literal
fn python_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Escape text for embedding inside a shell single-quoted string
fn shell_single_quoted(s: &str) -> String {
    s.replace('\'', "'\\''")
}

/// Indent every non-blank line of a code block
fn indent(code: &str, pad: &str) -> String {
    let indented: Vec<String> = code
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect();
    indented.join("\n")
}

fn input_json(input: &Map<String, Value>) -> String {
    serde_json::to_string(input).unwrap_or_else(|_| "{}".to_string())
}

/// Render final Python source
///
/// Without tool bindings the injection is minimal: the input constant plus
/// the caller's code verbatim. With bindings the bridge client and one
/// callable per tool are emitted ahead of the user code, which is wrapped
/// in an async entry point so tool calls can be awaited.
pub fn wrap_python(
    code: &str,
    input: &Map<String, Value>,
    tools: &[String],
    bridge_url: Option<&str>,
) -> String {
    let input_json = python_single_quoted(&input_json(input));

    if tools.is_empty() {
        return render(
            PYTHON_PLAIN_TEMPLATE,
            &[("{{input_json}}", input_json.as_str()), ("{{user_code}}", code)],
        );
    }

    let base_url = bridge_url.unwrap_or(DEFAULT_BRIDGE_URL);
    let tools_json = serde_json::to_string(tools).unwrap_or_else(|_| "[]".to_string());
    let max_retries = DEFAULT_MAX_RETRIES.to_string();
    let retry_delay = DEFAULT_RETRY_DELAY_SECS.to_string();
    let mut body = indent(code, "    ");
    if body.trim().is_empty() {
        body = "    pass".to_string();
    }

    render(
        PYTHON_BRIDGE_TEMPLATE,
        &[
            ("{{base_url}}", base_url),
            ("{{max_retries}}", max_retries.as_str()),
            ("{{retry_delay}}", retry_delay.as_str()),
            ("{{tools_json}}", tools_json.as_str()),
            ("{{input_json}}", input_json.as_str()),
            ("{{user_code}}", body.as_str()),
        ],
    )
}

/// Render final Node.js source
pub fn wrap_node(code: &str, input: &Map<String, Value>) -> String {
    let input_json = input_json(input);
    render(
        NODE_TEMPLATE,
        &[("{{input_json}}", input_json.as_str()), ("{{user_code}}", code)],
    )
}

/// Render final Bash source
pub fn wrap_bash(code: &str, input: &Map<String, Value>) -> String {
    let input_json = shell_single_quoted(&input_json(input));
    render(
        BASH_TEMPLATE,
        &[("{{input_json}}", input_json.as_str()), ("{{user_code}}", code)],
    )
}
