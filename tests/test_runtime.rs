// Integration tests for the runtime module
// This file should be run with cargo test --test test_runtime

use airlock::runtime::{
    BashRuntime, CodeRuntime, Language, NodeRuntime, PythonRuntime, RuntimeConfig, RuntimeManager,
};
use serde_json::{Map, Value, json};

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .init();
    });
}

fn make_input(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut input = Map::new();
    for (key, value) in pairs {
        input.insert(key.to_string(), value.clone());
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Python computes over the injected input
    #[tokio::test]
    async fn test_python_execute_sum() {
        init_tracing();

        let runtime = PythonRuntime::new(RuntimeConfig::default());
        if !runtime.is_available() {
            return; // Python not installed on this host
        }

        let input = make_input(&[("a", json!(10)), ("b", json!(20))]);
        let code = "print(_input['a'] + _input['b'])";

        let result = runtime.execute(code, &input).await.expect("execute should not hard-fail");
        assert!(result.success, "expected success, got error: {}", result.error);
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.output, Value::String("30".to_string()));
    }

    /// JSON-looking stdout is parsed into structured output
    #[tokio::test]
    async fn test_python_json_output() {
        init_tracing();

        let runtime = PythonRuntime::new(RuntimeConfig::default());
        if !runtime.is_available() {
            return;
        }

        let input = make_input(&[("a", json!(5)), ("b", json!(3))]);
        let code = r#"
import json
result = {"sum": _input['a'] + _input['b'], "product": _input['a'] * _input['b']}
print(json.dumps(result))
"#;

        let result = runtime.execute(code, &input).await.unwrap();
        assert!(result.success, "expected success, got error: {}", result.error);
        assert_eq!(result.output["sum"], 8, "output should be parsed JSON");
        assert_eq!(result.output["product"], 15);
    }

    /// Malformed code fails with a non-zero exit code
    #[tokio::test]
    async fn test_python_syntax_error() {
        init_tracing();

        let runtime = PythonRuntime::new(RuntimeConfig::default());
        if !runtime.is_available() {
            return;
        }

        let result = runtime
            .execute("this is not valid python", &Map::new())
            .await
            .unwrap();
        assert!(!result.success, "syntax error should fail");
        assert_ne!(result.exit_code, 0, "expected non-zero exit code");
        assert!(!result.error.is_empty(), "error message should carry stderr");
    }

    #[tokio::test]
    async fn test_node_execute_sum() {
        init_tracing();

        let runtime = NodeRuntime::new(RuntimeConfig::default());
        if !runtime.is_available() {
            return; // Node.js not installed on this host
        }

        let input = make_input(&[("a", json!(10)), ("b", json!(20))]);
        let code = "console.log(_input.a + _input.b);";

        let result = runtime.execute(code, &input).await.unwrap();
        assert!(result.success, "expected success, got error: {}", result.error);
        assert_eq!(result.output, Value::String("30".to_string()));
    }

    #[tokio::test]
    async fn test_bash_execute_echo() {
        init_tracing();

        let runtime = BashRuntime::new(RuntimeConfig::default());
        if !runtime.is_available() {
            return;
        }

        let result = runtime
            .execute(r#"echo "Hello, World!""#, &Map::new())
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, Value::String("Hello, World!".to_string()));
    }

    /// String input entries become INPUT_* environment variables
    #[tokio::test]
    async fn test_bash_input_env_vars() {
        init_tracing();

        let runtime = BashRuntime::new(RuntimeConfig::default());
        if !runtime.is_available() {
            return;
        }

        let input = make_input(&[("name", json!("world"))]);
        let result = runtime
            .execute(r#"echo "Hello, ${INPUT_NAME}!""#, &input)
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, Value::String("Hello, world!".to_string()));
    }

    /// Non-string input entries are JSON-stringified into the environment
    #[tokio::test]
    async fn test_bash_non_string_input_env_vars() {
        init_tracing();

        let runtime = BashRuntime::new(RuntimeConfig::default());
        if !runtime.is_available() {
            return;
        }

        let input = make_input(&[("count", json!(3))]);
        let result = runtime.execute(r#"echo "$INPUT_COUNT""#, &input).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, Value::String("3".to_string()));
    }

    /// Bash stdout is never JSON-sniffed
    #[tokio::test]
    async fn test_bash_output_stays_raw() {
        init_tracing();

        let runtime = BashRuntime::new(RuntimeConfig::default());
        if !runtime.is_available() {
            return;
        }

        let result = runtime
            .execute(r#"echo '{"sum": 30}'"#, &Map::new())
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(
            result.output,
            Value::String("{\"sum\": 30}".to_string()),
            "shell output should stay raw text"
        );
    }

    /// Code that outlives the budget is killed and reported as a timeout
    #[tokio::test]
    async fn test_bash_timeout() {
        init_tracing();

        let config = RuntimeConfig {
            timeout_secs: 1,
            ..Default::default()
        };
        let runtime = BashRuntime::new(config);
        if !runtime.is_available() {
            return;
        }

        let result = runtime.execute("sleep 5\necho done", &Map::new()).await.unwrap();
        assert!(!result.success, "expected timeout failure");
        assert_eq!(result.error, "execution timeout");
        assert_eq!(result.exit_code, -1);
    }

    /// Captured output is capped with a truncation marker
    #[tokio::test]
    async fn test_bash_output_truncation() {
        init_tracing();

        let config = RuntimeConfig {
            max_output_bytes: 64,
            ..Default::default()
        };
        let runtime = BashRuntime::new(config);
        if !runtime.is_available() {
            return;
        }

        let result = runtime
            .execute("for i in $(seq 1 100); do echo 0123456789; done", &Map::new())
            .await
            .unwrap();
        assert!(result.success, "expected success, got error: {}", result.error);
        assert!(
            result.stdout.ends_with("...(truncated)"),
            "stdout should carry the truncation marker, got: {}",
            result.stdout
        );
        assert!(result.stdout.len() < 128, "stdout should be capped");
    }

    #[tokio::test]
    async fn test_bash_nonzero_exit() {
        init_tracing();

        let runtime = BashRuntime::new(RuntimeConfig::default());
        if !runtime.is_available() {
            return;
        }

        let result = runtime.execute("exit 3", &Map::new()).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, 3);
    }

    /// The manager dispatches to every runtime usable on this host
    #[tokio::test]
    async fn test_manager_execute_available_languages() {
        init_tracing();

        let manager = RuntimeManager::new(RuntimeConfig::default());
        let languages = manager.available_languages();
        if languages.is_empty() {
            return; // no interpreters on this host
        }

        for lang in languages {
            let code = match lang {
                Language::Python => "print('test')",
                Language::NodeJs => "console.log('test')",
                Language::Bash => "echo test",
            };

            let result = manager.execute(lang, code, &Map::new()).await.unwrap();
            assert!(
                result.success,
                "{lang} execution failed: {}",
                result.error
            );
            assert_eq!(result.output, Value::String("test".to_string()));
        }
    }

    /// Unknown language tags are rejected at parse time
    #[test]
    fn test_unsupported_language_tag() {
        let err = "ruby".parse::<Language>().unwrap_err();
        assert!(
            err.to_string().contains("unsupported language"),
            "unexpected error: {err}"
        );
    }

    /// The PTC wrapper still runs standalone code that uses no tools
    #[tokio::test]
    async fn test_python_bridge_wrapper_without_tool_calls() {
        init_tracing();

        let config = RuntimeConfig::default();
        let mut runtime = PythonRuntime::new(config);
        if !runtime.is_available() {
            return;
        }
        runtime.set_tools(vec!["echo".to_string()]);
        runtime.set_bridge_url("http://127.0.0.1:1"); // never contacted

        let input = make_input(&[("a", json!(2)), ("b", json!(3))]);
        let result = runtime
            .execute("print(_input['a'] * _input['b'])", &input)
            .await
            .unwrap();

        // Hosts without aiohttp exit(1) from the generated preamble; hosts
        // with it print normally. Both paths must classify cleanly.
        if result.success {
            assert_eq!(result.output, Value::String("6".to_string()));
        } else {
            assert_ne!(result.exit_code, 0);
            assert!(result.stderr.contains("aiohttp"), "stderr: {}", result.stderr);
        }
    }
}
