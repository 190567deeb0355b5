//! Advisory checks over a decoded request.
//!
//! The codec accepts any well-typed request; these checks flag values the
//! remote API conventionally rejects or ignores. Nothing here fails a decode.

use std::fmt;

use crate::chat::{ChatRequest, FunctionCallDirective, Role};
use crate::config::ValidateConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
}

impl Issue {
    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }

    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level}: {}: {}", self.field, self.message)
    }
}

fn check_range(issues: &mut Vec<Issue>, field: &str, value: Option<f64>, lo: f64, hi: f64) {
    if let Some(v) = value {
        if !(lo..=hi).contains(&v) {
            issues.push(Issue::warning(
                field,
                format!("{v} is outside the conventional range [{lo}, {hi}]"),
            ));
        }
    }
}

/// Collect every issue found in `req`, in field order.
#[must_use]
pub fn check(req: &ChatRequest, config: &ValidateConfig) -> Vec<Issue> {
    let mut issues = Vec::new();

    if req.messages.is_empty() {
        issues.push(Issue::error("messages", "at least one message is required"));
    }
    for (i, msg) in req.messages.iter().enumerate() {
        if msg.role == Role::Function && msg.name.is_none() {
            issues.push(Issue::error(
                format!("messages[{i}].name"),
                "function messages must name the function",
            ));
        }
        if msg.content.is_none() && msg.function_call.is_none() && msg.role != Role::Assistant {
            issues.push(Issue::warning(
                format!("messages[{i}].content"),
                format!("{:?} message has no content", msg.role),
            ));
        }
    }

    let functions = req.functions.as_deref().unwrap_or_default();
    for (i, function) in functions.iter().enumerate() {
        if function.name.trim().is_empty() {
            issues.push(Issue::error(
                format!("functions[{i}].name"),
                "function name must not be empty",
            ));
        }
    }

    if let Some(FunctionCallDirective::Named(ref name)) = req.function_call {
        if !functions.iter().any(|f| &f.name == name) {
            issues.push(Issue::error(
                "function_call",
                format!("directive names '{name}', which is not among the declared functions"),
            ));
        }
    }

    check_range(&mut issues, "temperature", req.temperature, 0.0, 2.0);
    check_range(&mut issues, "top_p", req.top_p, 0.0, 1.0);
    check_range(&mut issues, "presence_penalty", req.presence_penalty, -2.0, 2.0);
    check_range(&mut issues, "frequency_penalty", req.frequency_penalty, -2.0, 2.0);

    if req.n == Some(0) {
        issues.push(Issue::warning("n", "requesting zero choices"));
    }
    if let Some(ref stop) = req.stop {
        if stop.len() > config.max_stop_sequences {
            issues.push(Issue::warning(
                "stop",
                format!(
                    "{} stop sequences given, at most {} are honoured",
                    stop.len(),
                    config.max_stop_sequences
                ),
            ));
        }
    }

    issues
}

/// Whether `issues` should fail a check under `config`.
#[must_use]
pub fn is_failure(issues: &[Issue], config: &ValidateConfig) -> bool {
    issues
        .iter()
        .any(|i| i.severity == Severity::Error || config.warn_as_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{FunctionSpec, Message};

    fn base() -> ChatRequest {
        ChatRequest::new("gpt-x", vec![Message::user("hi")])
    }

    #[test]
    fn test_clean_request_has_no_issues() {
        let req = base()
            .with_functions(vec![FunctionSpec::new("lookup")])
            .with_function_call(FunctionCallDirective::named("lookup"))
            .with_temperature(2.0)
            .with_top_p(0.0);
        assert!(check(&req, &ValidateConfig::default()).is_empty());
    }

    #[test]
    fn test_out_of_range_sampling_is_a_warning() {
        let req = base().with_temperature(2.5).with_frequency_penalty(-3.0);
        let issues = check(&req, &ValidateConfig::default());
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, ["temperature", "frequency_penalty"]);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        assert!(!is_failure(&issues, &ValidateConfig::default()));
    }

    #[test]
    fn test_named_directive_must_match_a_function() {
        let req = base().with_function_call(FunctionCallDirective::named("lookup"));
        let issues = check(&req, &ValidateConfig::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "function_call");
        assert!(is_failure(&issues, &ValidateConfig::default()));
    }

    #[test]
    fn test_function_message_without_name() {
        let mut req = base();
        req.messages.push(Message::new(Role::Function, Some("42".into())));
        let issues = check(&req, &ValidateConfig::default());
        assert_eq!(issues[0].field, "messages[1].name");
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_stop_limit_follows_config() {
        let stop: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        let req = base().with_stop(stop);
        assert_eq!(check(&req, &ValidateConfig::default()).len(), 1);

        let relaxed = ValidateConfig {
            max_stop_sequences: 8,
            ..ValidateConfig::default()
        };
        assert!(check(&req, &relaxed).is_empty());
    }

    #[test]
    fn test_warn_as_error() {
        let req = base().with_n(0);
        let issues = check(&req, &ValidateConfig::default());
        let strict = ValidateConfig {
            warn_as_error: true,
            ..ValidateConfig::default()
        };
        assert!(!is_failure(&issues, &ValidateConfig::default()));
        assert!(is_failure(&issues, &strict));
    }

    #[test]
    fn test_empty_messages_is_an_error() {
        let req = ChatRequest::new("gpt-x", Vec::new());
        let issues = check(&req, &ValidateConfig::default());
        assert_eq!(issues[0], Issue::error("messages", "at least one message is required"));
    }
}
