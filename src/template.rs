//! Named-placeholder template rendering
//!
//! The mail templates are plain text with `{placeholder}` markers. Rendering
//! substitutes the supplied values and then verifies that no marker is left
//! unresolved, so a template/renderer mismatch fails loudly instead of
//! leaking braces into the sent email.

use thiserror::Error;

/// Errors that can occur while rendering a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template contains a placeholder the renderer did not supply
    #[error("Template '{template}' has unresolved placeholder '{{{placeholder}}}'")]
    UnresolvedPlaceholder {
        template: &'static str,
        placeholder: String,
    },
}

/// A named format string with `{placeholder}` markers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Template {
    pub name: &'static str,
    pub text: &'static str,
}

impl Template {
    /// Renders the template with the given placeholder values
    ///
    /// Every `{name}` marker in the template text must be covered by
    /// `values`; supplying a value the template does not use is allowed.
    /// Validation runs against the template itself, so substituted values
    /// are free to contain brace spans of their own.
    pub(crate) fn render(&self, values: &[(&str, &str)]) -> Result<String, TemplateError> {
        for placeholder in placeholders(self.text) {
            if !values.iter().any(|(name, _)| *name == placeholder) {
                return Err(TemplateError::UnresolvedPlaceholder {
                    template: self.name,
                    placeholder,
                });
            }
        }

        let mut result = self.text.to_string();
        for (name, value) in values {
            result = result.replace(&format!("{{{name}}}"), value);
        }

        Ok(result)
    }
}

/// Collects the `{placeholder}` markers of a template text, in order
///
/// Only `{lower_snake_case}` spans count as placeholders; any other braces
/// (CSS blocks and the like) are left alone.
fn placeholders(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        let tail = &rest[start + 1..];
        let Some(end) = tail.find(['{', '}']) else {
            break;
        };

        let candidate = &tail[..end];
        if tail[end..].starts_with('}')
            && !candidate.is_empty()
            && candidate
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            found.push(candidate.to_string());
        }
        rest = &tail[end..];
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_all_placeholders() {
        let template = Template {
            name: "greeting",
            text: "Hello {name}, welcome to {place}!",
        };

        let result = template
            .render(&[("name", "Omar"), ("place", "Baltimore")])
            .unwrap();
        assert_eq!(result, "Hello Omar, welcome to Baltimore!");
    }

    #[test]
    fn test_repeated_placeholder_is_replaced_everywhere() {
        let template = Template {
            name: "echo",
            text: "{word} {word}",
        };

        assert_eq!(template.render(&[("word", "hi")]).unwrap(), "hi hi");
    }

    #[test]
    fn test_unresolved_placeholder_is_an_error() {
        let template = Template {
            name: "greeting",
            text: "Hello {name}, welcome to {place}!",
        };

        let err = template.render(&[("name", "Omar")]).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::UnresolvedPlaceholder { template: "greeting", placeholder } if placeholder == "place"
        ));
    }

    #[test]
    fn test_non_placeholder_braces_are_ignored() {
        let template = Template {
            name: "styled",
            text: "<style>.card { color: red; }</style><p>{text}</p>",
        };

        let result = template.render(&[("text", "ok")]).unwrap();
        assert!(result.contains("{ color: red; }"));
        assert!(result.contains("<p>ok</p>"));
    }

    #[test]
    fn test_value_containing_a_brace_span_renders() {
        let template = Template {
            name: "card",
            text: "<b>{title}</b>",
        };

        let result = template.render(&[("title", "The {pilot} Episode")]).unwrap();
        assert_eq!(result, "<b>The {pilot} Episode</b>");
    }

    #[test]
    fn test_unused_value_is_allowed() {
        let template = Template {
            name: "minimal",
            text: "{text}",
        };

        assert_eq!(
            template.render(&[("text", "ok"), ("extra", "x")]).unwrap(),
            "ok"
        );
    }
}
