//! String-substitution templating.
//!
//! Templates mark substitution points with `{{NAME}}` placeholders. The
//! renderer is a pure function over (template, substitution list); there is
//! no global template state and no recursive expansion - a value that
//! itself contains `{{...}}` is inserted verbatim and left alone.

/// Render a template by replacing each `{{NAME}}` placeholder with its value.
///
/// Substitutions are applied in order. Placeholders without a matching
/// entry stay in the output unchanged.
pub fn render(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = template.to_owned();
    for (name, value) in substitutions {
        out = out.replace(&format!("{{{{{name}}}}}"), value);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_placeholder() {
        let result = render("Hello, {{NAME}}!", &[("NAME", "world")]);
        assert_eq!(result, "Hello, world!");
    }

    #[test]
    fn test_render_multiple_placeholders() {
        let result = render(
            "<h1>{{TITLE}}</h1><p>{{BODY}}</p>",
            &[("TITLE", "Intro"), ("BODY", "text")],
        );
        assert_eq!(result, "<h1>Intro</h1><p>text</p>");
    }

    #[test]
    fn test_render_repeated_placeholder() {
        let result = render("{{X}} and {{X}}", &[("X", "a")]);
        assert_eq!(result, "a and a");
    }

    #[test]
    fn test_render_unmatched_placeholder_kept() {
        let result = render("{{KNOWN}} {{UNKNOWN}}", &[("KNOWN", "v")]);
        assert_eq!(result, "v {{UNKNOWN}}");
    }

    #[test]
    fn test_render_value_with_braces_not_expanded() {
        // A substituted value containing a placeholder is not re-expanded
        let result = render("{{A}}", &[("A", "{{B}}"), ("B", "nope")]);
        assert_eq!(result, "{{B}}");
    }

    #[test]
    fn test_render_empty_substitutions() {
        assert_eq!(render("static text", &[]), "static text");
    }
}
