// Shared prompt fragments.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.

/// Voice instruction appended to prompts that write on the user's behalf.
pub const VOICE_INSTRUCTION: &str = "\
    Write the way the user would: natural, direct and polite. \
    Prefer short sentences and concrete examples over generic phrasing.";

/// Instruction asking for the fenced JSON block the summary extractor understands.
pub const FENCED_JSON_INSTRUCTION: &str = "\
    Return your answer as a single JSON object wrapped in a ```json fenced code block. \
    The JSON must be valid and parseable. Do not add text outside the code block.";

/// Fills `{name}` placeholders in a single pass over `template`.
///
/// Substituted values are never rescanned, so user text that happens to
/// contain a placeholder is inserted verbatim. Unknown `{...}` sequences
/// are left as they are.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars
            .iter()
            .find(|(name, _)| tail.starts_with(name) && tail[name.len()..].starts_with('}'));
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_known_placeholders() {
        let filled = fill_template("Hi {name}, see {place}.", &[("name", "Ada"), ("place", "room 4")]);
        assert_eq!(filled, "Hi Ada, see room 4.");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template("A={a} B={b}", &[("a", "{b}"), ("b", "x")]);
        assert_eq!(filled, "A={b} B=x");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template(r#"{"k": 1} {missing} {v}"#, &[("v", "ok")]);
        assert_eq!(filled, r#"{"k": 1} {missing} ok"#);
    }
}
