use std::sync::OnceLock;

use regex::Regex;

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// An optional fallback can be supplied as `{{ env.VAR | default("x") }}`.
/// Expansion runs before deserialization so config structs hold plain
/// `String`/`SecretString` values. TOML comment lines pass through
/// untouched so commented-out secrets never fail the load.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn placeholder() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r#"\{\{\s*env\.([A-Za-z0-9_]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
                .expect("must be valid regex")
        })
    }

    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut cursor = 0;
        for captures in placeholder().captures_iter(line) {
            let matched = captures.get(0).expect("regex always has a full match");
            let var_name = &captures[1];
            let fallback = captures.get(2).map(|m| m.as_str());

            output.push_str(&line[cursor..matched.start()]);

            match std::env::var(var_name) {
                Ok(value) => output.push_str(&value),
                Err(_) => match fallback {
                    Some(default) => output.push_str(default),
                    None => return Err(format!("environment variable not found: `{var_name}`")),
                },
            }

            cursor = matched.end();
        }
        output.push_str(&line[cursor..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_without_placeholders() {
        let input = "key = \"value\"";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn expands_set_variable() {
        temp_env::with_var("MUSE_TEST_KEY", Some("sk-123"), || {
            let result = expand_env("api_key = \"{{ env.MUSE_TEST_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"sk-123\"");
        });
    }

    #[test]
    fn missing_variable_errors() {
        temp_env::with_var_unset("MUSE_MISSING", || {
            let err = expand_env("key = \"{{ env.MUSE_MISSING }}\"").unwrap_err();
            assert!(err.contains("MUSE_MISSING"));
        });
    }

    #[test]
    fn fallback_used_when_unset() {
        temp_env::with_var_unset("MUSE_OPTIONAL", || {
            let result = expand_env("key = \"{{ env.MUSE_OPTIONAL | default(\"none\") }}\"").unwrap();
            assert_eq!(result, "key = \"none\"");
        });
    }

    #[test]
    fn comment_lines_skip_expansion() {
        temp_env::with_var_unset("MUSE_MISSING", || {
            let input = "  # key = \"{{ env.MUSE_MISSING }}\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
