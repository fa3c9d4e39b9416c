// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Template helpers available to every template.
//!
//! | Helper | Example | Result |
//! |---|---|---|
//! | `lower` | `{{lower "GET"}}` | `get` |
//! | `upper` | `{{upper "get"}}` | `GET` |
//! | `trim` | `{{trim "  x "}}` | `x` |
//! | `join` | `{{join url.path "/"}}` | `users/42` |
//! | `add` | `{{add @index 1}}` | `1` |
//! | `anchor` | `{{anchor "Get user"}}` | `get-user` |
//! | `pretty_json` | `{{pretty_json body}}` | indented JSON, or `body` as is |
//! | `code_lang` | `{{code_lang "text"}}` | fence info string (empty for text) |

use handlebars::{Handlebars, handlebars_helper};
use serde_json::Value;

handlebars_helper!(lower: |s: str| s.to_lowercase());
handlebars_helper!(upper: |s: str| s.to_uppercase());
handlebars_helper!(trim: |s: str| s.trim().to_owned());
handlebars_helper!(join: |items: array, sep: str| join_values(items, sep));
handlebars_helper!(add: |a: i64, b: i64| a + b);
handlebars_helper!(anchor: |s: str| heading_anchor(s));
handlebars_helper!(pretty_json: |s: str| pretty_print(s));
handlebars_helper!(code_lang: |s: str| fence_language(s));

/// Registers the helper set on `registry`.
pub fn register(registry: &mut Handlebars<'_>) {
    registry.register_helper("lower", Box::new(lower));
    registry.register_helper("upper", Box::new(upper));
    registry.register_helper("trim", Box::new(trim));
    registry.register_helper("join", Box::new(join));
    registry.register_helper("add", Box::new(add));
    registry.register_helper("anchor", Box::new(anchor));
    registry.register_helper("pretty_json", Box::new(pretty_json));
    registry.register_helper("code_lang", Box::new(code_lang));
}

fn join_values(items: &[Value], sep: &str) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(sep)
}

/// Builds a GitHub-style heading anchor: lowercase, spaces become dashes,
/// punctuation other than `-` and `_` is dropped.
fn heading_anchor(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

fn pretty_print(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| text.to_owned())
}

fn fence_language(lang: &str) -> String {
    match lang {
        "text" | "auto" => String::new(),
        other => other.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, data: &Value) -> String {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        register(&mut registry);
        registry.render_template(template, data).unwrap()
    }

    #[test]
    fn changes_case() {
        let data = json!({ "m": "Get" });
        assert_eq!(render("{{lower m}} {{upper m}}", &data), "get GET");
    }

    #[test]
    fn trims() {
        assert_eq!(render("[{{trim s}}]", &json!({ "s": "  x  " })), "[x]");
    }

    #[test]
    fn joins_mixed_values() {
        let data = json!({ "path": ["users", 42, "posts"] });
        assert_eq!(render(r#"{{join path "/"}}"#, &data), "users/42/posts");
    }

    #[test]
    fn adds_to_index() {
        let data = json!({ "xs": ["a", "b"] });
        assert_eq!(render("{{#each xs}}{{add @index 1}}{{/each}}", &data), "12");
    }

    #[test]
    fn builds_heading_anchors() {
        assert_eq!(heading_anchor("Get user"), "get-user");
        assert_eq!(heading_anchor("Create pet (v2)!"), "create-pet-v2");
        assert_eq!(heading_anchor("  snake_case-name "), "snake_case-name");
    }

    #[test]
    fn pretty_prints_json_bodies() {
        assert_eq!(pretty_print(r#"{"id":1}"#), "{\n  \"id\": 1\n}");
    }

    #[test]
    fn leaves_non_json_bodies_alone() {
        assert_eq!(pretty_print("<html></html>"), "<html></html>");
    }

    #[test]
    fn maps_fence_languages() {
        assert_eq!(fence_language("json"), "json");
        assert_eq!(fence_language("HTML"), "html");
        assert_eq!(fence_language("text"), "");
    }
}
