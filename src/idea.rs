use crate::validate::{FieldKind, Rejection, Validation, Validator, require};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One brainstormed story idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryIdea {
    pub title: String,
    pub body: String,
}

impl StoryIdea {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Accepts objects with non-blank string `title` and `body`. The strings are
/// kept as received, surrounding whitespace included.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdeaValidator;

impl Validator for IdeaValidator {
    type Item = StoryIdea;

    fn validate(&self, candidate: &Value) -> Validation<StoryIdea> {
        let Some(obj) = candidate.as_object() else {
            return Validation::Invalid(Rejection::NotAnObject);
        };
        let fields = require(obj, "title", FieldKind::String)
            .and_then(|t| require(obj, "body", FieldKind::String).map(|b| (t, b)));
        match fields {
            Ok((Value::String(title), Value::String(body))) => {
                Validation::Valid(StoryIdea::new(title.as_str(), body.as_str()))
            }
            Ok(_) => Validation::Invalid(Rejection::NotAnObject),
            Err(r) => Validation::Invalid(r),
        }
    }
}

/// Render ideas as a numbered listing, one block per idea:
///
/// ```text
/// 1. 标题: <title>
///    故事: <body>
/// ```
pub fn format_numbered(ideas: &[StoryIdea]) -> String {
    let mut out = String::new();
    for (i, idea) in ideas.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        out.push_str(&format!("{}. 标题: {}\n   故事: {}", i + 1, idea.title, idea.body));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_idea_keeps_text_verbatim() {
        let v = IdeaValidator.validate(&json!({"title": " 逆袭 ", "body": "B", "tag": 1}));
        assert_eq!(v, Validation::Valid(StoryIdea::new(" 逆袭 ", "B")));
    }

    #[test]
    fn blank_or_missing_fields_are_rejected() {
        let cases = [
            (json!({"title": "T", "body": ""}), Rejection::BlankString("body")),
            (json!({"title": "  ", "body": "B"}), Rejection::BlankString("title")),
            (json!({"title": "T"}), Rejection::MissingField("body")),
            (
                json!({"title": 3, "body": "B"}),
                Rejection::WrongType {
                    field: "title",
                    expected: FieldKind::String,
                },
            ),
            (json!(["T", "B"]), Rejection::NotAnObject),
            (json!(null), Rejection::NotAnObject),
        ];
        for (candidate, why) in cases {
            assert_eq!(IdeaValidator.validate(&candidate), Validation::Invalid(why));
        }
    }

    #[test]
    fn numbered_listing() {
        let ideas = [StoryIdea::new("A", "one"), StoryIdea::new("B", "two")];
        assert_eq!(
            format_numbered(&ideas),
            "1. 标题: A\n   故事: one\n\n2. 标题: B\n   故事: two"
        );
        assert_eq!(format_numbered(&[]), "");
    }
}
