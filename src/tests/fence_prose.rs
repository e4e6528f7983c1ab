use super::*;

fn ideas(s: &str) -> Vec<StoryIdea> {
    parse_partial(s, &Options::default(), &IdeaValidator)
}

#[test]
fn fence_without_language_tag() {
    let s = "```\n[{\"title\":\"T\",\"body\":\"B\"}]\n```\n";
    assert_eq!(ideas(s), vec![StoryIdea::new("T", "B")]);
}

#[test]
fn fence_with_crlf_and_uppercase_tag() {
    let s = "```JSON\r\n[{\"title\":\"T\",\"body\":\"B\"}]\r\n```";
    assert_eq!(ideas(s), vec![StoryIdea::new("T", "B")]);
}

#[test]
fn closing_fence_still_streaming_in() {
    for tail in ["\n", "\n`", "\n``"] {
        let s = format!("```json\n[{{\"title\":\"T\",\"body\":\"B\"}}]{tail}");
        assert_eq!(ideas(&s), vec![StoryIdea::new("T", "B")], "{:?}", tail);
    }
}

#[test]
fn opening_fence_alone_is_empty() {
    for s in ["`", "``", "```", "```js", "```json\n  "] {
        assert!(ideas(s).is_empty(), "{:?}", s);
    }
}

#[test]
fn fence_stripping_can_be_disabled() {
    let opts = Options {
        fenced_code_blocks: false,
        ..Default::default()
    };
    // the array is still found past the marker as leading prose
    let s = "```json\n[{\"title\":\"T\",\"body\":\"B\"}]\n```";
    assert_eq!(parse_partial(s, &opts, &IdeaValidator).len(), 1);
    let strict = Options {
        fenced_code_blocks: false,
        skip_leading_prose: false,
        ..Default::default()
    };
    assert!(parse_partial(s, &strict, &IdeaValidator).is_empty());
}

#[test]
fn bom_and_leading_whitespace() {
    let s = "\u{FEFF}  \n```json\n[{\"title\":\"T\",\"body\":\"B\"}]";
    assert_eq!(ideas(s), vec![StoryIdea::new("T", "B")]);
}

#[test]
fn object_root_yields_nothing() {
    assert!(ideas("{\"ideas\":[{\"title\":\"T\",\"body\":\"B\"}]}").is_empty());
}

#[test]
fn backticks_inside_values_do_not_close_the_fence() {
    let open = "```json\n[{\"title\":\"A\",\"body\":\"run ```ls``` first\"},{\"title\":\"B\",\"body\":\"z\"}";
    let expected = vec![StoryIdea::new("A", "run ```ls``` first"), StoryIdea::new("B", "z")];
    assert_eq!(ideas(open), expected);
    assert_eq!(ideas(&format!("{open}]\n```\n")), expected);
}

#[test]
fn fenced_stream_with_backticks_never_shrinks() {
    let full = "```json\n[{\"title\":\"A\",\"body\":\"use `x` or ```y```\"},{\"title\":\"B\",\"body\":\"z\"}]\n```";
    let mut last = 0usize;
    for (i, _) in full.char_indices().chain(std::iter::once((full.len(), ' '))) {
        let got = ideas(&full[..i]);
        assert!(got.len() >= last, "shrank at {:?}", &full[..i]);
        if let Some(first) = got.first() {
            assert!("use `x` or ```y```".starts_with(first.body.as_str()), "{:?}", first);
        }
        last = got.len();
    }
    assert_eq!(last, 2);
}

#[test]
fn apostrophes_in_single_quoted_values() {
    assert_eq!(
        ideas("[{'title':'Tom's day','body':'x'}]"),
        vec![StoryIdea::new("Tom's day", "x")]
    );
}

#[test]
fn braces_in_leading_prose_are_not_the_root() {
    let s = "Format {title, body}:\n[{\"title\":\"T\",\"body\":\"B\"}]";
    assert_eq!(ideas(s), vec![StoryIdea::new("T", "B")]);
    let outcome = parse_partial_outcome("Format {title, body}: coming up", &Options::default(), &IdeaValidator);
    assert_eq!(outcome.miss, Some(ParseMiss::NotAnArray));
}
