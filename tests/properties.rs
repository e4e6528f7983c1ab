use ideastream::{IdeaValidator, Options, StoryIdea, parse_partial, repair_to_string};
use proptest::prelude::*;

fn idea_strategy() -> impl Strategy<Value = StoryIdea> {
    let text = "[a-z0-9 标题故事\"\\\\,:\\]\\}#/'`]{0,10}";
    (text, text).prop_map(|(t, b)| StoryIdea::new(t, b))
}

fn expected_valid(ideas: &[StoryIdea]) -> Vec<StoryIdea> {
    ideas
        .iter()
        .filter(|i| !i.title.trim().is_empty() && !i.body.trim().is_empty())
        .cloned()
        .collect()
}

fn char_prefixes(s: &str) -> impl Iterator<Item = &str> {
    s.char_indices().map(|(i, _)| &s[..i]).chain(std::iter::once(s))
}

proptest! {
    #[test]
    fn repair_output_is_a_fixed_point(input in "[\\[\\]{}\"',:a-zA-Z0-9 .+\\-\\\\/*#标\n]{0,64}") {
        if let Ok(once) = repair_to_string(&input, &Options::default()) {
            prop_assert!(serde_json::from_str::<serde_json::Value>(&once).is_ok(), "{:?}", once);
            let twice = repair_to_string(&once, &Options::default()).unwrap();
            prop_assert_eq!(twice, once);
        }
    }

    #[test]
    fn garbage_never_panics_and_yields_nothing_unvalidated(input in "[\\[\\]{}\",:a-z0-9 \\\\`'\n]{0,80}") {
        let got = parse_partial(&input, &Options::default(), &IdeaValidator);
        for idea in got {
            prop_assert!(!idea.title.trim().is_empty());
            prop_assert!(!idea.body.trim().is_empty());
        }
    }

    #[test]
    fn growing_prefix_never_loses_items(ideas in prop::collection::vec(idea_strategy(), 0..5), pretty in any::<bool>()) {
        let full = if pretty {
            serde_json::to_string_pretty(&ideas).unwrap()
        } else {
            serde_json::to_string(&ideas).unwrap()
        };
        let mut last = 0usize;
        for prefix in char_prefixes(&full) {
            let n = parse_partial(prefix, &Options::default(), &IdeaValidator).len();
            prop_assert!(n >= last, "count dropped {} -> {} at {:?}", last, n, prefix);
            last = n;
        }
        let complete = parse_partial(&full, &Options::default(), &IdeaValidator);
        prop_assert_eq!(complete, expected_valid(&ideas));
    }

    #[test]
    fn fenced_and_bare_replies_agree(ideas in prop::collection::vec(idea_strategy(), 1..4), tag in "(json|JSON|)") {
        let bare = serde_json::to_string(&ideas).unwrap();
        let fenced = format!("```{tag}\n{bare}\n```");
        let opts = Options::default();
        prop_assert_eq!(
            parse_partial(&fenced, &opts, &IdeaValidator),
            parse_partial(&bare, &opts, &IdeaValidator)
        );
    }
}
