use super::*;

fn via_writer(s: &str, opts: &Options) -> String {
    let mut out = Vec::new();
    repair_to_writer(s, opts, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn writer_matches_string_output() {
    let opts = Options::default();
    let full = ideas_json(3);
    let half: String = full.chars().take(full.chars().count() / 2).collect();
    let cases = [
        "[1, 2,",
        "{\"a\": [true, fals",
        "```json\n[{\"title\": \"T\", 'body': 'B'}]\n```",
        "Here you go: [1, /* two */ 2",
        full.as_str(),
        half.as_str(),
    ];
    for s in cases {
        assert_eq!(via_writer(s, &opts), repair_to_string(s, &opts).unwrap(), "{:?}", s);
    }
}

#[test]
fn writer_handles_output_larger_than_its_buffer() {
    let big = format!("[{}", "\"x\",".repeat(20_000));
    let out = via_writer(&big, &Options::default());
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 20_000);
}

#[test]
fn writer_reports_repair_errors() {
    let mut out = Vec::new();
    let err = repair_to_writer("no json here", &Options::default(), &mut out).unwrap_err();
    assert_eq!(err.kind, RepairErrorKind::NoJsonRoot);
}
