use super::*;

// Shared test helpers
fn lcg_sizes(seed: u64, len: usize) -> Vec<usize> {
    let mut x = seed;
    let mut out = Vec::new();
    let mut total = 0usize;
    while total < len {
        // LCG: constants from Numerical Recipes
        x = x.wrapping_mul(1664525).wrapping_add(1013904223);
        // chunk size in [1..16]
        let mut n = (((x >> 24) as usize) % 16) + 1;
        if total + n > len {
            n = len - total;
        }
        out.push(n);
        total += n;
    }
    out
}

/// Split `s` into chunks of the given sizes, counted in chars so multi-byte
/// text never splits inside a code point.
fn chunk_by_char(s: &str, sizes: &[usize]) -> Vec<String> {
    let mut res = Vec::new();
    let mut iter = s.chars();
    for &n in sizes {
        let chunk: String = iter.by_ref().take(n).collect();
        if chunk.is_empty() {
            break;
        }
        res.push(chunk);
    }
    let rest: String = iter.collect();
    if !rest.is_empty() {
        res.push(rest);
    }
    res
}

fn ideas_json(n: usize) -> String {
    let items: Vec<StoryIdea> = (0..n)
        .map(|i| StoryIdea::new(format!("标题{i}"), format!("第{i}个故事：主角遇到\"转折\"，然后结局。")))
        .collect();
    serde_json::to_string_pretty(&items).unwrap()
}

// Submodules (topic-based)
mod fence_prose;
mod writer;
