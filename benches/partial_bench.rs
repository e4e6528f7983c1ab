use criterion::{BenchmarkId, Criterion, SamplingMode, criterion_group, criterion_main};
use ideastream::{ChunkAccumulator, IdeaValidator, Options, StoryIdea, parse_partial};
use std::env;
use std::hint::black_box;
use std::time::Duration;

fn reply(n: usize) -> String {
    let ideas: Vec<StoryIdea> = (0..n)
        .map(|i| StoryIdea::new(format!("创意{i}"), "一个关于雨夜和陌生来客的故事，结局出人意料。".repeat(3)))
        .collect();
    format!("```json\n{}\n```", serde_json::to_string_pretty(&ideas).unwrap_or_default())
}

fn bench_partial(c: &mut Criterion) {
    let mut group = c.benchmark_group("partial");
    group.sampling_mode(SamplingMode::Flat);
    if let Some(ss) = env::var("IS_SAMPLE_SIZE").ok().and_then(|v| v.parse::<usize>().ok()) { group.sample_size(ss.max(1)); } else { group.sample_size(10); }
    if let Some(meas) = env::var("IS_MEAS_SEC").ok().and_then(|v| v.parse::<u64>().ok()) { group.measurement_time(Duration::from_secs(meas)); } else { group.measurement_time(Duration::from_secs(6)); }

    let opts = Options::default();
    for n in [5usize, 20] {
        let text = reply(n);
        group.bench_with_input(BenchmarkId::new("full_buffer", n), &text, |b, text| {
            b.iter(|| black_box(parse_partial(black_box(text), &opts, &IdeaValidator)))
        });

        // re-parse after every 16-char delta, as a session does
        let chars: Vec<char> = text.chars().collect();
        group.bench_with_input(BenchmarkId::new("growing_stream", n), &chars, |b, chars| {
            b.iter(|| {
                let mut acc = ChunkAccumulator::new();
                let mut seen = 0usize;
                for piece in chars.chunks(16) {
                    acc.append(&piece.iter().collect::<String>());
                    seen = parse_partial(acc.current_buffer(), &opts, &IdeaValidator).len();
                }
                black_box(seen)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_partial);
criterion_main!(benches);
