use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use goalcast::blend::BlendPolicy;
use goalcast::fake_feed::{raw_event, raw_match};
use goalcast::feed::{parse_fixture_info_json, parse_livescores_json, snapshot_from_raw};
use goalcast::model::MatchSnapshot;
use goalcast::{aggregate, temporal};

const LIVESCORES_JSON: &str = include_str!("../tests/fixtures/livescores.json");
const FIXTURE_INFO_JSON: &str = include_str!("../tests/fixtures/fixture_info.json");

fn busy_snapshot() -> MatchSnapshot {
    let mut events = Vec::new();
    for i in 0..120u64 {
        let minute = (i % 88) as u32 + 1;
        let team = if i % 2 == 0 { 10 } else { 11 };
        let kind = match i % 5 {
            0 => "shot",
            1 => "freekick",
            2 => "corner",
            3 => "yellowcard",
            _ => "shot",
        };
        let coords = (kind == "shot").then(|| {
            let toward = if team == 10 { 95.0 } else { 5.0 };
            (toward - (i % 20) as f64, 20.0 + (i % 25) as f64)
        });
        events.push(raw_event(i, 500, minute, team, kind, i % 3 == 0, coords));
    }
    let raw = raw_match(500, 70, 2, 1, 10, 11, events);
    snapshot_from_raw(&raw).expect("complete fixture")
}

fn bench_full_analysis(c: &mut Criterion) {
    let snapshot = busy_snapshot();
    let context = parse_fixture_info_json(FIXTURE_INFO_JSON).expect("fixture info parses");
    c.bench_function("analyze_snapshot_busy_match", |b| {
        b.iter(|| {
            aggregate::analyze_snapshot(
                black_box(&snapshot),
                Some(black_box(&context)),
                BlendPolicy::FixedHalf,
            )
        })
    });
}

fn bench_temporal_windows(c: &mut Criterion) {
    let snapshot = busy_snapshot();
    c.bench_function("analyze_windows", |b| {
        b.iter(|| temporal::analyze_windows(black_box(&snapshot.events), 70, None, None))
    });
}

fn bench_feed_parsing(c: &mut Criterion) {
    c.bench_function("parse_livescores", |b| {
        b.iter(|| parse_livescores_json(black_box(LIVESCORES_JSON)).expect("parses"))
    });
}

criterion_group!(
    benches,
    bench_full_analysis,
    bench_temporal_windows,
    bench_feed_parsing
);
criterion_main!(benches);
