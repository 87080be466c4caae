use criterion::{criterion_group, criterion_main, Criterion};

#[path = "../tests/common/mod.rs"]
mod common;

fn bench_build(c: &mut Criterion) {
    let game = ec_core::GameCode::from(common::GAME);
    let turn = ec_core::TurnKey::new(5, 1);
    let rows = common::shuffled(common::galaxy(500), 7);

    c.bench_function("extract_500_systems", |b| {
        b.iter(|| ec_world::extract_rows(rows.clone(), game.clone(), turn))
    });

    let (snap, _) = match ec_world::extract_rows(rows.clone(), game.clone(), turn) {
        Ok(out) => out,
        Err(e) => panic!("galaxy does not extract: {e}"),
    };
    c.bench_function("link_500_systems", |b| b.iter(|| ec_world::link(&snap)));

    let world = match ec_world::link(&snap) {
        Ok(world) => world,
        Err(e) => panic!("galaxy does not link: {e}"),
    };
    c.bench_function("flatten_500_systems", |b| b.iter(|| ec_world::flatten(&world)));
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
