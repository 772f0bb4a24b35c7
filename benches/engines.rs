use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gamebot::config::GameConfig;
use gamebot::games::{crash_point, CrashEngine, KenoEngine, KenoPicks, Multiplier};
use gamebot::ledger::Ledger;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn keno_rounds(c: &mut Criterion) {
    let config = GameConfig::default();
    let engine = KenoEngine::new(config.betting.clone(), config.keno.clone());
    let mut group = c.benchmark_group("keno_play");

    for pick_count in [1u8, 5, 10] {
        let picks = KenoPicks::from_numbers(1..=pick_count).expect("valid picks");
        group.bench_function(BenchmarkId::new("picks", pick_count), |b| {
            let mut rng = StdRng::seed_from_u64(42);
            let mut ledger = Ledger::new(u64::MAX / 2);
            b.iter(|| black_box(engine.play(&mut ledger, 10, &picks, &mut rng)))
        });
    }
    group.finish();

    c.bench_function("keno_draw", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| black_box(engine.draw(&mut rng)))
    });
}

fn crash_rounds(c: &mut Criterion) {
    let config = GameConfig::default();
    let engine = CrashEngine::new(config.betting.clone(), config.crash.clone());
    let tiers = config.crash.tiers.clone();

    c.bench_function("crash_point", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| {
            let (u, v): (f64, f64) = (rng.gen(), rng.gen());
            black_box(crash_point(&tiers, u, v))
        })
    });

    let mut group = c.benchmark_group("crash_play");
    for target in [110u32, 200, 1000] {
        let target = Multiplier::from_hundredths(target);
        group.bench_function(BenchmarkId::new("target", target), |b| {
            let mut rng = StdRng::seed_from_u64(7);
            let mut ledger = Ledger::new(u64::MAX / 2);
            b.iter(|| black_box(engine.play(&mut ledger, 10, target, &mut rng)))
        });
    }
    group.finish();
}

criterion_group!(benches, keno_rounds, crash_rounds);
criterion_main!(benches);
