//! Criterion benchmarks for atmos stages
//!
//! Run with: cargo bench -p atmos-effects
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use atmos_effects::{
    BinauralPanner, BrightnessFilter, DopplerSettings, DopplerShifter, FdnReverb, Lofi,
    ReverbParams, Spatializer, azimuth_to_binaural,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("FdnReverb");
    let mut reverb = FdnReverb::new(SAMPLE_RATE);
    reverb.update_params(&ReverbParams {
        room_size: 0.8,
        rt60: 4.0,
        modulation: 0.5,
        ..ReverbParams::default()
    });

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut left = vec![0.0; block_size];
                let mut right = vec![0.0; block_size];
                b.iter(|| {
                    reverb.process_block(black_box(&input), &mut left, &mut right);
                    black_box(left[0] + right[0])
                })
            },
        );
    }
    group.finish();
}

fn bench_stereo_stage(
    c: &mut Criterion,
    name: &str,
    mut stage: impl FnMut(&mut [f32], &mut [f32]),
) {
    let mut group = c.benchmark_group(name);
    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    stage(black_box(&mut left), black_box(&mut right));
                    black_box(left[0])
                })
            },
        );
    }
    group.finish();
}

fn bench_brightness(c: &mut Criterion) {
    let mut filter = BrightnessFilter::new(SAMPLE_RATE);
    bench_stereo_stage(c, "Brightness", |l, r| filter.process(-0.5, l, r));
}

fn bench_lofi(c: &mut Criterion) {
    let mut lofi = Lofi::new();
    bench_stereo_stage(c, "Lofi", |l, r| lofi.process(0.7, l, r));
}

fn bench_binaural(c: &mut Criterion) {
    let mut panner = BinauralPanner::new(SAMPLE_RATE);
    panner.set_params(&azimuth_to_binaural(45.0, 0.0, 1000.0));
    bench_stereo_stage(c, "BinauralPanner", |l, r| panner.process(l, r));
}

fn bench_doppler(c: &mut Criterion) {
    let mut group = c.benchmark_group("Doppler");
    let mut doppler = DopplerShifter::new();
    doppler.set_settings(DopplerSettings {
        source_velocity: 20.0,
        listener_velocity: 0.0,
        enabled: true,
    });
    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut left = vec![0.0; block_size];
                let mut right = vec![0.0; block_size];
                b.iter(|| {
                    doppler.process(black_box(&input), &input, &mut left, &mut right);
                    black_box(left[0])
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_reverb,
    bench_brightness,
    bench_lofi,
    bench_binaural,
    bench_doppler
);
criterion_main!(benches);
