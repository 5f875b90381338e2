//! End-to-end tests of the engine: scenarios, files, threads and the
//! properties every block must satisfy.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use atmos_engine::{
    AudioBuffer, AudioBufferMut, Engine, EngineConfig, Error, MainParams, ParamId, Scenario,
    ScenarioBlend, Status,
};
use tempfile::TempDir;

fn test_signal(frames: usize) -> Vec<f32> {
    (0..frames)
        .map(|i| {
            let t = i as f32 / 48000.0;
            (2.0 * std::f32::consts::PI * 220.0 * t).sin() * 0.5
        })
        .collect()
}

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

#[test]
fn cave_scenario_has_literal_values() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    engine.params().load_scenario("cave").unwrap();
    let main = engine.params().main_params();
    assert_eq!(
        main,
        MainParams {
            distance: 20.0,
            room_size: 0.7,
            brightness: 0.0,
            width: 1.5,
            dry_wet: 0.65,
            intensity: 1.0,
        }
    );
}

#[test]
fn every_factory_scenario_renders_finite_audio() {
    let input = test_signal(1024);
    let mut out = vec![0.0f32; 2048];
    for name in atmos_config::FACTORY_SCENARIO_NAMES {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.params().load_scenario(name).unwrap();
        for _ in 0..8 {
            engine
                .process(
                    Some(AudioBuffer::mono(&input)),
                    &mut AudioBufferMut::interleaved(&mut out, 2),
                )
                .unwrap();
            assert!(out.iter().all(|s| s.is_finite()), "{name} produced non-finite output");
        }
    }
}

#[test]
fn scenario_file_applies_to_plane() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hall.toml");
    std::fs::write(
        &path,
        r#"
name = "hall"
description = "Concert hall"

[main]
distance = 15.0
room_size = 0.8
dry_wet = 0.55

[extended]
decay_time = 2.4
diffusion = 0.9
"#,
    )
    .unwrap();

    let scenario = Scenario::load(&path).unwrap();
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let plane = engine.params();
    plane.apply_scenario_def(&scenario).unwrap();
    assert_eq!(plane.get(ParamId::Distance), 15.0);
    assert_eq!(plane.get(ParamId::RoomSize), 0.8);
    assert_eq!(plane.get(ParamId::Width), 1.0);
    assert_eq!(plane.get(ParamId::DecayTime), 2.4);
}

#[test]
fn missing_scenario_file_maps_to_file_not_found() {
    let dir = TempDir::new().unwrap();
    let err: Error = Scenario::load(dir.path().join("nope.toml")).unwrap_err().into();
    assert_eq!(err.status(), Status::FileNotFound);

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "name = [").unwrap();
    let err: Error = Scenario::load(&bad).unwrap_err().into();
    assert_eq!(err.status(), Status::ParseError);
}

#[test]
fn blend_moves_between_scenarios() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let plane = engine.params();
    plane
        .blend_scenarios(&[
            ScenarioBlend::new("small_room", 3.0),
            ScenarioBlend::new("cathedral", 1.0),
        ])
        .unwrap();
    let (small, _) = Engine::scenario_defaults("small_room").unwrap();
    let (cathedral, _) = Engine::scenario_defaults("cathedral").unwrap();
    let expected = 0.75 * small.room_size + 0.25 * cathedral.room_size;
    assert!((plane.get(ParamId::RoomSize) - expected).abs() < 1e-5);

    let err = plane
        .blend_scenarios(&[ScenarioBlend::new("atlantis", 1.0)])
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidPreset);
    let err = plane
        .blend_scenarios(&[ScenarioBlend::new("cave", 0.0)])
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidParam);
}

#[test]
fn control_thread_updates_reach_audio_thread() {
    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    let plane = engine.params();
    let stop = Arc::new(AtomicBool::new(false));

    let writer = {
        let plane = Arc::clone(&plane);
        let stop = Arc::clone(&stop);
        std::thread::spawn(move || {
            let mut i = 0u32;
            while !stop.load(Ordering::Relaxed) {
                let v = (i % 100) as f32 / 100.0;
                plane.set_room_size(v);
                plane.set_distance(v * 50.0);
                plane.set_dry_wet(v);
                plane.apply_expression("warmth:0.3 chaos:0.1");
                i = i.wrapping_add(1);
            }
        })
    };

    let input = test_signal(256);
    let mut out = vec![0.0f32; 512];
    for _ in 0..200 {
        engine
            .process(
                Some(AudioBuffer::mono(&input)),
                &mut AudioBufferMut::interleaved(&mut out, 2),
            )
            .unwrap();
        assert!(out.iter().all(|s| s.is_finite()));
    }
    stop.store(true, Ordering::Relaxed);
    writer.join().unwrap();

    plane.set_distance(123.0);
    assert_eq!(plane.get(ParamId::Distance), 123.0);
}

#[test]
fn reverb_tail_decays() {
    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    let plane = engine.params();
    plane.set_dry_wet(1.0);
    plane.set_decay_time(0.5);

    let mut impulse = vec![0.0f32; 4800];
    impulse[0] = 1.0;
    let mut out = vec![0.0f32; 4800];
    engine
        .process(Some(AudioBuffer::mono(&impulse)), &mut AudioBufferMut::mono(&mut out))
        .unwrap();

    // 100 ms windows over two seconds; compare averages of early and late halves.
    let mut windows = Vec::new();
    for _ in 0..20 {
        engine
            .process(None, &mut AudioBufferMut::mono(&mut out))
            .unwrap();
        assert!(out.iter().all(|s| s.is_finite()));
        windows.push(rms(&out));
    }
    let early: f32 = windows[..5].iter().sum();
    let late: f32 = windows[15..].iter().sum();
    assert!(late < early * 0.01, "early {early} late {late}");
}

#[test]
fn loudness_normalization_reaches_target() {
    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    engine.params().set_dry_wet(0.0);
    engine.params().set_distance(0.1);

    let input = test_signal(4096);
    let mut out = vec![0.0f32; 4096];
    engine
        .process(Some(AudioBuffer::mono(&input)), &mut AudioBufferMut::mono(&mut out))
        .unwrap();
    engine.measure_loudness(&AudioBuffer::mono(&out)).unwrap();
    engine.normalize_loudness(-30.0).unwrap();

    engine
        .process(Some(AudioBuffer::mono(&input)), &mut AudioBufferMut::mono(&mut out))
        .unwrap();
    let lufs = engine.measure_loudness(&AudioBuffer::mono(&out)).unwrap();
    assert!((lufs + 30.0).abs() < 0.1, "measured {lufs}");
}

#[test]
fn engines_are_independent() {
    let mut a = Engine::new(EngineConfig::default()).unwrap();
    let b = Engine::new(EngineConfig::default()).unwrap();
    a.params().set_room_size(0.9);
    assert_eq!(b.params().get(ParamId::RoomSize), 0.5);

    let handle = std::thread::spawn(move || {
        let mut out = vec![0.0f32; 128];
        a.process(None, &mut AudioBufferMut::mono(&mut out)).unwrap();
        a.params().get(ParamId::RoomSize)
    });
    assert_eq!(handle.join().unwrap(), 0.9);
}
