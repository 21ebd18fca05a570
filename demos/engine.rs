//! Drive the engine with a synthetic feed and print what it tracks.

use parcel::{Engine, EngineConfig};
use rand::prelude::*;

fn main() {
    let mut engine = Engine::new(EngineConfig {
        max_samples: 500,
        cluster_centres: 6,
        ..Default::default()
    })
    .unwrap();

    // Three drifting blobs, one sample per tick, like a downsampled
    // audio-feature feed.
    let blobs = [(0.2f32, 0.3f32), (0.7, 0.2), (0.5, 0.8)];
    let mut rng = StdRng::seed_from_u64(7);

    for tick in 0..600u32 {
        let (bx, by) = blobs[tick as usize % blobs.len()];
        let x = (bx + rng.random::<f32>() * 0.12).clamp(0.0, 1.0);
        let y = (by + rng.random::<f32>() * 0.12).clamp(0.0, 1.0);
        engine.push_sample(x, y);
        let outcome = engine.tick();

        if outcome.dividers_changed && tick % 100 == 0 {
            println!("tick {tick}: dividers rebuilt");
        }
    }

    println!("\n=== tracked centroids ===");
    for c in engine.tracked_centroids() {
        println!(
            "  ({:.3}, {:.3})  age {:6.1}",
            c.position.x, c.position.y, c.age
        );
    }

    println!("\n=== unconstrained divider lines ===");
    for line in engine.unconstrained_lines() {
        println!(
            "  ({:.3}, {:.3}) -> ({:.3}, {:.3})",
            line.start.x, line.start.y, line.end.x, line.end.y
        );
    }

    // Carve a few constrained lines from recent same-cluster sample pairs.
    let labels = engine.last_assignments().to_vec();
    let samples = engine.samples().to_vec();
    let mut added = 0;
    for w in samples.windows(2).zip(labels.windows(2)).rev().take(200) {
        let (pair, ids) = w;
        if ids[0] == ids[1]
            && engine
                .add_constrained_line((pair[0].x, pair[0].y), (pair[1].x, pair[1].y))
                .is_some()
        {
            added += 1;
        }
    }
    engine.maintain_configured_capacity();

    println!("\n=== constrained divider lines ({added} added) ===");
    for line in engine.constrained_lines().iter().take(10) {
        println!(
            "  ({:.3}, {:.3}) -> ({:.3}, {:.3})  len {:.3}",
            line.start.x, line.start.y, line.end.x, line.end.y,
            line.length()
        );
    }
}
