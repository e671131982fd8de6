//! An attractor circling the cube drags the particle cloud around.
//!
//! Demonstrates the per-tick gravity redirection: the direction is
//! recomputed from the attractor position on every call, so the cloud's
//! mean position chases the orbit.

use dem3d::{diagnostics, spawn, SharedPositions, SimParams, Simulation, Vec3};

fn mean(positions: &[Vec3]) -> Vec3 {
    positions.iter().copied().sum::<Vec3>() / positions.len() as f32
}

fn main() {
    env_logger::init();

    let params = SimParams::default();
    let positions = SharedPositions::new(spawn::lattice_fill(&params, 200));
    let mut sim =
        Simulation::new(params, positions.clone()).expect("failed to build simulation context");

    let center = params.cube_center();
    let dt = 1.0 / 60.0;

    for frame in 0..1800u32 {
        let angle = frame as f32 * 0.01;
        let attractor = center + Vec3::new(angle.cos(), 0.0, angle.sin()) * 3.0;
        sim.step(attractor, dt).expect("tick failed");

        if frame % 120 == 0 {
            let snapshot = positions.snapshot().expect("snapshot failed");
            let centroid = mean(&snapshot);
            println!(
                "frame {:4}: attractor ({:+.2}, {:+.2}), centroid ({:.3}, {:.3}, {:.3}), max speed {:.4}",
                frame,
                attractor.x,
                attractor.z,
                centroid.x,
                centroid.y,
                centroid.z,
                diagnostics::max_speed(sim.velocities()),
            );
        }
    }
}
