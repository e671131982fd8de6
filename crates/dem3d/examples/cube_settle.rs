//! 200 particles settle toward an attractor below the cube floor.
//!
//! Headless driver: runs ten seconds of simulated time and prints health
//! numbers once per simulated second.

use dem3d::{diagnostics, spawn, SharedPositions, SimParams, Simulation, Vec3};

fn main() {
    env_logger::init();

    let params = SimParams::default();
    let positions = SharedPositions::new(spawn::random_fill(&params, 200));
    let mut sim =
        Simulation::new(params, positions.clone()).expect("failed to build simulation context");

    // Below the floor: gravity points straight down every tick.
    let attractor = Vec3::new(1.0, -3.0, 1.0);
    let dt = 1.0 / 60.0;

    for frame in 0..600u32 {
        sim.step(attractor, dt).expect("tick failed");

        if frame % 60 == 0 {
            let snapshot = positions.snapshot().expect("snapshot failed");
            let stats = diagnostics::grid_stats(sim.grid());
            println!(
                "frame {:4}: max speed {:.4}, occupied cells {:4}, max occupancy {}, overflowed {}",
                frame,
                diagnostics::max_speed(sim.velocities()),
                stats.occupied_cells,
                stats.max_occupancy,
                stats.overflowed_cells,
            );

            if !diagnostics::all_finite(&snapshot, sim.velocities()) {
                println!("!!! non-finite state at frame {}", frame);
                return;
            }
        }
    }

    let floor = params.interior_min();
    let resting = positions
        .snapshot()
        .expect("snapshot failed")
        .iter()
        .filter(|p| p.y < floor + 4.0 * params.particle_radius)
        .count();
    println!("done: {} of {} particles near the floor", resting, sim.particle_count());
}
