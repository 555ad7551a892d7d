//! Jelly Tower - tap to drop blocks onto a wobbly tower
//!
//! Core modules:
//! - `physics`: Rigid-body engine seam (Rapier2D adapter)
//! - `sim`: Game session (block factory, linking, viewport, drop gate, timers)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Persisted preferences
//! - `ui`: DOM text mirrors (block counter)

pub mod physics;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::{Settings, Variant};
pub use sim::GameSession;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Downward gravity in pixels/s²
    pub const GRAVITY: f32 = 980.0;
    /// Pixels per engine "meter", used for contact tolerances
    pub const LENGTH_UNIT: f32 = 100.0;
    /// Dimensionless spring stiffness (0-1) to N/px
    pub const SPRING_STIFFNESS_SCALE: f32 = 2000.0;
    /// Dimensionless spring damping (0-1) to N·s/px
    pub const SPRING_DAMPING_SCALE: f32 = 20.0;
    /// Rate air friction is specified against: a fraction of velocity lost
    /// per step at this many steps per second
    pub const AIR_FRICTION_RATE: f32 = 60.0;

    /// Vertical space reserved above the canvas for the header bar
    pub const HEADER_HEIGHT: f32 = 60.0;
    /// Thickness of ground and walls
    pub const BOUNDARY_THICKNESS: f32 = 20.0;
    /// y coordinate new blocks are dropped from
    pub const DROP_HEIGHT: f32 = 50.0;

    /// Simple blocks: columns the block size is fitted to
    pub const BLOCK_COLUMNS: f32 = 10.0;
    /// Simple blocks: share of the width the columns span
    pub const BLOCK_WIDTH_FRACTION: f32 = 0.8;
    pub const MIN_BLOCK_SIZE: f32 = 40.0;
    pub const MAX_BLOCK_SIZE: f32 = 80.0;
    /// Simple initial tower: blocks and columns
    pub const SIMPLE_TOWER_BLOCKS: usize = 20;
    pub const SIMPLE_TOWER_COLUMNS: usize = 4;

    /// Jelly blocks: total width/height and segment count
    pub const JELLY_WIDTH: f32 = 100.0;
    pub const JELLY_HEIGHT: f32 = 30.0;
    pub const JELLY_SEGMENTS: usize = 5;
    /// Jelly initial tower height
    pub const JELLY_TOWER_BLOCKS: usize = 6;

    /// Horizontal springs between neighbouring segments
    pub const SEGMENT_STIFFNESS: f32 = 0.5;
    pub const SEGMENT_DAMPING: f32 = 0.1;
    /// Per-segment vertical stabilizer to a fixed point above
    pub const STABILIZER_STIFFNESS: f32 = 0.0001;
    pub const STABILIZER_DAMPING: f32 = 0.01;
    /// Springs created between touching blocks
    pub const LINK_STIFFNESS: f32 = 0.4;
    pub const LINK_DAMPING: f32 = 0.1;
    /// Link when segment centres are closer than this many block heights
    pub const LINK_DISTANCE_FACTOR: f32 = 1.5;

    /// Drop cooldowns (ms)
    pub const SIMPLE_COOLDOWN_MS: f64 = 300.0;
    pub const JELLY_COOLDOWN_MS: f64 = 500.0;
    /// Settle time after a dropped jelly block has landed, before it looks
    /// for neighbours (ms). The fall time is added per viewport.
    pub const LINK_DELAY_MS: f64 = 500.0;
    /// Headroom on the free-fall time from the drop height to the ground
    pub const FALL_TIME_MARGIN: f64 = 1.5;
    /// Delay after an orientation change before re-measuring (ms)
    pub const ORIENTATION_SETTLE_MS: f64 = 100.0;
}

/// Colors for game elements
pub mod colors {
    /// Block fill palette; each block picks one entry uniformly
    pub const PALETTE: [[f32; 4]; 8] = [
        [1.0, 0.42, 0.42, 1.0],  // coral
        [0.31, 0.80, 0.77, 1.0], // teal
        [0.27, 0.72, 0.82, 1.0], // sky
        [0.59, 0.81, 0.71, 1.0], // sage
        [1.0, 0.93, 0.68, 1.0],  // cream
        [0.83, 0.65, 0.65, 1.0], // dusty rose
        [0.61, 0.35, 0.71, 1.0], // violet
        [0.20, 0.60, 0.86, 1.0], // blue
    ];
    pub const BOUNDARY: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const CONSTRAINT: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}
