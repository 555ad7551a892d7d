//! Game logic around the physics world
//!
//! Nothing here renders or touches the DOM. Time comes in as host
//! milliseconds and frame deltas, so sessions are deterministic for a seed
//! and a sequence of calls.

pub mod block;
pub mod factory;
pub mod gate;
pub mod input;
pub mod link;
pub mod session;
pub mod timer;
pub mod viewport;

pub use block::{Block, BlockId, JellyBlock, SimpleBlock};
pub use factory::BlockFactory;
pub use gate::{DropGate, GateState};
pub use input::{TapEvent, client_to_canvas};
pub use link::link_nearby_blocks;
pub use session::{FrameReport, GameSession};
pub use timer::{Deferred, Scheduler, TimerId};
pub use viewport::{BoundaryLayout, Boundaries, Rect, ViewportState, simple_block_size};
