//! Game session
//!
//! Owns everything one running toy needs: the physics world, the blocks,
//! the viewport, the drop gate and the deferred-task queue. Host callbacks
//! (tap, resize, animation frame) each take `&mut GameSession` so every
//! callback's mutations are atomic with respect to the others.

use glam::Vec2;

use super::block::{Block, BlockId};
use super::factory::BlockFactory;
use super::gate::DropGate;
use super::input::TapEvent;
use super::link::link_nearby_blocks;
use super::timer::{Deferred, Scheduler, TimerId};
use super::viewport::{Boundaries, ViewportState};
use crate::consts::*;
use crate::physics::{PhysicsError, PhysicsWorld, RapierWorld};
use crate::settings::{Settings, Variant};

/// What happened during one [`GameSession::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Physics steps taken
    pub steps: u32,
    /// Link springs created by deferred link checks
    pub links_created: usize,
    /// An orientation change has settled; the host should re-measure and
    /// call [`GameSession::handle_resize`]
    pub resize_due: bool,
}

pub struct GameSession<W: PhysicsWorld = RapierWorld> {
    settings: Settings,
    world: W,
    factory: BlockFactory,
    blocks: Vec<Block>,
    /// Blocks ever created (never decreases)
    block_count: u64,
    viewport: ViewportState,
    boundaries: Boundaries,
    gate: DropGate,
    scheduler: Scheduler,
    accumulator: f32,
    resize_pending: bool,
    tower_built: bool,
}

impl GameSession<RapierWorld> {
    /// Create a session backed by Rapier for a window of the given size
    pub fn new(settings: Settings, seed: u64, window_width: f32, window_height: f32) -> Self {
        let world = RapierWorld::new(Vec2::new(0.0, settings.gravity));
        Self::with_world(world, settings, seed, window_width, window_height)
    }
}

impl<W: PhysicsWorld> GameSession<W> {
    /// Create a session on an existing (empty) world
    pub fn with_world(
        mut world: W,
        settings: Settings,
        seed: u64,
        window_width: f32,
        window_height: f32,
    ) -> Self {
        let viewport = ViewportState::from_window(window_width, window_height, settings.variant);
        let boundaries = Boundaries::create(&mut world, &viewport);

        log::info!(
            "Session created: {} blocks, {}x{} canvas, seed {}",
            settings.variant.as_str(),
            viewport.width,
            viewport.height,
            seed
        );

        Self {
            factory: BlockFactory::new(settings.variant, seed),
            settings,
            world,
            blocks: Vec::new(),
            block_count: 0,
            viewport,
            boundaries,
            gate: DropGate::new(),
            scheduler: Scheduler::new(),
            accumulator: 0.0,
            resize_pending: false,
            tower_built: false,
        }
    }

    /// Build the initial tower on the ground
    ///
    /// Only the first call builds anything.
    pub fn init(&mut self) -> Result<(), PhysicsError> {
        if self.tower_built {
            log::warn!("Tower already built, ignoring init");
            return Ok(());
        }
        self.tower_built = true;

        for center in self.tower_positions() {
            self.spawn(center, true, 0.0)?;
        }
        log::info!("Initial tower built with {} blocks", self.block_count);
        Ok(())
    }

    /// Centres of the initial tower blocks, bottom row first
    fn tower_positions(&self) -> Vec<Vec2> {
        let count = self.settings.tower_blocks();
        let size = self.viewport.block_size;
        let center_x = self.viewport.width / 2.0;
        let ground_top = self.viewport.ground_top();

        let columns = match self.settings.variant {
            Variant::Simple => SIMPLE_TOWER_COLUMNS,
            Variant::Jelly => 1,
        };
        let first_column = -(columns as f32 - 1.0) / 2.0;

        (0..count)
            .map(|i| {
                let row = (i / columns) as f32;
                let column = (i % columns) as f32 + first_column;
                Vec2::new(
                    center_x + column * size.x,
                    ground_top - size.y / 2.0 - row * size.y,
                )
            })
            .collect()
    }

    /// Drop a new block centred at `pos`
    ///
    /// Jelly blocks get a link check scheduled after they settle.
    pub fn create_block(&mut self, pos: Vec2, now_ms: f64) -> Result<BlockId, PhysicsError> {
        self.spawn(pos, false, now_ms)
    }

    fn spawn(&mut self, pos: Vec2, initial: bool, now_ms: f64) -> Result<BlockId, PhysicsError> {
        let block = self
            .factory
            .build(&mut self.world, pos, self.viewport.block_size, initial)?;
        let id = BlockId(self.blocks.len());
        self.blocks.push(block);
        self.block_count += 1;

        if !initial && self.settings.variant == Variant::Jelly {
            self.scheduler
                .schedule(now_ms, self.link_delay_ms(), Deferred::LinkBlock(id));
        }
        log::debug!("Block {} created at ({:.0}, {:.0})", id, pos.x, pos.y);
        Ok(id)
    }

    /// Delay from a drop to its link check: the free fall from the drop
    /// height to the ground (with headroom) plus a settle allowance
    pub fn link_delay_ms(&self) -> f64 {
        let fall = f64::from((self.viewport.ground_top() - DROP_HEIGHT).max(0.0));
        let gravity = f64::from(self.settings.gravity);
        if gravity <= 0.0 {
            return LINK_DELAY_MS;
        }
        let fall_ms = (2.0 * fall / gravity).sqrt() * 1000.0;
        LINK_DELAY_MS + fall_ms * FALL_TIME_MARGIN
    }

    /// Handle a tap/click; returns the new block if the gate was open
    pub fn handle_tap(&mut self, tap: &TapEvent, now_ms: f64) -> Result<Option<BlockId>, PhysicsError> {
        // Timers that came due before this tap run first
        self.run_due_tasks(now_ms)?;

        let Some(x) = tap.drop_x() else {
            return Ok(None);
        };
        if !self.gate.is_open() {
            log::debug!("Tap ignored during cooldown");
            return Ok(None);
        }

        let id = self.create_block(Vec2::new(x, DROP_HEIGHT), now_ms)?;
        let timer = self.scheduler.schedule(
            now_ms,
            self.settings.variant.cooldown_ms(),
            Deferred::ReopenGate,
        );
        self.gate.close(timer);
        Ok(Some(id))
    }

    /// Re-measure from a new window size and move the boundaries
    pub fn handle_resize(&mut self, window_width: f32, window_height: f32) -> Result<(), PhysicsError> {
        self.viewport.resize(window_width, window_height);
        self.boundaries.reposition(&mut self.world, &self.viewport)?;
        log::info!(
            "Viewport resized to {}x{}",
            self.viewport.width,
            self.viewport.height
        );
        Ok(())
    }

    /// Ask for a resize once an orientation change has settled
    pub fn request_settled_resize(&mut self, now_ms: f64) -> TimerId {
        self.scheduler
            .schedule(now_ms, ORIENTATION_SETTLE_MS, Deferred::SettleResize)
    }

    /// Run every deferred task due at `now_ms`; returns links created
    ///
    /// A failing link check does not stop the rest of the batch; the first
    /// error is returned once every task has run.
    pub fn run_due_tasks(&mut self, now_ms: f64) -> Result<usize, PhysicsError> {
        let mut links = 0;
        let mut first_error = None;
        for task in self.scheduler.take_due(now_ms) {
            match task {
                Deferred::LinkBlock(id) => {
                    match link_nearby_blocks(&mut self.world, &mut self.blocks, id) {
                        Ok(n) => links += n,
                        Err(e) => {
                            log::error!("Link check for block {} failed: {}", id, e);
                            first_error.get_or_insert(e);
                        }
                    }
                }
                Deferred::ReopenGate => self.gate.open(),
                Deferred::SettleResize => self.resize_pending = true,
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(links),
        }
    }

    /// Per-frame update: fire due tasks, then step physics on a fixed
    /// timestep
    pub fn update(&mut self, now_ms: f64, dt: f32) -> Result<FrameReport, PhysicsError> {
        let links_created = self.run_due_tasks(now_ms)?;

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.world.step(SIM_DT);
            self.accumulator -= SIM_DT;
            steps += 1;
        }

        Ok(FrameReport {
            steps,
            links_created,
            resize_due: std::mem::take(&mut self.resize_pending),
        })
    }

    /// Cancel every pending timer and leave the gate open
    pub fn shutdown(&mut self) {
        if let Some(timer) = self.gate.pending_timer() {
            self.scheduler.cancel(timer);
        }
        self.gate.open();
        self.scheduler.cancel_all();
        log::info!("Session shut down with {} blocks", self.block_count);
    }

    pub fn block_count(&self) -> u64 {
        self.block_count
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    pub fn gate(&self) -> &DropGate {
        &self.gate
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn variant(&self) -> Variant {
        self.settings.variant
    }
}
