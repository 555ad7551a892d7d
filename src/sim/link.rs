//! Proximity linking of jelly blocks
//!
//! After a dropped jelly block has had time to settle, each of its segments
//! is joined by a spring to every segment of an already-linked block whose
//! centre is within `LINK_DISTANCE_FACTOR` block heights.
//!
//! Every call rescans all blocks (O(blocks × segments²)) and does not check
//! for existing links, so linking the same block twice duplicates springs.

use glam::Vec2;

use super::block::{Block, BlockId};
use crate::consts::{LINK_DAMPING, LINK_DISTANCE_FACTOR, LINK_STIFFNESS};
use crate::physics::{Anchor, BodyHandle, PhysicsError, PhysicsWorld, SpringDesc};

/// A segment pair close enough to link
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    own: BodyHandle,
    other: BodyHandle,
    distance: f32,
}

/// Link `id` to nearby linked blocks; returns the number of springs created
///
/// Unknown ids and simple blocks are ignored.
pub fn link_nearby_blocks<W: PhysicsWorld>(
    world: &mut W,
    blocks: &mut [Block],
    id: BlockId,
) -> Result<usize, PhysicsError> {
    let Some(Block::Jelly(block)) = blocks.get(id.0) else {
        return Ok(0);
    };
    let threshold = LINK_DISTANCE_FACTOR * block.height;
    let own_segments = block.segments;

    let mut candidates = Vec::new();
    for own in own_segments {
        let Some(own_pos) = world.body_position(own) else {
            continue;
        };
        for (_, other) in blocks
            .iter()
            .enumerate()
            .filter(|(i, b)| *i != id.0 && b.is_linked())
        {
            for &other_seg in other.bodies() {
                let Some(other_pos) = world.body_position(other_seg) else {
                    continue;
                };
                let distance = own_pos.distance(other_pos);
                if distance < threshold {
                    candidates.push(Candidate {
                        own,
                        other: other_seg,
                        distance,
                    });
                }
            }
        }
    }

    if candidates.is_empty() {
        return Ok(0);
    }

    let mut links = Vec::with_capacity(candidates.len());
    for c in &candidates {
        links.push(world.add_spring(&SpringDesc {
            body: c.own,
            offset: Vec2::ZERO,
            anchor: Anchor::Body {
                body: c.other,
                offset: Vec2::ZERO,
            },
            stiffness: LINK_STIFFNESS,
            damping: LINK_DAMPING,
            rest_length: c.distance,
        })?);
    }

    if let Some(block) = blocks.get_mut(id.0).and_then(Block::as_jelly_mut) {
        block.constraints.extend_from_slice(&links);
        block.is_linked = true;
    }

    log::debug!("Block {} linked with {} springs", id, links.len());
    Ok(links.len())
}
