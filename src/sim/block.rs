//! Block entities
//!
//! A block is either one rigid square or a jelly strip of five segments.
//! Both expose the bodies and constraints they own; the authoritative pose
//! of those bodies lives in the physics world.

use core::fmt;

use crate::consts::JELLY_SEGMENTS;
use crate::physics::{BodyHandle, ConstraintHandle};

/// Index of a block in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub usize);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single rigid square
#[derive(Debug, Clone)]
pub struct SimpleBlock {
    pub body: BodyHandle,
    pub fill: [f32; 4],
}

/// Five segments held together by springs
#[derive(Debug, Clone)]
pub struct JellyBlock {
    /// Segments, left to right
    pub segments: [BodyHandle; JELLY_SEGMENTS],
    /// Internal springs first, then any links to neighbouring blocks
    pub constraints: Vec<ConstraintHandle>,
    pub fill: [f32; 4],
    /// Block height; the linking distance is measured against it
    pub height: f32,
    /// Whether this block is joined to the tower
    pub is_linked: bool,
}

/// A block of either variant
#[derive(Debug, Clone)]
pub enum Block {
    Simple(SimpleBlock),
    Jelly(JellyBlock),
}

impl Block {
    /// Bodies owned by this block
    pub fn bodies(&self) -> &[BodyHandle] {
        match self {
            Block::Simple(b) => std::slice::from_ref(&b.body),
            Block::Jelly(b) => &b.segments,
        }
    }

    /// Constraints owned by this block
    pub fn constraints(&self) -> &[ConstraintHandle] {
        match self {
            Block::Simple(_) => &[],
            Block::Jelly(b) => &b.constraints,
        }
    }

    pub fn fill(&self) -> [f32; 4] {
        match self {
            Block::Simple(b) => b.fill,
            Block::Jelly(b) => b.fill,
        }
    }

    /// Simple blocks never take part in linking
    pub fn is_linked(&self) -> bool {
        match self {
            Block::Simple(_) => false,
            Block::Jelly(b) => b.is_linked,
        }
    }

    pub fn as_jelly(&self) -> Option<&JellyBlock> {
        match self {
            Block::Jelly(b) => Some(b),
            Block::Simple(_) => None,
        }
    }

    pub fn as_jelly_mut(&mut self) -> Option<&mut JellyBlock> {
        match self {
            Block::Jelly(b) => Some(b),
            Block::Simple(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_block_owns_one_body() {
        let block = Block::Simple(SimpleBlock {
            body: BodyHandle(3),
            fill: [1.0; 4],
        });
        assert_eq!(block.bodies(), &[BodyHandle(3)]);
        assert!(block.constraints().is_empty());
        assert!(!block.is_linked());
        assert!(block.as_jelly().is_none());
    }

    #[test]
    fn test_jelly_block_accessors() {
        let block = Block::Jelly(JellyBlock {
            segments: std::array::from_fn(BodyHandle),
            constraints: vec![ConstraintHandle(0), ConstraintHandle(1)],
            fill: [0.5; 4],
            height: 30.0,
            is_linked: true,
        });
        assert_eq!(block.bodies().len(), JELLY_SEGMENTS);
        assert_eq!(block.bodies()[4], BodyHandle(4));
        assert_eq!(block.constraints().len(), 2);
        assert!(block.is_linked());
        assert_eq!(block.fill(), [0.5; 4]);
    }
}
