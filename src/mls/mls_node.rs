//! Nodes for streaming maximum-length sequences into a pipeline.
//!
//! Two granularities are provided: `MlsNode` emits the sequence one bit
//! per call for consumers that want a continuous pseudorandom bit
//! stream, and `MlsBlockNode` emits one full 2^n - 1 element period per
//! call for consumers that want ready-made stimulus buffers, such as an
//! audio sink.

use crate::mls::{mls_with_mode, MlsError, MlsGen, OutputMode};
use crate::prelude::*;

/// A node that emits one maximum-length sequence bit per call.
///
/// The wrapped generator keeps cycling after a full period, so the node
/// produces a continuous periodic bit stream.
///
/// # Examples
///
/// ```
/// use hearlab_rs::mls::mls_node;
///
/// let node = mls_node::mls_node(10, true).unwrap();
/// ```
#[derive(Node)]
pub struct MlsNode {
    mlsgen: MlsGen,
    pub sender: NodeSender<u8>,
}

impl MlsNode {
    pub fn run(&mut self) -> Result<u8, NodeError> {
        Ok(self.mlsgen.next_bit())
    }
}

/// Constructs a new `MlsNode`.
///
/// # Arguments
///
/// * `order` - Shift-register order n, an integer in [2, 32].
/// * `seeded` - true for a reproducible bit stream, false for a random
/// starting phase.
pub fn mls_node(order: u32, seeded: bool) -> Result<MlsNode, MlsError> {
    Ok(MlsNode::new(MlsGen::new(order, seeded)?))
}

/// A node that emits one full maximum-length sequence per call.
///
/// Each call generates a fresh sequence: seeded nodes repeat the same
/// buffer, unseeded nodes produce a new random rotation every time,
/// which is the usual arrangement for repeated stimulus presentations.
#[derive(Node)]
pub struct MlsBlockNode {
    order: u32,
    seeded: bool,
    mode: OutputMode,
    pub sender: NodeSender<Vec<i32>>,
}

impl MlsBlockNode {
    pub fn run(&mut self) -> Result<Vec<i32>, NodeError> {
        // The order was validated at construction; a failure here means
        // the node was built around an invalid configuration and can
        // never produce output.
        mls_with_mode(self.order, self.seeded, self.mode)
            .map_err(|_| NodeError::PermanentError)
    }
}

/// Constructs a new `MlsBlockNode`.
///
/// # Arguments
///
/// * `order` - Shift-register order n, an integer in [2, 32].
/// * `seeded` - true to repeat the identical buffer each call, false for
/// a fresh random rotation per call.
/// * `mode` - Output element mapping, raw {0, 1} or bipolar {-1, +1}.
pub fn mls_block_node(
    order: u32,
    seeded: bool,
    mode: OutputMode,
) -> Result<MlsBlockNode, MlsError> {
    super::tap_mask(order)?;
    Ok(MlsBlockNode::new(order, seeded, mode))
}
