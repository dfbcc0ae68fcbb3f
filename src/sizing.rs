//! Node size normalization

use crate::graph::Node;

/// Size given to every node when dynamic sizing is off
pub const FIXED_NODE_SIZE: f64 = 10.0;

/// Size of the largest node when dynamic sizing is on
pub const MAX_DYNAMIC_NODE_SIZE: f64 = 20.0;

/// Rescale node sizes in place.
///
/// With `dynamic` off every node gets [`FIXED_NODE_SIZE`]. With it on, sizes
/// are divided by the largest size and scaled to [`MAX_DYNAMIC_NODE_SIZE`],
/// which keeps their relative order. When no node has a positive size there
/// is nothing to scale against and every node gets size 0.
pub fn normalize_sizes(nodes: &mut [Node], dynamic: bool) {
    if !dynamic {
        for node in nodes.iter_mut() {
            node.size = FIXED_NODE_SIZE;
        }
        return;
    }

    let largest = nodes
        .iter()
        .map(|n| n.size)
        .fold(f64::NEG_INFINITY, f64::max);

    if largest <= 0.0 || !largest.is_finite() {
        for node in nodes.iter_mut() {
            node.size = 0.0;
        }
        return;
    }

    for node in nodes.iter_mut() {
        node.size = node.size / largest * MAX_DYNAMIC_NODE_SIZE;
    }
}
