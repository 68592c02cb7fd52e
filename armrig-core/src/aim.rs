//! Two-joint aim adjustment.
//!
//! A bounded, greedy swing of two joints that moves an end effector toward a
//! target point. Each iteration turns the joint nearest the effector first,
//! then the one above it, each about its own pivot. There is no convergence
//! guarantee: targets out of reach simply use up the iteration budget.

use log::{debug, trace};
use nalgebra::{Matrix3, Point3};

use crate::scene::{NodeId, SceneGraph};
use crate::settings::Settings;
use crate::transform::Transform;

/// The joints driven by [`adjust_toward`] and the node they steer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoJointChain {
    /// Upper joint, swung second in each iteration
    pub first: NodeId,
    /// Lower joint, swung first in each iteration
    pub second: NodeId,
    pub effector: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimReport {
    /// Iterations that applied (or attempted) joint swings
    pub iterations: usize,
    /// Joint rotations actually applied
    pub rotations: usize,
    pub converged: bool,
    /// Effector-to-target distance when the routine returned
    pub distance: f32,
}

/// Swing the chain toward `target`.
///
/// World transforms in `graph` must be current on entry; they are current
/// again on return.
pub fn adjust_toward(
    graph: &mut SceneGraph,
    chain: &TwoJointChain,
    target: &Point3<f32>,
    settings: &Settings,
) -> AimReport {
    let mut report = AimReport {
        iterations: 0,
        rotations: 0,
        converged: false,
        distance: effector_distance(graph, chain, target),
    };

    for _ in 0..settings.aim_iterations {
        if report.distance < settings.aim_tolerance {
            break;
        }
        report.iterations += 1;

        for joint in [chain.second, chain.first] {
            if swing(graph, joint, chain.effector, target, settings.aim_min_axis) {
                report.rotations += 1;
            }
        }
        report.distance = effector_distance(graph, chain, target);
    }

    report.converged = report.distance < settings.aim_tolerance;
    debug!(
        "Aim adjustment: {} iterations, {} rotations, distance {:.4}{}",
        report.iterations,
        report.rotations,
        report.distance,
        if report.converged { "" } else { " (not converged)" }
    );
    report
}

fn effector_distance(graph: &SceneGraph, chain: &TwoJointChain, target: &Point3<f32>) -> f32 {
    (target - graph.node(chain.effector).world_position()).norm()
}

/// Rotate `joint` about its pivot so the effector points at `target`.
///
/// Returns `false` without touching the graph when the pivot, effector and
/// target are colinear (the rotation axis would have no length).
fn swing(
    graph: &mut SceneGraph,
    joint: NodeId,
    effector: NodeId,
    target: &Point3<f32>,
    min_axis: f32,
) -> bool {
    let tip = graph.node(effector).world_position();
    let node = graph.node(joint);
    let pivot = node.world_position();

    let to_tip = tip - pivot;
    let to_target = target - pivot;
    let axis = to_tip.cross(&to_target);
    if axis.norm() <= min_axis {
        trace!("Skipping {}: colinear with target", node.name);
        return false;
    }

    let cosine = to_tip.normalize().dot(&to_target.normalize()).clamp(-1.0, 1.0);
    let angle = cosine.acos();

    // Express the world axis in the joint's own frame so the turn keeps its origin
    let linear: Matrix3<f32> = node.world().fixed_view::<3, 3>(0, 0).into_owned();
    let Some(inverse) = linear.try_inverse() else {
        trace!("Skipping {}: singular world transform", node.name);
        return false;
    };
    let local_axis = inverse * axis;

    let node = graph.node_mut(joint);
    node.local = Transform::rotate(&node.local, angle, &local_axis);
    graph.update_transforms();
    true
}
