mod quadtree;

use eframe::egui::Vec2;

use super::{PhysicsConfig, RenderGraph};
use quadtree::{QuadNode, Repulsion};

const REPULSION: f32 = 5_200.0;
const SPRING: f32 = 0.035;
const CENTER_PULL: f32 = 0.0016;
const SOFTENING: f32 = 60.0;
const BARNES_HUT_THETA: f32 = 0.72;

/// Advances the layout one tick. Returns whether anything is still moving.
pub(super) fn step_physics(cache: &mut RenderGraph, config: PhysicsConfig) -> bool {
    let node_count = cache.nodes.len();
    if node_count < 2 {
        return false;
    }

    let strength = config.strength.clamp(0.0, 4.0);
    if strength <= 0.0 {
        return false;
    }

    let scratch = &mut cache.physics_scratch;
    scratch.positions.clear();
    scratch
        .positions
        .extend(cache.nodes.iter().map(|node| node.world_pos));
    scratch.forces.clear();
    scratch.forces.resize(node_count, Vec2::ZERO);

    let positions = &scratch.positions;
    let forces = &mut scratch.forces;

    if let Some(tree) = QuadNode::build(positions) {
        let params = Repulsion {
            strength: REPULSION * strength,
            softening: SOFTENING,
            theta: BARNES_HUT_THETA,
        };
        for (index, force) in forces.iter_mut().enumerate() {
            *force += tree.repulsion_on(index, positions, params);
        }
    }

    for edge in &cache.edges {
        let (from, to) = (edge.source, edge.target);
        if from >= node_count || to >= node_count || from == to {
            continue;
        }

        let delta = positions[from] - positions[to];
        let distance = delta.length();
        if distance <= 0.0001 {
            continue;
        }

        let preferred = 48.0 + (cache.nodes[from].style.radius + cache.nodes[to].style.radius) * 2.0;
        let correction = (delta / distance) * ((distance - preferred) * SPRING * strength);
        forces[from] -= correction;
        forces[to] += correction;
    }

    let time_step = (config.delta_seconds * 60.0).clamp(0.25, 3.0);
    let damping = 0.86_f32.powf(time_step);
    let max_speed = 6.0 + strength * 10.0;
    let mut any_motion = false;

    for (node, force) in cache.nodes.iter_mut().zip(forces.iter()) {
        let force = *force - node.world_pos * CENTER_PULL * strength;
        let mut velocity = (node.velocity + force * (0.06 * time_step)) * damping;
        let speed = velocity.length();
        if speed > max_speed {
            velocity *= max_speed / speed;
        }
        if speed < 0.01 {
            velocity = Vec2::ZERO;
        } else {
            any_motion = true;
        }

        node.velocity = velocity;
        node.world_pos += velocity * time_step;
    }

    any_motion
}
