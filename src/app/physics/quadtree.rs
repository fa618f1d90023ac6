use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 12;
const MAX_DEPTH: usize = 10;

#[derive(Clone, Copy)]
pub(super) struct Repulsion {
    pub(super) strength: f32,
    pub(super) softening: f32,
    /// Cells whose side over distance is below this are treated as one body.
    pub(super) theta: f32,
}

impl Repulsion {
    fn between(self, point: Vec2, other: Vec2, mass: f32) -> Vec2 {
        let delta = point - other;
        let distance_sq = delta.length_sq();
        let direction = if distance_sq > 0.0001 * 0.0001 {
            delta / distance_sq.sqrt()
        } else {
            vec2(1.0, 0.0)
        };
        direction * (self.strength * mass / (distance_sq + self.softening))
    }
}

#[derive(Clone, Copy)]
struct Square {
    center: Vec2,
    half_extent: f32,
}

impl Square {
    fn around(points: &[Vec2]) -> Option<Self> {
        let (min, max) = points.iter().fold(
            (
                vec2(f32::INFINITY, f32::INFINITY),
                vec2(f32::NEG_INFINITY, f32::NEG_INFINITY),
            ),
            |(min, max), point| (min.min(*point), max.max(*point)),
        );
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: span * 0.5 + 1.0,
        })
    }

    fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half_extent
            && (point.y - self.center.y).abs() <= self.half_extent
    }

    fn quadrant(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let x = if quadrant & 1 == 0 { -quarter } else { quarter };
        let y = if quadrant & 2 == 0 { -quarter } else { quarter };
        Self {
            center: self.center + vec2(x, y),
            half_extent: quarter,
        }
    }
}

/// Barnes-Hut tree over node positions; bodies are indices into the slice it was built from.
pub(super) struct QuadNode {
    square: Square,
    center_of_mass: Vec2,
    mass: f32,
    bodies: Vec<usize>,
    children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let square = Square::around(positions)?;
        Some(Self::build_node(
            square,
            (0..positions.len()).collect(),
            positions,
            0,
        ))
    }

    fn build_node(square: Square, bodies: Vec<usize>, positions: &[Vec2], depth: usize) -> Self {
        let mass = bodies.len() as f32;
        let center_of_mass = if bodies.is_empty() {
            square.center
        } else {
            bodies.iter().fold(Vec2::ZERO, |sum, &body| sum + positions[body]) / mass
        };

        let mut node = Self {
            square,
            center_of_mass,
            mass,
            bodies,
            children: std::array::from_fn(|_| None),
        };
        if depth >= MAX_DEPTH || node.bodies.len() <= LEAF_CAPACITY {
            return node;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &body in &node.bodies {
            buckets[square.quadrant(positions[body])].push(body);
        }
        // Coincident points never separate; keep them in one leaf.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                node.children[quadrant] = Some(Box::new(Self::build_node(
                    square.child(quadrant),
                    bucket,
                    positions,
                    depth + 1,
                )));
            }
        }
        node.bodies.clear();
        node
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Repulsive force on body `index` from every other body in the tree.
    pub(super) fn repulsion_on(&self, index: usize, positions: &[Vec2], params: Repulsion) -> Vec2 {
        if self.mass <= 0.0 {
            return Vec2::ZERO;
        }

        let point = positions[index];
        if self.is_leaf() {
            return self
                .bodies
                .iter()
                .filter(|&&other| other != index)
                .fold(Vec2::ZERO, |force, &other| {
                    force + params.between(point, positions[other], 1.0)
                });
        }

        let distance = (point - self.center_of_mass).length().max(0.0001);
        let far_enough = !self.square.contains(point)
            && (self.square.half_extent * 2.0) / distance < params.theta;
        if far_enough {
            return params.between(point, self.center_of_mass, self.mass);
        }

        self.children
            .iter()
            .flatten()
            .fold(Vec2::ZERO, |force, child| {
                force + child.repulsion_on(index, positions, params)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: Repulsion = Repulsion {
        strength: 5_200.0,
        softening: 60.0,
        theta: 0.72,
    };

    fn exact(index: usize, positions: &[Vec2]) -> Vec2 {
        positions
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .fold(Vec2::ZERO, |force, (_, other)| {
                force + PARAMS.between(positions[index], *other, 1.0)
            })
    }

    fn grid(side: usize, spacing: f32, offset: Vec2) -> Vec<Vec2> {
        (0..side * side)
            .map(|cell| offset + vec2((cell % side) as f32, (cell / side) as f32) * spacing)
            .collect()
    }

    #[test]
    fn small_sets_match_pairwise_sum() {
        let positions = grid(3, 20.0, Vec2::ZERO);
        let tree = QuadNode::build(&positions).unwrap();
        for index in 0..positions.len() {
            let approx = tree.repulsion_on(index, &positions, PARAMS);
            assert!((approx - exact(index, &positions)).length() < 1e-4);
        }
    }

    #[test]
    fn distant_cluster_is_approximated_closely() {
        let mut positions = vec![Vec2::ZERO];
        positions.extend(grid(20, 4.0, vec2(2_000.0, 0.0)));
        let tree = QuadNode::build(&positions).unwrap();

        let approx = tree.repulsion_on(0, &positions, PARAMS);
        let exact = exact(0, &positions);
        assert!(approx.x < 0.0);
        assert!((approx - exact).length() / exact.length() < 0.05);
    }

    #[test]
    fn coincident_points_stay_finite() {
        let positions = vec![vec2(5.0, 5.0); 40];
        let tree = QuadNode::build(&positions).unwrap();
        let force = tree.repulsion_on(3, &positions, PARAMS);
        assert!(force.x.is_finite() && force.y.is_finite());
    }

    #[test]
    fn empty_input_builds_nothing() {
        assert!(QuadNode::build(&[]).is_none());
    }
}
