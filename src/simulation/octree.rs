//! # Barnes–Hut Linear Octree (3D)
//!
//! Approximates gravitational acceleration in an `N`-body system by treating
//! distant groups of bodies as a single pseudo-body at their center of mass,
//! replacing the naive `O(N²)` all-pairs sum with `O(N log N)` tree walks.
//!
//! ## Layout
//!
//! The tree is a single flat `Vec<OctreeNode>` addressed by index:
//! - a node's 8 children occupy one contiguous block, referenced by the index
//!   of the first child (`children_start`); `None` marks a leaf,
//! - the array only grows during a build, so indices stay valid while the
//!   underlying storage may reallocate — references do not, which is why all
//!   insertion and traversal code works on indices only,
//! - aggregates (`total_mass`, `com`) are folded in as an online weighted
//!   mean at every node along the insertion path, never recomputed by a
//!   separate bottom-up pass.
//!
//! The tree is rebuilt from scratch every step via [`Octree::build`]; the
//! node vector is cleared but keeps its capacity across frames. Once built,
//! the tree is read-only input to [`Octree::calculate_force`].

use crate::simulation::states::NVec3;

/// Maximum subdivision depth. Two bodies at numerically identical positions
/// would otherwise subdivide forever; a leaf at this depth stops splitting
/// and merges further bodies into its aggregate instead.
pub const MAX_DEPTH: usize = 32;

/// Traversal stack capacity. Opening a node pops one slot and pushes 8, so
/// the stack never exceeds `8 + 7 * (MAX_DEPTH - 1)` entries.
const STACK_CAPACITY: usize = 256;

/// Padding added to the root cube's half-extent so every body lies strictly
/// inside and octant comparisons never tie on the boundary.
const ROOT_PADDING: f64 = 0.1;

/// A query closer than this to a node's center of mass is treated as the
/// node's own contribution and skipped (self-interaction).
const SELF_INTERACTION_EPS: f64 = 1e-3;

/// Below this residual mass the reconstructed resident of an occupied leaf
/// is numerically meaningless; fall back to the aggregate position.
const RESIDENT_MASS_EPS: f64 = 1e-4;

/// A single node of the linear octree.
///
/// Covers a cubic region of space and aggregates every particle inserted
/// into its subtree. A leaf with `particle_count == 1` stores no particle
/// position of its own: its `com` *is* that particle's exact position.
#[derive(Debug, Clone)]
pub struct OctreeNode {
    pub com: NVec3, // mass-weighted average position of the subtree
    pub total_mass: f64,
    pub min_bound: NVec3,
    pub max_bound: NVec3,
    pub children_start: Option<usize>, // first of 8 contiguous children, None = leaf
    pub particle_count: usize, // particles in this subtree, descendants included
}

impl OctreeNode {
    fn empty_leaf(min_bound: NVec3, max_bound: NVec3) -> Self {
        Self {
            com: NVec3::zeros(),
            total_mass: 0.0,
            min_bound,
            max_bound,
            children_start: None,
            particle_count: 0,
        }
    }

    /// Geometric center of the node's cube.
    pub fn center(&self) -> NVec3 {
        (self.min_bound + self.max_bound) * 0.5
    }

    /// Edge length of the node's cube.
    pub fn edge(&self) -> f64 {
        self.max_bound.x - self.min_bound.x
    }

    pub fn is_leaf(&self) -> bool {
        self.children_start.is_none()
    }
}

/// A complete Barnes–Hut octree over one step's positions and masses.
#[derive(Debug, Default)]
pub struct Octree {
    nodes: Vec<OctreeNode>,
}

impl Octree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Read-only view of the node array (diagnostics, visualization, tests).
    pub fn nodes(&self) -> &[OctreeNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Rebuild the tree from scratch for the given positions and masses.
    ///
    /// Clears the node array (capacity is retained), computes a padded cubic
    /// root covering all positions, then inserts particles one at a time.
    /// Insertion is inherently sequential: every insert mutates the growing
    /// node array and the aggregates of the shared ancestor chain.
    ///
    /// An empty input produces an empty tree (no root). `positions` and
    /// `masses` must have equal length, and masses must be positive — the
    /// caller validates this before the simulation starts.
    pub fn build(&mut self, positions: &[NVec3], masses: &[f64]) {
        debug_assert_eq!(positions.len(), masses.len());

        self.nodes.clear();
        if positions.is_empty() {
            return;
        }
        self.nodes.reserve(2 * positions.len() + 1);

        // Axis-aligned bounding box of all positions
        let mut min = NVec3::from_element(f64::INFINITY);
        let mut max = NVec3::from_element(f64::NEG_INFINITY);
        for p in positions {
            min = min.inf(p);
            max = max.sup(p);
        }

        // Expand to a padded cube on the max dimension so node edge length
        // is well-defined for the opening criterion
        let center = (min + max) * 0.5;
        let size = max - min;
        let max_dim = size.x.max(size.y).max(size.z);
        let half = NVec3::from_element(max_dim * 0.5 + ROOT_PADDING);

        self.nodes
            .push(OctreeNode::empty_leaf(center - half, center + half));

        for (p, m) in positions.iter().zip(masses.iter()) {
            self.insert(0, *p, *m, 0);
        }
    }

    /// Approximate gravitational force per unit mass at `pos`.
    ///
    /// Iterative traversal over an explicit stack of node indices; the tree
    /// is frozen, so this is a pure function and safe to call concurrently
    /// from many threads.
    ///
    /// For each visited node, either the whole node is accumulated as one
    /// pseudo-body (if its angular size `edge/dist` is below `theta`, or it
    /// is a leaf), or its 8 children are pushed for further expansion. The
    /// contribution uses the softened inverse-square law
    /// `g * M / (dist² + softening²)^(3/2) * dir`.
    ///
    /// `theta → 0` opens every internal node and converges to the exact
    /// pairwise sum over leaves; larger values trade accuracy for speed.
    ///
    /// # Parameters
    /// - `pos`       : query position.
    /// - `g`         : gravitational constant.
    /// - `softening` : softening length added in quadrature to the distance.
    /// - `theta`     : opening threshold on `edge / dist`.
    ///
    /// # Returns
    /// Accumulated force per unit mass (an acceleration) at `pos`; zero for
    /// an empty tree.
    pub fn calculate_force(&self, pos: NVec3, g: f64, softening: f64, theta: f64) -> NVec3 {
        let mut force = NVec3::zeros();
        if self.nodes.is_empty() {
            return force;
        }

        let soft2 = softening * softening;

        let mut stack = [0usize; STACK_CAPACITY];
        let mut sp = 0;
        stack[sp] = 0; // push root
        sp += 1;

        while sp > 0 {
            sp -= 1;
            let node = &self.nodes[stack[sp]];

            // Subdivision allocates all 8 octants at once; unused ones stay empty
            if node.particle_count == 0 {
                continue;
            }

            let dir = node.com - pos;
            let dist2 = dir.norm_squared();
            let dist = dist2.sqrt();

            // The query's own aggregate reduces to the query itself
            if dist < SELF_INTERACTION_EPS {
                continue;
            }

            match node.children_start {
                // Opening criterion: far enough (edge/dist < theta) or leaf
                // -> treat the subtree as one pseudo-body at its COM
                Some(first_child) if node.edge() / dist >= theta => {
                    for i in 0..8 {
                        stack[sp] = first_child + i;
                        sp += 1;
                    }
                }
                _ => {
                    let inv_r = (dist2 + soft2).sqrt().recip();
                    let inv_r3 = inv_r * inv_r * inv_r;
                    force += g * node.total_mass * inv_r3 * dir;
                }
            }
        }

        force
    }

    // helpers ==============================================================================

    /// Insert one particle at `node_idx`, descending and subdividing as
    /// needed. Works on indices only: `self.nodes` may reallocate inside the
    /// recursion, so no node reference is held across a nested call.
    fn insert(&mut self, node_idx: usize, pos: NVec3, mass: f64, depth: usize) {
        // Fold the particle into this node's running aggregate. This happens
        // at every node on the descent path: internal-node aggregates feed
        // the opening test directly.
        let (children_start, particle_count, center) = {
            let node = &mut self.nodes[node_idx];
            let new_total = node.total_mass + mass;
            if new_total > 0.0 {
                node.com = (node.com * node.total_mass + pos * mass) / new_total;
            } else {
                node.com = pos;
            }
            node.total_mass = new_total;
            node.particle_count += 1;
            (node.children_start, node.particle_count, node.center())
        };

        // Internal node: descend into the octant containing the particle
        if let Some(first_child) = children_start {
            let octant = octant_for_point(&pos, &center);
            self.insert(first_child + octant, pos, mass, depth + 1);
            return;
        }

        // Leaf, first particle: the aggregate COM is the particle's exact
        // position, nothing more to store
        if particle_count == 1 {
            return;
        }

        // Leaf at the depth cap: merge into the aggregate instead of
        // subdividing (coincident or near-coincident particles)
        if depth >= MAX_DEPTH {
            return;
        }

        // Occupied leaf: the resident particle was never stored separately,
        // so invert the online-mean update to reconstruct it from the
        // post-insertion aggregate:
        //   old_mass = total - m_new
        //   old_pos  = (com * total - pos_new * m_new) / old_mass
        let (com, total_mass) = {
            let node = &self.nodes[node_idx];
            (node.com, node.total_mass)
        };
        let old_mass = total_mass - mass;
        let old_pos = if old_mass > RESIDENT_MASS_EPS {
            (com * total_mass - pos * mass) / old_mass
        } else {
            com
        };

        // Subdivide, then re-insert both particles. Both may land in the
        // same octant, in which case that child subdivides again.
        let first_child = self.subdivide(node_idx);
        self.insert(
            first_child + octant_for_point(&old_pos, &center),
            old_pos,
            old_mass,
            depth + 1,
        );
        self.insert(
            first_child + octant_for_point(&pos, &center),
            pos,
            mass,
            depth + 1,
        );
    }

    /// Allocate all 8 children of `node_idx` as one contiguous block of
    /// empty leaves and mark the node internal. Returns the first child's
    /// index.
    fn subdivide(&mut self, node_idx: usize) -> usize {
        let (min_bound, max_bound) = {
            let node = &self.nodes[node_idx];
            (node.min_bound, node.max_bound)
        };
        let center = (min_bound + max_bound) * 0.5;
        let half = (max_bound - min_bound) * 0.5;

        let first_child = self.nodes.len();
        for octant in 0..8 {
            let mut child_min = min_bound;
            if octant & 1 != 0 {
                child_min.x = center.x;
            }
            if octant & 2 != 0 {
                child_min.y = center.y;
            }
            if octant & 4 != 0 {
                child_min.z = center.z;
            }
            self.nodes
                .push(OctreeNode::empty_leaf(child_min, child_min + half));
        }
        // Parent updated after the pushes: the push may have reallocated
        self.nodes[node_idx].children_start = Some(first_child);

        first_child
    }
}

/// Octant index of a point relative to a node center.
///
/// One bit per axis: bit 0 set for `x > center.x`, bit 1 for `y`, bit 2 for
/// `z`. Matches the child block layout produced by subdivision.
fn octant_for_point(p: &NVec3, center: &NVec3) -> usize {
    let mut octant = 0;
    if p.x > center.x {
        octant |= 1;
    }
    if p.y > center.y {
        octant |= 2;
    }
    if p.z > center.z {
        octant |= 4;
    }
    octant
}
