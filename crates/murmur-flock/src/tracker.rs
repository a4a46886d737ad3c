//! Connected-component clustering over agent samples.

use glam::{Mat3, Vec3};

use crate::descriptor::FlockDescriptor;
use murmur_core::geom::{perp_xy, safe_normalize};
use murmur_core::FlockId;

#[derive(Debug, Clone, Copy)]
struct Proxy {
    fed: bool,
    pos: Vec3,
    vel: Vec3,
}

const UNFED: Proxy = Proxy {
    fed: false,
    pos: Vec3::ZERO,
    vel: Vec3::ZERO,
};

/// Tracks flock membership for one population.
///
/// Usage per detection interval: `prepare(n)`, `feed(..)` once per awake
/// agent, `cluster(dd2)`.  On the ticks in between, `track(dt)` advects the
/// existing centroids.  Agents that were not fed belong to no flock and
/// report [`FlockId::INVALID`].
#[derive(Debug, Default)]
pub struct FlockTracker {
    proxies: Vec<Proxy>,
    ids:     Vec<FlockId>,
    descr:   Vec<FlockDescriptor>,
    firsts:  Vec<u32>,
}

impl FlockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop_size(&self) -> usize {
        self.proxies.len()
    }

    /// Reset all samples ahead of a feed/cluster round.
    pub fn prepare(&mut self, n: usize) {
        self.proxies.clear();
        self.proxies.resize(n, UNFED);
    }

    /// Record one agent's sample for the next [`cluster`][Self::cluster].
    #[inline]
    pub fn feed(&mut self, idx: usize, pos: Vec3, vel: Vec3) {
        self.proxies[idx] = Proxy {
            fed: true,
            pos,
            vel,
        };
    }

    pub fn flocks(&self) -> &[FlockDescriptor] {
        &self.descr
    }

    /// Flock of agent `idx`; `INVALID` when it was not fed last round.
    pub fn id_of(&self, idx: usize) -> FlockId {
        self.ids.get(idx).copied().unwrap_or(FlockId::INVALID)
    }

    /// Descriptor of flock `id`, or the empty default for an unknown id.
    pub fn descr(&self, id: FlockId) -> FlockDescriptor {
        self.descr
            .get(id.index())
            .copied()
            .unwrap_or_default()
    }

    /// Lowest-index member of flock `id` (hunting strategies pick it as the
    /// representative target).
    pub fn first_member(&self, id: FlockId) -> Option<usize> {
        self.firsts.get(id.index()).map(|&i| i as usize)
    }

    /// Re-cluster the fed samples: connected components under
    /// `dist2 < dd2`, one descriptor per component.  Components are numbered
    /// in first-member index order, so re-clustering an unchanged population
    /// reproduces ids and descriptors exactly.
    pub fn cluster(&mut self, dd2: f32) {
        let n = self.proxies.len();
        self.ids.clear();
        self.ids.resize(n, FlockId::INVALID);
        self.descr.clear();
        self.firsts.clear();

        let fed: Vec<usize> = (0..n).filter(|&i| self.proxies[i].fed).collect();

        // union-find over the fed samples
        let mut parent: Vec<usize> = (0..fed.len()).collect();
        for a in 0..fed.len() {
            for b in (a + 1)..fed.len() {
                if self.proxies[fed[a]]
                    .pos
                    .distance_squared(self.proxies[fed[b]].pos)
                    < dd2
                {
                    union(&mut parent, a, b);
                }
            }
        }

        // group members per root, keeping first-member order
        let mut members: Vec<Vec<usize>> = Vec::new();
        let mut component_of_root: Vec<Option<usize>> = vec![None; fed.len()];
        for a in 0..fed.len() {
            let root = find(&mut parent, a);
            let ci = *component_of_root[root].get_or_insert_with(|| {
                members.push(Vec::new());
                members.len() - 1
            });
            members[ci].push(fed[a]);
            self.ids[fed[a]] = FlockId(ci as u32);
        }

        for group in &members {
            self.firsts.push(group[0] as u32);
            self.descr.push(self.describe(group));
        }
    }

    /// Advect every centroid by `dt` under its flock's mean velocity.
    pub fn track(&mut self, dt: f32) {
        for fd in &mut self.descr {
            fd.transform.z_axis += dt * fd.vel;
        }
    }

    fn describe(&self, group: &[usize]) -> FlockDescriptor {
        let origin = self.proxies[group[0]].pos;
        let inv_n = 1.0 / group.len() as f32;

        let vel = group
            .iter()
            .fold(Vec3::ZERO, |acc, &i| acc + self.proxies[i].vel)
            * inv_n;

        // singletons have no meaningful alignment
        let pol = if group.len() < 2 {
            0.0
        } else {
            let mean_dir = safe_normalize(vel, Vec3::ZERO);
            group
                .iter()
                .map(|&i| safe_normalize(self.proxies[i].vel, Vec3::ZERO).dot(mean_dir))
                .sum::<f32>()
                * inv_n
        };

        // velocity-aligned bounding box of offsets from the first member
        let forward = safe_normalize(vel, Vec3::X);
        let side = safe_normalize(perp_xy(forward), Vec3::Y);
        let up = Vec3::Z;
        let mut lo = Vec3::INFINITY;
        let mut hi = Vec3::NEG_INFINITY;
        for &i in group {
            let ofs = self.proxies[i].pos - origin;
            let local = Vec3::new(ofs.dot(forward), ofs.dot(side), ofs.dot(up));
            lo = lo.min(local);
            hi = hi.max(local);
        }
        let mid = 0.5 * (lo + hi);
        let centroid = origin + mid.x * forward + mid.y * side + mid.z * up;

        FlockDescriptor {
            size: group.len(),
            vel,
            pol,
            transform: Mat3::from_cols(forward, side, centroid),
            extent: hi - lo,
        }
    }
}

fn find(parent: &mut [usize], mut a: usize) -> usize {
    while parent[a] != a {
        parent[a] = parent[parent[a]]; // path halving
        a = parent[a];
    }
    a
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        // attach the later root under the earlier so component numbering
        // stays tied to first-member order
        parent[ra.max(rb)] = ra.min(rb);
    }
}
