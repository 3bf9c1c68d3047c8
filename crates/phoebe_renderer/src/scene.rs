//! Scene container and nearest-hit queries.

use std::sync::OnceLock;

use crate::bvh::BvhNode;
use crate::{Geometry, Intersect};
use phoebe_math::{BoundBox, Interval, Ray, EPSILON};

/// Acceleration data derived from the object list.
struct Accelerator {
    /// Tree over every primitive with a bounding box
    bvh: BvhNode,
    /// Primitives without bounds (planes), always tested
    unbounded: Vec<usize>,
}

impl Accelerator {
    fn build(objects: &[Box<dyn Geometry>]) -> Self {
        let mut bounded = Vec::new();
        let mut unbounded = Vec::new();
        for (index, object) in objects.iter().enumerate() {
            match object.bounding_box() {
                Some(bbox) => bounded.push((index, bbox)),
                None => unbounded.push(index),
            }
        }

        let bvh = BvhNode::new(bounded);
        log::debug!(
            "Built BVH with {} leaves, {} unbounded primitives",
            bvh.leaf_count(),
            unbounded.len()
        );
        Self { bvh, unbounded }
    }
}

/// An ordered collection of geometry inside a bounding volume.
///
/// Built up with [`Scene::add_object`] and then shared read-only across
/// render workers. The bound box starts at the configured scene extent and
/// grows to enclose every bounded primitive, so rays that miss it cannot hit
/// anything but the unbounded primitives.
pub struct Scene {
    bound: BoundBox,
    objects: Vec<Box<dyn Geometry>>,
    accel: OnceLock<Accelerator>,
}

impl Scene {
    /// Create an empty scene with the given extent.
    pub fn new(bound: BoundBox) -> Self {
        Self {
            bound,
            objects: Vec::new(),
            accel: OnceLock::new(),
        }
    }

    /// Add an object to the scene.
    ///
    /// Must not run concurrently with queries; `&mut self` enforces that.
    pub fn add_object(&mut self, geometry: Box<dyn Geometry>) {
        if let Some(bbox) = geometry.bounding_box() {
            self.bound = BoundBox::surrounding(&self.bound, &bbox);
        }
        self.objects.push(geometry);
        self.accel = OnceLock::new();
    }

    /// Scene extent, including every bounded primitive.
    pub fn bound(&self) -> BoundBox {
        self.bound
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> &[Box<dyn Geometry>] {
        &self.objects
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Find the nearest intersection along the ray.
    ///
    /// Hits whose `t` values lie within `EPSILON` of each other are resolved
    /// in favour of the object added first.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersect<'_>> {
        let accel = self.accel.get_or_init(|| Accelerator::build(&self.objects));
        let mut nearest: Option<(f64, usize)> = None;

        let mut consider = |index: usize| -> f64 {
            if let Some(t) = self.objects[index].intersect(ray) {
                if is_nearer((t, index), nearest) {
                    nearest = Some((t, index));
                }
            }
            // Anything beyond this cannot win, even on a tie
            nearest.map_or(f64::INFINITY, |(t, _)| t + EPSILON)
        };

        let ray_t = Interval::new(EPSILON, f64::INFINITY);
        if self.bound.hit(ray, ray_t) {
            accel.bvh.visit(ray, ray_t, &mut consider);
        }
        for &index in &accel.unbounded {
            consider(index);
        }

        nearest.map(|(t, index)| Intersect::new(*ray, self.objects[index].as_ref(), t))
    }
}

/// True if `candidate` should replace `current` as the nearest hit.
fn is_nearer(candidate: (f64, usize), current: Option<(f64, usize)>) -> bool {
    match current {
        None => true,
        Some((t, index)) => {
            candidate.0 < t - EPSILON || ((candidate.0 - t).abs() <= EPSILON && candidate.1 < index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian, Material, Plane, Sphere, Triangle};
    use phoebe_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)).unwrap())
    }

    fn small_bound() -> BoundBox {
        BoundBox::new(Vec3::splat(-5.0), Vec3::splat(5.0)).unwrap()
    }

    fn sphere(center: Vec3, radius: f64) -> Box<dyn Geometry> {
        Box::new(Sphere::new(center, radius, grey()).unwrap())
    }

    fn plane(point: Vec3, normal: Vec3) -> Box<dyn Geometry> {
        Box::new(Plane::new(point, normal, grey()).unwrap())
    }

    fn same_object(a: &dyn Geometry, b: &dyn Geometry) -> bool {
        std::ptr::eq(
            a as *const dyn Geometry as *const u8,
            b as *const dyn Geometry as *const u8,
        )
    }

    #[test]
    fn test_empty_scene_has_no_hit() {
        let scene = Scene::new(small_bound());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(scene.intersect(&ray).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_scene_nearest_hit() {
        let mut scene = Scene::new(small_bound());
        scene.add_object(sphere(Vec3::new(0.0, 0.0, -10.0), 3.0));
        scene.add_object(sphere(Vec3::new(0.0, 0.0, -4.0), 1.0));
        scene.add_object(plane(Vec3::new(0.0, 0.0, -20.0), Vec3::Z));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let hit = scene.intersect(&ray).unwrap();

        assert!((hit.t() - 3.0).abs() < 1e-9);
        assert!(same_object(hit.geometry(), scene.objects()[1].as_ref()));
        assert_eq!(hit.position(), ray.at(hit.t()));
    }

    #[test]
    fn test_scene_hits_plane_outside_bound() {
        let mut scene = Scene::new(small_bound());
        scene.add_object(plane(Vec3::new(0.0, 0.0, -20.0), Vec3::Z));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = scene.intersect(&ray).unwrap();
        assert!((hit.t() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_scene_bound_grows_with_objects() {
        let mut scene = Scene::new(small_bound());
        scene.add_object(sphere(Vec3::new(0.0, 0.0, -10.0), 3.0));
        assert_eq!(scene.bound().min().z, -13.0);

        // A ray that misses the configured extent still finds the sphere
        let ray = Ray::new(Vec3::new(0.0, 0.0, -30.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = scene.intersect(&ray).unwrap();
        assert!((hit.t() - 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_scene_tie_prefers_insertion_order() {
        let mut scene = Scene::new(small_bound());
        // Two coincident planes: both report t = 20
        scene.add_object(plane(Vec3::new(0.0, 0.0, -20.0), Vec3::Z));
        scene.add_object(plane(Vec3::new(1.0, 1.0, -20.0), Vec3::Z));
        // Two coincident spheres
        scene.add_object(sphere(Vec3::new(3.0, 0.0, -4.0), 1.0));
        scene.add_object(sphere(Vec3::new(3.0, 0.0, -4.0), 1.0));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let hit = scene.intersect(&ray).unwrap();
        assert!(same_object(hit.geometry(), scene.objects()[0].as_ref()));

        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = scene.intersect(&ray).unwrap();
        assert!(same_object(hit.geometry(), scene.objects()[2].as_ref()));
    }

    #[test]
    fn test_scene_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut scene = Scene::new(small_bound());
        for _ in 0..40 {
            let center = Vec3::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-20.0..-4.0),
            );
            scene.add_object(sphere(center, rng.gen_range(0.3..1.5)));
        }
        scene.add_object(Box::new(
            Triangle::new(
                Vec3::new(-6.0, -6.0, -15.0),
                Vec3::new(6.0, -6.0, -15.0),
                Vec3::new(0.0, 6.0, -15.0),
                grey(),
            )
            .unwrap(),
        ));
        scene.add_object(plane(Vec3::new(0.0, 0.0, -25.0), Vec3::Z));

        for _ in 0..300 {
            let direction = Vec3::new(
                rng.gen_range(-0.8..0.8),
                rng.gen_range(-0.8..0.8),
                -1.0,
            )
            .normalize();
            let ray = Ray::new(Vec3::ZERO, direction);

            let expected = scene
                .objects()
                .iter()
                .filter_map(|o| o.intersect(&ray))
                .fold(f64::INFINITY, f64::min);

            match scene.intersect(&ray) {
                Some(hit) => assert!((hit.t() - expected).abs() <= EPSILON),
                None => assert!(expected.is_infinite()),
            }
        }
    }

    #[test]
    fn test_scene_rebuilds_after_add() {
        let mut scene = Scene::new(small_bound());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(scene.intersect(&ray).is_none());

        scene.add_object(sphere(Vec3::new(0.0, 0.0, -3.0), 1.0));
        assert!(scene.intersect(&ray).is_some());
        assert_eq!(scene.len(), 1);
    }
}
