// src/reveal.rs

use std::f32::consts::TAU;

use egui::{epaint::Vertex, Color32, Mesh, Pos2, Rect, TextureId, Vec2};

use crate::constants::{MAX_CIRCLE_SEGMENTS, MIN_CIRCLE_SEGMENTS};

/// How the circle clips the cover frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealClip {
    /// Cover is drawn everywhere except inside the circle.
    Difference,
    /// Cover is drawn only inside the circle.
    Intersect,
}

impl RevealClip {
    /// Entering dark grows a hole through the old frame; entering light shrinks
    /// the old frame down to a disc.
    pub fn for_direction(entering_dark: bool) -> Self {
        if entering_dark {
            RevealClip::Difference
        } else {
            RevealClip::Intersect
        }
    }
}

/// Length of the diagonal of `size`: the largest radius ever needed to cover
/// a window of that size from a point inside it.
pub fn diagonal(size: Vec2) -> f32 {
    (size.x * size.x + size.y * size.y).sqrt()
}

/// Radius of the reveal circle at progress `t`.
pub fn reveal_radius(size: Vec2, t: f32, entering_dark: bool) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let factor = if entering_dark { t } else { 1.0 - t };
    diagonal(size) * factor
}

/// The circle and clip to apply to the cover for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealMask {
    pub center: Pos2,
    pub radius: f32,
    pub clip: RevealClip,
}

impl RevealMask {
    pub fn at(center: Pos2, size: Vec2, t: f32, entering_dark: bool) -> Self {
        Self {
            center,
            radius: reveal_radius(size, t, entering_dark),
            clip: RevealClip::for_direction(entering_dark),
        }
    }

    /// Whether drawing this mask over `rect` leaves no cover pixel visible.
    pub fn hides_cover(&self, rect: Rect) -> bool {
        match self.clip {
            RevealClip::Intersect => self.radius <= 0.0,
            RevealClip::Difference => self.radius >= farthest_corner_distance(rect, self.center),
        }
    }
}

fn farthest_corner_distance(rect: Rect, point: Pos2) -> f32 {
    [
        rect.left_top(),
        rect.right_top(),
        rect.left_bottom(),
        rect.right_bottom(),
    ]
    .iter()
    .map(|corner| corner.distance(point))
    .fold(0.0, f32::max)
}

/// Number of segments used to approximate a circle of `radius` points.
pub fn circle_segments(radius: f32) -> usize {
    ((radius / 4.0).ceil() as usize).clamp(MIN_CIRCLE_SEGMENTS, MAX_CIRCLE_SEGMENTS)
}

fn cover_uv(rect: Rect, pos: Pos2) -> Pos2 {
    let size = rect.size();
    if size.x <= 0.0 || size.y <= 0.0 {
        return Pos2::ZERO;
    }
    Pos2::new((pos.x - rect.min.x) / size.x, (pos.y - rect.min.y) / size.y)
}

fn push_vertex(mesh: &mut Mesh, rect: Rect, pos: Pos2) -> u32 {
    let index = mesh.vertices.len() as u32;
    mesh.vertices.push(Vertex {
        pos,
        uv: cover_uv(rect, pos),
        color: Color32::WHITE,
    });
    index
}

fn circle_point(center: Pos2, radius: f32, step: usize, segments: usize) -> Pos2 {
    let angle = TAU * step as f32 / segments as f32;
    center + radius * Vec2::angled(angle)
}

/// Builds the textured mesh that draws the cover frame over `rect` through `mask`.
///
/// The cover is stretched to `rect`. Geometry may extend past `rect`; the painter
/// is expected to clip to it.
pub fn build_cover_mesh(rect: Rect, mask: &RevealMask, texture: TextureId) -> Mesh {
    let mut mesh = Mesh::with_texture(texture);
    if mask.hides_cover(rect) {
        return mesh;
    }

    match mask.clip {
        RevealClip::Intersect => {
            let segments = circle_segments(mask.radius);
            let center = push_vertex(&mut mesh, rect, mask.center);
            let first = push_vertex(
                &mut mesh,
                rect,
                circle_point(mask.center, mask.radius, 0, segments),
            );
            let mut previous = first;
            for step in 1..segments {
                let next = push_vertex(
                    &mut mesh,
                    rect,
                    circle_point(mask.center, mask.radius, step, segments),
                );
                mesh.add_triangle(center, previous, next);
                previous = next;
            }
            mesh.add_triangle(center, previous, first);
        }
        RevealClip::Difference => {
            if mask.radius <= 0.0 {
                mesh.add_rect_with_uv(
                    rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
                return mesh;
            }

            // Ring from the hole out to a circle enclosing every corner of `rect`.
            let outer_radius = farthest_corner_distance(rect, mask.center) + 1.0;
            let segments = circle_segments(outer_radius);
            let mut ring = Vec::with_capacity(segments);
            for step in 0..segments {
                let inner = push_vertex(
                    &mut mesh,
                    rect,
                    circle_point(mask.center, mask.radius, step, segments),
                );
                let outer = push_vertex(
                    &mut mesh,
                    rect,
                    circle_point(mask.center, outer_radius, step, segments),
                );
                ring.push((inner, outer));
            }
            for step in 0..segments {
                let (inner_a, outer_a) = ring[step];
                let (inner_b, outer_b) = ring[(step + 1) % segments];
                mesh.add_triangle(inner_a, outer_a, outer_b);
                mesh.add_triangle(inner_a, outer_b, inner_b);
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(width: f32, height: f32) -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(width, height))
    }

    #[test]
    fn test_radius_scenario_light_to_dark() {
        let radius = reveal_radius(Vec2::new(400.0, 600.0), 0.5, true);
        assert!((radius - 360.555).abs() < 0.01, "got {radius}");
    }

    #[test]
    fn test_radius_endpoints() {
        let size = Vec2::new(400.0, 600.0);
        let diag = diagonal(size);

        assert_eq!(reveal_radius(size, 0.0, true), 0.0);
        assert_eq!(reveal_radius(size, 1.0, true), diag);
        assert_eq!(reveal_radius(size, 0.0, false), diag);
        assert_eq!(reveal_radius(size, 1.0, false), 0.0);
    }

    #[test]
    fn test_radius_is_bounded_and_monotonic() {
        for (w, h) in [(1.0, 1.0), (400.0, 600.0), (1920.0, 1080.0), (0.0, 300.0)] {
            let size = Vec2::new(w, h);
            let diag = diagonal(size);
            let mut growing = -1.0;
            let mut shrinking = f32::MAX;
            for step in 0..=50 {
                let t = step as f32 / 50.0;
                let dark = reveal_radius(size, t, true);
                let light = reveal_radius(size, t, false);
                assert!((0.0..=diag).contains(&dark));
                assert!((0.0..=diag).contains(&light));
                assert!(dark >= growing);
                assert!(light <= shrinking);
                growing = dark;
                shrinking = light;
            }
        }
    }

    #[test]
    fn test_progress_outside_unit_range_is_clamped() {
        let size = Vec2::new(300.0, 400.0);
        assert_eq!(reveal_radius(size, -1.0, true), 0.0);
        assert_eq!(reveal_radius(size, 2.0, true), 500.0);
    }

    #[test]
    fn test_clip_follows_direction() {
        assert_eq!(RevealClip::for_direction(true), RevealClip::Difference);
        assert_eq!(RevealClip::for_direction(false), RevealClip::Intersect);
    }

    #[test]
    fn test_difference_with_zero_radius_covers_whole_rect() {
        let rect = window(400.0, 600.0);
        let mask = RevealMask::at(Pos2::new(100.0, 100.0), rect.size(), 0.0, true);
        let mesh = build_cover_mesh(rect, &mask, TextureId::default());

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        let uvs: Vec<Pos2> = mesh.vertices.iter().map(|v| v.uv).collect();
        assert!(uvs.contains(&Pos2::ZERO));
        assert!(uvs.contains(&Pos2::new(1.0, 1.0)));
    }

    #[test]
    fn test_finished_masks_draw_nothing() {
        let rect = window(400.0, 600.0);
        let center = Pos2::new(100.0, 100.0);

        let dark_done = RevealMask::at(center, rect.size(), 1.0, true);
        assert!(dark_done.hides_cover(rect));
        assert!(build_cover_mesh(rect, &dark_done, TextureId::default()).is_empty());

        let light_done = RevealMask::at(center, rect.size(), 1.0, false);
        assert!(light_done.hides_cover(rect));
        assert!(build_cover_mesh(rect, &light_done, TextureId::default()).is_empty());
    }

    #[test]
    fn test_light_start_disc_encloses_rect() {
        let rect = window(400.0, 600.0);
        let center = Pos2::new(380.0, 20.0);
        let mask = RevealMask::at(center, rect.size(), 0.0, false);
        let mesh = build_cover_mesh(rect, &mask, TextureId::default());

        let segments = circle_segments(mask.radius);
        assert_eq!(mesh.vertices.len(), segments + 1);
        assert_eq!(mesh.indices.len(), segments * 3);
        for vertex in mesh.vertices.iter().skip(1) {
            assert!((vertex.pos.distance(center) - mask.radius).abs() < 0.01);
        }
    }

    #[test]
    fn test_ring_mesh_shape() {
        let rect = window(400.0, 600.0);
        let mask = RevealMask::at(Pos2::new(200.0, 300.0), rect.size(), 0.25, true);
        let mesh = build_cover_mesh(rect, &mask, TextureId::default());

        assert!(mesh.is_valid());
        assert_eq!(mesh.vertices.len() % 2, 0);
        let segments = mesh.vertices.len() / 2;
        assert_eq!(mesh.indices.len(), segments * 6);

        // Inner vertices sit on the hole; outer ones lie past every corner.
        let corner = farthest_corner_distance(rect, mask.center);
        for pair in mesh.vertices.chunks(2) {
            assert!((pair[0].pos.distance(mask.center) - mask.radius).abs() < 0.01);
            assert!(pair[1].pos.distance(mask.center) > corner);
        }
    }

    #[test]
    fn test_uv_maps_rect_to_unit_square() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(200.0, 100.0));
        assert_eq!(cover_uv(rect, rect.min), Pos2::ZERO);
        assert_eq!(cover_uv(rect, rect.max), Pos2::new(1.0, 1.0));
        assert_eq!(cover_uv(rect, rect.center()), Pos2::new(0.5, 0.5));
    }

    #[test]
    fn test_segments_are_bounded() {
        assert_eq!(circle_segments(0.0), MIN_CIRCLE_SEGMENTS);
        assert_eq!(circle_segments(1.0e6), MAX_CIRCLE_SEGMENTS);
    }
}
