//! Scanline rasterizer writing into an RGBA pixel buffer guarded by a depth buffer.
//!
//! Depth is stored as `1 / z_view`, so a larger value is nearer and the
//! cleared buffer holds [`FAR_DEPTH`].

use crate::geometry::{Color, ScreenVertex};

/// Depth-buffer value meaning "nothing drawn yet"
pub const FAR_DEPTH: f32 = 0.0;

/// A fragment must be nearer than the stored depth by more than this to be written
pub const DEPTH_EPSILON: f32 = 1e-4;

const BYTES_PER_PIXEL: usize = 4;

/// One sample per integer `i` in `i0..=i1` of the line through `(i0, d0)` and `(i1, d1)`.
///
/// Equal endpoints yield `[d0]` instead of dividing by zero; `i0 > i1` yields
/// nothing.
pub fn interpolate(i0: i32, d0: f32, i1: i32, d1: f32) -> Vec<f32> {
    if i0 == i1 {
        return vec![d0];
    }
    let slope = (d1 - d0) / (i1 - i0) as f32;
    (i0..=i1)
        .map(|i| d0 + slope * (i - i0) as f32)
        .collect()
}

/// Row-major RGBA pixels plus one depth slot per pixel
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            pixels: vec![0; size * BYTES_PER_PIXEL],
            depth: vec![FAR_DEPTH; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.depth.fill(FAR_DEPTH);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let offset = self.index(x, y)? * BYTES_PER_PIXEL;
        let mut rgba = [0; BYTES_PER_PIXEL];
        rgba.copy_from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Depth-tested write; returns whether the pixel was written.
    /// Coordinates outside the buffer are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, inv_depth: f32, color: Color) -> bool {
        let Some(index) = self.index(x, y) else {
            return false;
        };
        if self.depth[index] + DEPTH_EPSILON >= inv_depth {
            return false;
        }
        self.depth[index] = inv_depth;
        let offset = index * BYTES_PER_PIXEL;
        self.pixels[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color.to_rgba());
        true
    }

    /// DDA line stepping one pixel at a time along the major axis
    pub fn draw_line(&mut self, a: ScreenVertex, b: ScreenVertex, color: Color) {
        if (b.x - a.x).abs() > (b.y - a.y).abs() {
            let (a, b) = if a.x > b.x { (b, a) } else { (a, b) };
            let ys = interpolate(a.x, a.y as f32, b.x, b.y as f32);
            let zs = interpolate(a.x, a.inv_depth, b.x, b.inv_depth);
            for (x, (y, z)) in (a.x..=b.x).zip(ys.into_iter().zip(zs)) {
                self.put_pixel(x, y.round() as i32, z, color);
            }
        } else {
            let (a, b) = if a.y > b.y { (b, a) } else { (a, b) };
            let xs = interpolate(a.y, a.x as f32, b.y, b.x as f32);
            let zs = interpolate(a.y, a.inv_depth, b.y, b.inv_depth);
            for (y, (x, z)) in (a.y..=b.y).zip(xs.into_iter().zip(zs)) {
                self.put_pixel(x.round() as i32, y, z, color);
            }
        }
    }

    pub fn draw_wireframe_triangle(
        &mut self,
        a: ScreenVertex,
        b: ScreenVertex,
        c: ScreenVertex,
        color: Color,
    ) {
        self.draw_line(a, b, color);
        self.draw_line(b, c, color);
        self.draw_line(c, a, color);
    }

    /// Fill a triangle row by row between its left and right edges
    pub fn draw_filled_triangle(
        &mut self,
        a: ScreenVertex,
        b: ScreenVertex,
        c: ScreenVertex,
        color: Color,
    ) {
        let mut sorted = [a, b, c];
        sorted.sort_by_key(|v| v.y);
        let [top, mid, bottom] = sorted;

        // top -> mid -> bottom, sharing the sample at `mid`
        let mut short_side = EdgeSeries::between(&top, &mid);
        short_side.drop_last();
        short_side.append(EdgeSeries::between(&mid, &bottom));
        let long_side = EdgeSeries::between(&top, &bottom);

        let middle = short_side.x.len() / 2;
        let (Some(long_x), Some(short_x)) = (long_side.x.get(middle), short_side.x.get(middle))
        else {
            return;
        };
        let (left, right) = if long_x < short_x {
            (&long_side, &short_side)
        } else {
            (&short_side, &long_side)
        };

        for (row, y) in (top.y..=bottom.y).enumerate() {
            if y < 0 || y as usize >= self.height {
                continue;
            }
            let (Some(left_sample), Some(right_sample)) = (left.sample(row), right.sample(row))
            else {
                log::trace!("missing edge sample at row {}, skipping", y);
                continue;
            };
            self.fill_span(y, left_sample, right_sample, color);
        }
    }

    fn fill_span(&mut self, y: i32, left: EdgeSample, right: EdgeSample, color: Color) {
        let (left, right) = if left.x <= right.x {
            (left, right)
        } else {
            (right, left)
        };
        let (x_start, x_end) = (left.x.round() as i32, right.x.round() as i32);
        let zs = interpolate(x_start, left.z, x_end, right.z);
        let last_column = self.width as i32 - 1;
        let columns = x_start.max(0)..=x_end.min(last_column);

        // Unshaded spans write the flat color
        if left.h == 1.0 && right.h == 1.0 {
            for x in columns {
                let Some(&z) = zs.get((x - x_start) as usize) else {
                    break;
                };
                self.put_pixel(x, y, z, color);
            }
            return;
        }

        let hs = interpolate(x_start, left.h, x_end, right.h);
        for x in columns {
            let offset = (x - x_start) as usize;
            let (Some(&z), Some(&h)) = (zs.get(offset), hs.get(offset)) else {
                break;
            };
            self.put_pixel(x, y, z, color.shaded(h));
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct EdgeSample {
    x: f32,
    z: f32,
    h: f32,
}

/// Per-row x, depth and shade along one triangle edge
#[derive(Debug, Default)]
struct EdgeSeries {
    x: Vec<f32>,
    z: Vec<f32>,
    h: Vec<f32>,
}

impl EdgeSeries {
    fn between(from: &ScreenVertex, to: &ScreenVertex) -> Self {
        Self {
            x: interpolate(from.y, from.x as f32, to.y, to.x as f32),
            z: interpolate(from.y, from.inv_depth, to.y, to.inv_depth),
            h: interpolate(from.y, from.h, to.y, to.h),
        }
    }

    fn drop_last(&mut self) {
        self.x.pop();
        self.z.pop();
        self.h.pop();
    }

    fn append(&mut self, mut other: EdgeSeries) {
        self.x.append(&mut other.x);
        self.z.append(&mut other.z);
        self.h.append(&mut other.h);
    }

    fn sample(&self, row: usize) -> Option<EdgeSample> {
        Some(EdgeSample {
            x: *self.x.get(row)?,
            z: *self.z.get(row)?,
            h: *self.h.get(row)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::RED;
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn vertex(x: i32, y: i32) -> ScreenVertex {
        ScreenVertex::new(x, y, 1.0)
    }

    #[test]
    fn test_shade_factor_scales_span_color() {
        let mut frame = FrameBuffer::new(20, 20);
        let shaded = |x, y| ScreenVertex {
            h: 0.5,
            ..ScreenVertex::new(x, y, 1.0)
        };
        frame.draw_filled_triangle(shaded(2, 2), shaded(16, 2), shaded(9, 16), Color::new(200, 100, 0));
        assert_eq!(frame.pixel(9, 6), Some([100, 50, 0, 255]));

        let mut flat = FrameBuffer::new(20, 20);
        flat.draw_filled_triangle(vertex(2, 2), vertex(16, 2), vertex(9, 16), Color::new(200, 100, 0));
        assert_eq!(flat.pixel(9, 6), Some([200, 100, 0, 255]));
    }

    #[test]
    fn test_interpolate_degenerate() {
        assert_eq!(interpolate(7, 3.5, 7, 3.5), vec![3.5]);
        assert_eq!(interpolate(7, 3.5, 7, 9.0), vec![3.5]);
    }

    #[test]
    fn test_interpolate_samples() {
        let values = interpolate(0, 0.0, 4, 2.0);
        assert_eq!(values.len(), 5);
        for (i, v) in values.iter().enumerate() {
            assert!((v - i as f32 * 0.5).abs() < 1e-6);
        }
        assert!(interpolate(3, 0.0, 1, 1.0).is_empty());
    }

    #[test]
    fn test_clear_resets_buffers() {
        let mut frame = FrameBuffer::new(4, 3);
        assert_eq!(frame.pixels().len(), 48);
        assert_eq!(frame.depth().len(), 12);
        assert!(frame.put_pixel(1, 1, 0.5, RED));
        frame.clear();
        assert!(frame.pixels().iter().all(|&b| b == 0));
        assert!(frame.depth().iter().all(|&d| d == FAR_DEPTH));
    }

    #[test]
    fn test_depth_test() {
        let mut frame = FrameBuffer::new(4, 4);
        assert!(frame.put_pixel(2, 2, 0.25, RED));
        // farther
        assert!(!frame.put_pixel(2, 2, 0.1, Color::GREEN));
        // same depth within epsilon
        assert!(!frame.put_pixel(2, 2, 0.25 + DEPTH_EPSILON / 2.0, Color::GREEN));
        assert_eq!(frame.pixel(2, 2), Some([255, 0, 0, 255]));
        // nearer
        assert!(frame.put_pixel(2, 2, 0.5, Color::GREEN));
        assert_eq!(frame.pixel(2, 2), Some([0, 255, 0, 255]));
        assert_eq!(frame.depth_at(2, 2), Some(0.5));
    }

    #[test]
    fn test_out_of_bounds_pixels_are_ignored() {
        let mut frame = FrameBuffer::new(4, 4);
        assert!(!frame.put_pixel(-1, 0, 1.0, RED));
        assert!(!frame.put_pixel(4, 0, 1.0, RED));
        assert!(!frame.put_pixel(0, 4, 1.0, RED));
        assert!(frame.pixels().iter().all(|&b| b == 0));
        assert_eq!(frame.pixel(4, 0), None);
    }

    #[test]
    fn test_horizontal_and_vertical_lines() {
        let mut frame = FrameBuffer::new(10, 10);
        frame.draw_line(vertex(8, 2), vertex(1, 2), RED);
        for x in 1..=8 {
            assert_eq!(frame.pixel(x, 2), Some(RED.to_rgba()));
        }
        assert_eq!(frame.pixel(0, 2), Some(CLEAR));
        assert_eq!(frame.pixel(9, 2), Some(CLEAR));

        frame.draw_line(vertex(5, 0), vertex(5, 9), Color::BLUE);
        for y in 0..10 {
            if y != 2 {
                assert_eq!(frame.pixel(5, y), Some(Color::BLUE.to_rgba()));
            }
        }
        // (5, 2) already holds red at the same depth
        assert_eq!(frame.pixel(5, 2), Some(RED.to_rgba()));
    }

    #[test]
    fn test_diagonal_line_touches_each_major_step() {
        let mut frame = FrameBuffer::new(10, 10);
        frame.draw_line(vertex(0, 0), vertex(8, 4), RED);
        for x in 0..=8 {
            let painted = (0..10)
                .filter(|&y| frame.pixel(x, y) == Some(RED.to_rgba()))
                .count();
            assert_eq!(painted, 1, "column {}", x);
        }
    }

    #[test]
    fn test_filled_triangle_end_to_end() {
        let mut frame = FrameBuffer::new(64, 64);
        frame.draw_filled_triangle(vertex(10, 10), vertex(50, 10), vertex(30, 40), RED);

        // left edge (10,10)-(30,40), right edge (50,10)-(30,40)
        let left = |y: f32| 10.0 + (y - 10.0) * 20.0 / 30.0;
        let right = |y: f32| 50.0 - (y - 10.0) * 20.0 / 30.0;

        for y in 0..64 {
            for x in 0..64 {
                let (fx, fy) = (x as f32, y as f32);
                let pixel = frame.pixel(x, y).unwrap();
                let rows = (10..=40).contains(&y);
                if rows && fx >= left(fy) + 1.0 && fx <= right(fy) - 1.0 {
                    assert_eq!(pixel, [255, 0, 0, 255], "interior ({}, {})", x, y);
                }
                if !rows || fx < left(fy) - 1.0 || fx > right(fy) + 1.0 {
                    assert_eq!(pixel, CLEAR, "exterior ({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn test_filled_triangle_vertex_order_does_not_matter() {
        let mut first = FrameBuffer::new(64, 64);
        first.draw_filled_triangle(vertex(10, 10), vertex(50, 10), vertex(30, 40), RED);
        let mut second = FrameBuffer::new(64, 64);
        second.draw_filled_triangle(vertex(30, 40), vertex(10, 10), vertex(50, 10), RED);
        assert_eq!(first.pixels(), second.pixels());
    }

    #[test]
    fn test_same_triangle_twice_is_rejected() {
        let mut frame = FrameBuffer::new(64, 64);
        let (a, b, c) = (
            ScreenVertex::new(5, 5, 0.5),
            ScreenVertex::new(60, 20, 0.2),
            ScreenVertex::new(20, 58, 0.3),
        );
        frame.draw_filled_triangle(a, b, c, RED);
        let pixels = frame.pixels().to_vec();
        let depth = frame.depth().to_vec();

        frame.draw_filled_triangle(a, b, c, Color::GREEN);
        assert_eq!(frame.pixels(), pixels.as_slice());
        assert_eq!(frame.depth(), depth.as_slice());
    }

    #[test]
    fn test_nearer_triangle_wins_regardless_of_order() {
        let far = [
            ScreenVertex::new(0, 0, 0.1),
            ScreenVertex::new(31, 0, 0.1),
            ScreenVertex::new(0, 31, 0.1),
        ];
        let near = [
            ScreenVertex::new(0, 0, 0.5),
            ScreenVertex::new(31, 0, 0.5),
            ScreenVertex::new(0, 31, 0.5),
        ];

        let mut frame = FrameBuffer::new(32, 32);
        frame.draw_filled_triangle(near[0], near[1], near[2], RED);
        frame.draw_filled_triangle(far[0], far[1], far[2], Color::BLUE);
        assert_eq!(frame.pixel(5, 5), Some(RED.to_rgba()));

        frame.clear();
        frame.draw_filled_triangle(far[0], far[1], far[2], Color::BLUE);
        frame.draw_filled_triangle(near[0], near[1], near[2], RED);
        assert_eq!(frame.pixel(5, 5), Some(RED.to_rgba()));
    }

    #[test]
    fn test_triangle_partly_off_canvas() {
        let mut frame = FrameBuffer::new(16, 16);
        frame.draw_filled_triangle(vertex(-20, -5), vertex(40, 8), vertex(8, 30), RED);
        assert_eq!(frame.pixel(8, 8), Some(RED.to_rgba()));
    }

    #[test]
    fn test_flat_triangle_draws_one_row() {
        let mut frame = FrameBuffer::new(16, 16);
        frame.draw_filled_triangle(vertex(2, 5), vertex(12, 5), vertex(7, 5), RED);
        let painted = frame
            .pixels()
            .chunks(4)
            .filter(|p| *p == [255, 0, 0, 255])
            .count();
        assert!(painted > 0);
        for x in 0..16 {
            assert_eq!(frame.pixel(x, 4), Some(CLEAR));
            assert_eq!(frame.pixel(x, 6), Some(CLEAR));
        }
    }
}
