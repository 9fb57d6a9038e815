//! Reusable transform steps and their composition.
//!
//! Each step wraps one functional operator from the parent module so that
//! augmentation chains can be assembled once and applied per example. The
//! probabilistic steps own their RNG; seed them for reproducible pipelines.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use super::{center_crop, crop, hflip, resize, resized_crop, rotate, vflip, ImageOps};
use crate::geom::BoundingBox;

/// A single image-and-boxes transform step.
pub trait BoxTransform<I: ImageOps> {
    /// Applies the step, consuming the current pair and producing the next.
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>);
}

/// Applies a sequence of steps in order.
pub struct Compose<I: ImageOps> {
    steps: Vec<Box<dyn BoxTransform<I>>>,
}

impl<I: ImageOps> Compose<I> {
    /// Creates a pipeline from the given steps.
    pub fn new(steps: Vec<Box<dyn BoxTransform<I>>>) -> Self {
        Self { steps }
    }
}

impl<I: ImageOps> BoxTransform<I> for Compose<I> {
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>) {
        self.steps
            .iter_mut()
            .fold((image, boxes), |(image, boxes), step| {
                step.apply(image, boxes)
            })
    }
}

/// Resizes to a fixed `(width, height)`.
pub struct Resize {
    pub size: (u32, u32),
}

impl<I: ImageOps> BoxTransform<I> for Resize {
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>) {
        resize(&image, &boxes, self.size)
    }
}

/// Rotates by a fixed angle in degrees.
pub struct Rotate {
    pub angle: f64,
}

impl<I: ImageOps> BoxTransform<I> for Rotate {
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>) {
        rotate(&image, &boxes, self.angle)
    }
}

/// Unconditional horizontal flip.
pub struct HorizontalFlip;

impl<I: ImageOps> BoxTransform<I> for HorizontalFlip {
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>) {
        hflip(&image, &boxes)
    }
}

/// Unconditional vertical flip.
pub struct VerticalFlip;

impl<I: ImageOps> BoxTransform<I> for VerticalFlip {
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>) {
        vflip(&image, &boxes)
    }
}

/// Fixed-window crop.
pub struct Crop {
    pub top: i64,
    pub left: i64,
    pub height: u32,
    pub width: u32,
}

impl<I: ImageOps> BoxTransform<I> for Crop {
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>) {
        crop(&image, &boxes, self.top, self.left, self.height, self.width)
    }
}

/// Centered crop to `(width, height)`.
pub struct CenterCrop {
    pub size: (u32, u32),
}

impl<I: ImageOps> BoxTransform<I> for CenterCrop {
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>) {
        center_crop(&image, &boxes, self.size)
    }
}

/// Crop followed by a resize.
pub struct ResizedCrop {
    pub top: i64,
    pub left: i64,
    pub height: u32,
    pub width: u32,
    pub size: (u32, u32),
}

impl<I: ImageOps> BoxTransform<I> for ResizedCrop {
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>) {
        resized_crop(
            &image,
            &boxes,
            self.top,
            self.left,
            self.height,
            self.width,
            self.size,
        )
    }
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::rng().random()),
    }
}

/// Horizontal flip applied with probability `p`.
pub struct RandomHorizontalFlip {
    p: f64,
    rng: StdRng,
}

impl RandomHorizontalFlip {
    /// Flips with probability `p` using an OS-seeded RNG.
    pub fn new(p: f64) -> Self {
        Self::with_seed(p, None)
    }

    /// Flips with probability `p`; pass a seed for reproducible chains.
    pub fn with_seed(p: f64, seed: Option<u64>) -> Self {
        Self {
            p,
            rng: rng_from_seed(seed),
        }
    }
}

impl<I: ImageOps> BoxTransform<I> for RandomHorizontalFlip {
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>) {
        if self.rng.random::<f64>() < self.p {
            hflip(&image, &boxes)
        } else {
            (image, boxes)
        }
    }
}

/// Vertical flip applied with probability `p`.
pub struct RandomVerticalFlip {
    p: f64,
    rng: StdRng,
}

impl RandomVerticalFlip {
    /// Flips with probability `p` using an OS-seeded RNG.
    pub fn new(p: f64) -> Self {
        Self::with_seed(p, None)
    }

    /// Flips with probability `p`; pass a seed for reproducible chains.
    pub fn with_seed(p: f64, seed: Option<u64>) -> Self {
        Self {
            p,
            rng: rng_from_seed(seed),
        }
    }
}

impl<I: ImageOps> BoxTransform<I> for RandomVerticalFlip {
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>) {
        if self.rng.random::<f64>() < self.p {
            vflip(&image, &boxes)
        } else {
            (image, boxes)
        }
    }
}

/// Crop of `(width, height)` at a uniformly random position.
pub struct RandomCrop {
    size: (u32, u32),
    rng: StdRng,
}

impl RandomCrop {
    /// Crops to `size` at a random offset using an OS-seeded RNG.
    pub fn new(size: (u32, u32)) -> Self {
        Self::with_seed(size, None)
    }

    /// Crops to `size`; pass a seed for reproducible chains.
    pub fn with_seed(size: (u32, u32), seed: Option<u64>) -> Self {
        Self {
            size,
            rng: rng_from_seed(seed),
        }
    }
}

impl<I: ImageOps> BoxTransform<I> for RandomCrop {
    fn apply(&mut self, image: I, boxes: Vec<BoundingBox>) -> (I, Vec<BoundingBox>) {
        let (img_w, img_h) = image.size();
        let (w, h) = self.size;

        let (top, left) = if (img_w, img_h) == (w, h) {
            (0, 0)
        } else {
            let max_top = (img_h as i64 - h as i64).max(0);
            let max_left = (img_w as i64 - w as i64).max(0);
            (
                self.rng.random_range(0..=max_top),
                self.rng.random_range(0..=max_left),
            )
        };

        crop(&image, &boxes, top, left, h, w)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::FakeImage;
    use super::*;
    use crate::geom::{BoxMode, Space};

    fn xyxy(coords: [f64; 4]) -> BoundingBox {
        BoundingBox::new(coords, BoxMode::Xyxy, Space::Absolute)
    }

    #[test]
    fn compose_applies_steps_in_order() {
        let mut pipeline: Compose<FakeImage> = Compose::new(vec![
            Box::new(Resize { size: (200, 200) }),
            Box::new(HorizontalFlip),
        ]);

        let image = FakeImage::new(100, 100);
        let boxes = vec![xyxy([10.0, 10.0, 50.0, 50.0])];

        let (new_image, new_boxes) = pipeline.apply(image, boxes);

        assert_eq!(new_image.size(), (200, 200));
        // Resized to [20, 20, 100, 100], then reflected about x = 199.
        assert_eq!(new_boxes[0].coords(), [99.0, 20.0, 179.0, 100.0]);
    }

    #[test]
    fn random_flip_at_p_one_always_flips() {
        let mut step = RandomHorizontalFlip::with_seed(1.0, Some(7));
        let image = FakeImage::new(100, 100);
        let bbox = xyxy([10.0, 20.0, 30.0, 40.0]);

        let (_, boxes) = step.apply(image, vec![bbox]);
        assert_eq!(boxes[0].coords(), [69.0, 20.0, 89.0, 40.0]);
    }

    #[test]
    fn random_flip_at_p_zero_never_flips() {
        let mut step = RandomVerticalFlip::with_seed(0.0, Some(7));
        let image = FakeImage::new(100, 100);
        let bbox = xyxy([10.0, 20.0, 30.0, 40.0]);

        let (_, boxes) = step.apply(image, vec![bbox]);
        assert_eq!(boxes[0], bbox);
    }

    #[test]
    fn random_crop_with_matching_size_is_an_origin_crop() {
        let mut step = RandomCrop::with_seed((100, 100), Some(3));
        let image = FakeImage::new(100, 100);
        let bbox = xyxy([10.0, 20.0, 30.0, 40.0]);

        let (new_image, boxes) = step.apply(image, vec![bbox]);
        assert_eq!(new_image.size(), (100, 100));
        assert_eq!(boxes[0], bbox);
    }

    #[test]
    fn seeded_random_crop_is_deterministic() {
        let image = FakeImage::new(100, 100);
        let boxes = vec![xyxy([40.0, 40.0, 60.0, 60.0])];

        let mut a = RandomCrop::with_seed((80, 80), Some(42));
        let mut b = RandomCrop::with_seed((80, 80), Some(42));

        let (_, out_a) = a.apply(image, boxes.clone());
        let (_, out_b) = b.apply(image, boxes);

        assert_eq!(out_a, out_b);
    }
}
