pub(crate) mod corner_pin;
pub(crate) mod homography;
