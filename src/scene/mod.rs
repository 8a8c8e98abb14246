pub(crate) mod display;
pub(crate) mod layer;
pub(crate) mod media;
pub(crate) mod testcard;
pub(crate) mod text;
