pub(crate) mod cpu;
pub(crate) mod frame;
pub(crate) mod testcard;
pub(crate) mod text;
pub(crate) mod warp;
