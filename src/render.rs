pub(crate) mod fit;
pub(crate) mod renderer;
pub(crate) mod surface;
