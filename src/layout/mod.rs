pub(crate) mod frame;
pub(crate) mod solver;
pub(crate) mod viewport;
