pub(crate) mod camera;
pub(crate) mod panel;
pub(crate) mod passive;
