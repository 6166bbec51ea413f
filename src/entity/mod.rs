pub(crate) mod artwork;
pub(crate) mod audio;
pub(crate) mod balloon;
pub(crate) mod caption;
