#[cfg(feature = "remote")]
pub(crate) mod fetch;
pub(crate) mod lightbox;
pub(crate) mod listing;
