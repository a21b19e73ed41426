pub(crate) mod clock;
pub(crate) mod frame_loop;
