pub mod frame;
pub mod quad;
pub mod viewport;
