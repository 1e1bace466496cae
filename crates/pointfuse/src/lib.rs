#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use pointfuse_image as image;

#[doc(inline)]
pub use pointfuse_io as io;

#[doc(inline)]
pub use pointfuse_3d as k3d;

#[doc(inline)]
pub use pointfuse_pipeline as pipeline;
