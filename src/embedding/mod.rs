pub mod clip;
pub mod impl_clip_onnx;
pub mod impl_fake;
pub mod interface;
