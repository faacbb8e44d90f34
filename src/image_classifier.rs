pub mod impl_color_prototype;
pub mod impl_fake;
pub mod interface;
