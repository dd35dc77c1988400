pub mod fill;
pub mod paint;
pub mod replay;
pub mod shapes;
pub mod stamp;
pub mod surface;
