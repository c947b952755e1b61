pub mod gradient_ascent;
pub mod optimizable;

pub use gradient_ascent::GradientAscent;
pub use optimizable::Optimizable;
