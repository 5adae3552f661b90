pub mod aggregate;
pub mod approval;
pub mod clock;
pub mod normalize;
