mod router;
pub mod status;
pub mod todos;

pub use router::router;
