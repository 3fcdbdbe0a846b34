pub mod homework_sets;

pub mod submissions;

pub use homework_sets::configure_homework_sets_routes;
pub use submissions::configure_submissions_routes;
