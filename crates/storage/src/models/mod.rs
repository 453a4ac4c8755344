mod rider;
mod round;
mod session;
mod submission;

pub(crate) use rider::display_name;
pub use rider::{Rider, normalize_email};
pub use round::Round;
pub use session::Session;
pub use submission::Submission;
