mod alert;
mod record;
mod report;

pub use alert::*;
pub use record::*;
pub use report::*;
