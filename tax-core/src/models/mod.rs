mod error;
mod tax_bracket;
mod tax_plan;

pub use error::ScheduleError;
pub use tax_bracket::TaxBracket;
pub use tax_plan::{PERSONAL_EXEMPTION, TaxPlan};
