// Crisis handling: risk assessment, canned responses, resources

mod detector;
pub mod resources;
mod templates;

pub use detector::{RiskAssessor, RiskKeywords, RiskLevel};
pub use templates::{
    connection_error_message, crisis_response, empty_response_message, professional_support_note,
};
