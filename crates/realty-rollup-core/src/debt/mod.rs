pub mod urgency;
pub mod views;

pub use urgency::{score_breakdown, sort_by_urgency, urgency_score, UrgencyRecord, UrgencyScore, UrgencyWeights};
pub use views::{
    filter_loans, lender_exposure, loan_views, maturity_countdown, risk_action, summarize_debt,
    DebtSummary, LenderExposure, LoanFilter, LoanScope, LoanView, RiskAction,
};
