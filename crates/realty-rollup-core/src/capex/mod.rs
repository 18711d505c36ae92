pub mod projects;

pub use projects::{
    capex_by_category, overdue_capex, upcoming_capex, CapexProject, CapexStatus, CategoryBudget,
};
