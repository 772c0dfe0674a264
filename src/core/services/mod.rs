pub mod budget_service;
pub mod dashboard;
pub mod export_service;
pub mod filter_service;
pub mod summary_service;

pub use budget_service::{
    BudgetAlert, BudgetEvaluation, BudgetService, BudgetSeverity, BudgetStatus, BudgetThresholds,
};
pub use dashboard::Dashboard;
pub use export_service::{ExportService, CSV_HEADER};
pub use filter_service::{CategoryFilter, FilterCriteria, FilterService, KindFilter, MonthFilter};
pub use summary_service::{MonthlyTotals, Summary, SummaryService};
