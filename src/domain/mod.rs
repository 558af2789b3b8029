pub mod catalog;
pub mod classify;
pub mod filter;
pub mod normalize;
pub mod paginate;
pub mod program;
pub mod sort;

pub use catalog::{run_query, CatalogQuery};
pub use classify::PrestigeTier;
pub use filter::{FilterState, GradeMode};
pub use paginate::{Page, PageMeta, PageState};
pub use program::{CostCategory, GradeLevel, Program, ProgramId};
pub use sort::{SortDirection, SortKey, SortState};
