pub use aggregate::Summary;
pub use budgets::{Budget, BudgetNew, BudgetPatch, BudgetType};
pub use categories::{CATEGORY_LIMIT, Category, DEFAULT_CATEGORIES};
pub use date_range::{DateRange, RangeToken, resolve_range};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseNew, ExpensePatch};
pub use feed::{Change, ChangeFeed, RecordKind};
pub use group_members::{Member, MemberRole};
pub use groups::Group;
pub use incomes::{Income, IncomeNew, IncomePatch};
pub use invitations::Invitation;
pub use ops::{Engine, EngineBuilder};
pub use periods::{CustomBudgetPeriod, CustomBudgetPeriodNew};
pub use scope::Scope;
pub use session::{LogoutKind, SessionConfig, SessionMonitor, SessionSignal};
pub use users::{AccountType, ProfilePatch, UserProfile};

pub mod aggregate;
mod budgets;
mod categories;
pub mod date_range;
mod error;
mod expenses;
mod feed;
mod group_members;
mod groups;
mod incomes;
mod invitations;
mod ops;
mod periods;
mod scope;
mod session;
mod users;

pub type ResultEngine<T> = Result<T, EngineError>;
