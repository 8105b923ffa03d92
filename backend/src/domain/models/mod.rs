pub mod allocation;
pub mod income_category;
pub mod ledger;
pub mod money;
pub mod savings_goal;
