pub mod allocation_mapper;
pub mod income_category_mapper;
pub mod ledger_mapper;
