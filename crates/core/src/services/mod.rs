pub mod annual_service;
pub mod asset_service;
pub mod ledger_service;
pub mod order_service;
pub mod plan_service;
pub mod reducer;
pub mod sync_service;
