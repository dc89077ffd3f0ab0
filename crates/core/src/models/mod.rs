pub mod action;
pub mod annual;
pub mod category;
pub mod month;
pub mod order;
pub mod plan;
pub mod product;
pub mod profile;
pub mod session;
pub mod settings;
pub mod state;
pub mod trend;
