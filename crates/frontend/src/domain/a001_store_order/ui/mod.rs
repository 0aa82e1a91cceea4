pub mod list;

pub use list::StoreOverviewList;
