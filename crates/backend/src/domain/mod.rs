pub mod a001_store_order;
