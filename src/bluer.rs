pub mod adapter;
pub mod advertisement;

mod error;
