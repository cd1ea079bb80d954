pub mod completions;
pub mod history;
pub mod info;
pub mod ops;
pub mod search;
