pub mod debounce;
pub mod store;
