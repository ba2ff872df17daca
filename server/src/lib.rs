pub mod db;
pub mod error;
pub mod ranking;
pub mod rewards;
pub mod store;

#[cfg(test)]
pub(crate) mod test_store;
