pub mod health;
pub mod records;
pub mod user_accesses;

#[cfg(test)]
pub(crate) mod test_support;
