pub mod cli;
pub mod config;
pub mod errors;
pub mod infrastructure;
pub mod services;
pub mod startup;
pub mod utils;

#[cfg(test)]
mod test_utils;
