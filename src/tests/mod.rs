#[cfg(test)]
pub mod common;

#[cfg(test)]
mod register_validation;
