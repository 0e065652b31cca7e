#[cfg(test)]
pub mod sandbox;

#[cfg(test)]
pub mod mock;
