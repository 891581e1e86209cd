pub mod demo;
pub mod dist;
pub mod error;
pub mod facility;
pub mod process;
pub mod sim;

#[cfg(test)]
mod test;
