pub mod net;
pub mod queue;
pub mod scenario;
pub mod sim;

#[cfg(test)]
mod test;
