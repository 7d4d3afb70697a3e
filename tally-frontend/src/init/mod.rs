pub mod acknowledged;
