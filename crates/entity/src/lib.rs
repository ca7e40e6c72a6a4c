//! Plain domain records for the staff directory. These types carry no
//! storage or transport concerns; the store and API crates wrap them.

pub mod employee;
pub mod user;
