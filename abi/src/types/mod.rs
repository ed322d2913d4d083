use crate::errors::Error;

mod user;

pub use user::*;

pub trait Validator {
    fn validate(&self) -> Result<(), Error>;
}
