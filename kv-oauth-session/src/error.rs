use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] crate::config::Error),
    #[error(transparent)]
    Store(#[from] crate::store::Error),
    #[error(transparent)]
    Refresh(#[from] crate::refresh::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
