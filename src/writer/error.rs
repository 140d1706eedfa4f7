use std::{io, string::FromUtf8Error};

#[derive(thiserror::Error, Debug)]
pub enum DOMWriterError {
    #[error(transparent)]
    XMLTree(#[from] xmltree::Error),
    #[error(transparent)]
    IO(#[from] io::Error),
    #[error(transparent)]
    Utf8(#[from] FromUtf8Error),
}
