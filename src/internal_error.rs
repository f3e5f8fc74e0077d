use std::error::Error;
use std::io;

use std::fmt;
use std::sync::PoisonError;

use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};

#[derive(Debug)]
pub struct InternalError {
    what: String,
}

impl Error for InternalError {}
impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Generic internal error: {}", self.what)
    }
}

impl<T> From<PoisonError<T>> for InternalError {
    fn from(e: PoisonError<T>) -> InternalError {
        InternalError {
            what: e.to_string(),
        }
    }
}

impl From<rusqlite::Error> for InternalError {
    fn from(e: rusqlite::Error) -> InternalError {
        InternalError {
            what: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for InternalError {
    fn from(e: serde_json::Error) -> InternalError {
        InternalError {
            what: e.to_string(),
        }
    }
}

impl From<ureq::Error> for InternalError {
    fn from(e: ureq::Error) -> InternalError {
        InternalError {
            what: e.to_string(),
        }
    }
}

impl From<io::Error> for InternalError {
    fn from(e: io::Error) -> InternalError {
        InternalError {
            what: e.to_string(),
        }
    }
}

impl From<&str> for InternalError {
    fn from(s: &str) -> InternalError {
        InternalError {
            what: s.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for InternalError {
    fn respond_to(self, _request: &'r Request<'_>) -> response::Result<'static> {
        log::error!("{}", self);
        Err(Status::InternalServerError)
    }
}

pub type InternalResult<T> = Result<T, InternalError>;
